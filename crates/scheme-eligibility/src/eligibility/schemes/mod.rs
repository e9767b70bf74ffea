//! Rule gates and feature extractors for each catalogued scheme.
//!
//! Every capability takes `ApplicantFacts`, which carries no sensitive attribute, so a feature
//! vector cannot be built from gender or disability status.

pub mod ayushman;
pub mod nsp;
pub mod pm_kisan;
pub mod pmay;

use super::domain::{ApplicantFacts, RuleOutcome, SchemeId};
use super::features::FeatureVector;

impl SchemeId {
    pub fn evaluate_rules(self, facts: &ApplicantFacts) -> RuleOutcome {
        match self {
            SchemeId::PmKisan => pm_kisan::evaluate(&pm_kisan::Inputs::from(facts)),
            SchemeId::Pmay => pmay::evaluate(&pmay::Inputs::from(facts)),
            SchemeId::Nsp => nsp::evaluate(&nsp::Inputs::from(facts)),
            SchemeId::Ayushman => ayushman::evaluate(&ayushman::Inputs::from(facts)),
        }
    }

    /// Feature order matches [`SchemeId::feature_names`] and the scorer's training order.
    pub fn extract_features(self, facts: &ApplicantFacts) -> FeatureVector {
        match self {
            SchemeId::PmKisan => pm_kisan::features(&pm_kisan::Inputs::from(facts)),
            SchemeId::Pmay => pmay::features(&pmay::Inputs::from(facts)),
            SchemeId::Nsp => nsp::features(&nsp::Inputs::from(facts)),
            SchemeId::Ayushman => ayushman::features(&ayushman::Inputs::from(facts)),
        }
    }

    pub const fn feature_names(self) -> &'static [&'static str] {
        match self {
            SchemeId::PmKisan => pm_kisan::FEATURES,
            SchemeId::Pmay => pmay::FEATURES,
            SchemeId::Nsp => nsp::FEATURES,
            SchemeId::Ayushman => ayushman::FEATURES,
        }
    }
}
