//! PM-KISAN income support for landholding farmers.

use super::super::domain::{ApplicantFacts, Occupation, RuleOutcome};
use super::super::features::{flag, FeatureVector};
use super::super::rules::{evaluate_checks, RuleCheck};

pub const FEATURES: &[&str] = &["land_size_acres", "annual_income", "owns_land", "is_farmer"];

const INCOME_LIMIT: f64 = 150_000.0;

/// Holding assumed when the applicant leaves the field absent or zero.
const DEFAULT_LAND_ACRES: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub land_size_acres: f64,
    pub annual_income: f64,
    pub owns_land: bool,
    pub is_farmer: bool,
}

impl From<&ApplicantFacts> for Inputs {
    fn from(facts: &ApplicantFacts) -> Self {
        let is_farmer = facts.occupation == Occupation::Farmer;
        let land_size_acres = match facts.land_holding_acres {
            Some(acres) if acres != 0.0 => acres,
            _ => DEFAULT_LAND_ACRES,
        };

        Self {
            land_size_acres,
            annual_income: facts.annual_income,
            owns_land: is_farmer,
            is_farmer,
        }
    }
}

const CHECKS: &[RuleCheck<Inputs>] = &[
    RuleCheck {
        name: "registered_farmer",
        passes: |inputs| inputs.is_farmer,
        failure: "Ineligible: applicant is not registered as a farmer.",
    },
    RuleCheck {
        name: "owns_land",
        passes: |inputs| inputs.owns_land,
        failure: "Ineligible: applicant does not own cultivable agricultural land.",
    },
    RuleCheck {
        name: "positive_land_size",
        passes: |inputs| inputs.land_size_acres > 0.0,
        failure: "Ineligible: land size must be greater than zero acres.",
    },
    RuleCheck {
        name: "income_limit",
        passes: |inputs| inputs.annual_income <= INCOME_LIMIT,
        failure: "Ineligible: annual income exceeds the simplified PM-KISAN limit of ₹1.5 lakh.",
    },
];

pub fn evaluate(inputs: &Inputs) -> RuleOutcome {
    evaluate_checks(inputs, CHECKS, |_| {
        "Eligible by rule check: applicant is a farmer with cultivable land and income within \
         the simplified PM-KISAN limit."
    })
}

pub fn features(inputs: &Inputs) -> FeatureVector {
    FeatureVector::new(vec![
        inputs.land_size_acres,
        inputs.annual_income,
        flag(inputs.owns_land),
        flag(inputs.is_farmer),
    ])
}
