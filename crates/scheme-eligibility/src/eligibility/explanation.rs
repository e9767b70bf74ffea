use serde::{Deserialize, Serialize};

use super::registry::SchemeDefinition;

pub const DEFAULT_EXPLANATION_DISCLAIMER: &str =
    "This tool is a demonstration and must not be used for official government decisions. \
     Outputs are approximate and based on simplified assumptions.";

const LOW_UPPER_BOUND: f64 = 0.30;
const MODERATE_UPPER_BOUND: f64 = 0.70;

/// Coarse verbal band for an approval probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbabilityBand {
    Low,
    Moderate,
    High,
}

impl ProbabilityBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability < LOW_UPPER_BOUND {
            ProbabilityBand::Low
        } else if probability < MODERATE_UPPER_BOUND {
            ProbabilityBand::Moderate
        } else {
            ProbabilityBand::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProbabilityBand::Low => "LOW",
            ProbabilityBand::Moderate => "MODERATE",
            ProbabilityBand::High => "HIGH",
        }
    }

    pub fn describe(self, probability: f64) -> String {
        let lead = format!(
            "The model estimates a {} likelihood of approval (~{probability:.2}).",
            self.label()
        );
        let detail = match self {
            ProbabilityBand::Low => {
                "This suggests that, among similar applicants in the training data, relatively \
                 few were approved."
            }
            ProbabilityBand::Moderate => {
                "The outcome is uncertain, and human review would be appropriate."
            }
            ProbabilityBand::High => {
                "Many similar applicants in the training data were approved."
            }
        };
        format!("{lead} {detail}")
    }
}

/// Human-readable account of one scheme decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationPayload {
    pub rule_based_reason: String,
    pub probability_band: ProbabilityBand,
    #[serde(rename = "probability_explanation")]
    pub probability_band_text: String,
    pub overall_summary: String,
    pub ethical_disclaimer: String,
}

/// Assembles explanation payloads. Performs no inference.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplanationBuilder;

impl ExplanationBuilder {
    pub fn build(
        &self,
        scheme: &SchemeDefinition,
        rule_eligible: bool,
        rule_reason: &str,
        probability: f64,
    ) -> ExplanationPayload {
        let band = ProbabilityBand::from_probability(probability);
        let verdict = if rule_eligible {
            "ELIGIBLE"
        } else {
            "NOT ELIGIBLE"
        };

        ExplanationPayload {
            rule_based_reason: rule_reason.to_string(),
            probability_band: band,
            probability_band_text: band.describe(probability),
            overall_summary: format!(
                "According to the rule-based eligibility check for {}, the applicant is \
                 {verdict}. The ML model then provides an estimated approval probability which \
                 should be treated as advisory, not authoritative.",
                scheme.display_name
            ),
            ethical_disclaimer: scheme
                .ethical_disclaimer
                .clone()
                .unwrap_or_else(|| DEFAULT_EXPLANATION_DISCLAIMER.to_string()),
        }
    }
}
