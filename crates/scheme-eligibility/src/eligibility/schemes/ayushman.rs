//! Ayushman Bharat (PM-JAY) health cover.

use super::super::domain::{ApplicantFacts, RuleOutcome};
use super::super::features::{flag, FeatureVector};
use super::super::rules::{evaluate_checks, RuleCheck};

pub const FEATURES: &[&str] = &["age", "annual_income", "has_family_id"];

const INCOME_LIMIT: f64 = 120_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub age: i32,
    pub annual_income: f64,
    pub has_family_id: bool,
}

impl From<&ApplicantFacts> for Inputs {
    fn from(facts: &ApplicantFacts) -> Self {
        Self {
            age: facts.age,
            annual_income: facts.annual_income,
            has_family_id: facts.has_family_id,
        }
    }
}

const CHECKS: &[RuleCheck<Inputs>] = &[
    RuleCheck {
        name: "positive_age",
        passes: |inputs| inputs.age > 0,
        failure: "Ineligible: age must be a positive number.",
    },
    RuleCheck {
        name: "income_limit",
        passes: |inputs| inputs.annual_income <= INCOME_LIMIT,
        failure: "Ineligible: annual income exceeds the simplified Ayushman limit of ₹1.2 lakh.",
    },
    RuleCheck {
        name: "family_id",
        passes: |inputs| inputs.has_family_id,
        failure: "Ineligible: applicant does not have a valid family ID in this demo.",
    },
];

pub fn evaluate(inputs: &Inputs) -> RuleOutcome {
    evaluate_checks(inputs, CHECKS, |_| {
        "Eligible by rule check: income is within limit and a valid family ID is present."
    })
}

pub fn features(inputs: &Inputs) -> FeatureVector {
    FeatureVector::new(vec![
        f64::from(inputs.age),
        inputs.annual_income,
        flag(inputs.has_family_id),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_family_id_is_rejected() {
        let inputs = Inputs {
            age: 35,
            annual_income: 90_000.0,
            has_family_id: false,
        };
        assert_eq!(evaluate(&inputs).failed_check, Some("family_id"));
    }

    #[test]
    fn zero_age_fails_before_other_checks() {
        let inputs = Inputs {
            age: 0,
            annual_income: 0.0,
            has_family_id: true,
        };
        assert_eq!(evaluate(&inputs).failed_check, Some("positive_age"));
    }

    #[test]
    fn household_with_family_id_is_eligible() {
        let inputs = Inputs {
            age: 35,
            annual_income: 90_000.0,
            has_family_id: true,
        };
        assert!(evaluate(&inputs).eligible);
        assert_eq!(features(&inputs).as_slice(), &[35.0, 90_000.0, 1.0]);
    }
}
