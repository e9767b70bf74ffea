//! PMAY housing assistance.

use super::super::domain::{ApplicantFacts, Occupation, RuleOutcome};
use super::super::features::{flag, FeatureVector};
use super::super::rules::{evaluate_checks, RuleCheck};

pub const FEATURES: &[&str] = &["age", "annual_income", "is_laborer"];

const MINIMUM_AGE: i32 = 18;
const INCOME_LIMIT: f64 = 120_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub age: i32,
    pub annual_income: f64,
    pub is_laborer: bool,
}

impl From<&ApplicantFacts> for Inputs {
    fn from(facts: &ApplicantFacts) -> Self {
        Self {
            age: facts.age,
            annual_income: facts.annual_income,
            // Farm work is the only labour category the intake form captures.
            is_laborer: facts.occupation == Occupation::Farmer,
        }
    }
}

const CHECKS: &[RuleCheck<Inputs>] = &[
    RuleCheck {
        name: "minimum_age",
        passes: |inputs| inputs.age >= MINIMUM_AGE,
        failure: "Ineligible: applicant must be at least 18 years old.",
    },
    RuleCheck {
        name: "income_limit",
        passes: |inputs| inputs.annual_income <= INCOME_LIMIT,
        failure: "Ineligible: annual income exceeds the simplified PMAY limit of ₹1.2 lakh.",
    },
];

fn success_reason(inputs: &Inputs) -> &'static str {
    if inputs.is_laborer {
        "Eligible by rule check: income is within limit and applicant is a labourer, which is \
         prioritised in this simplified demo."
    } else {
        "Eligible by rule check: income is within limit and applicant is not restricted by \
         occupation."
    }
}

pub fn evaluate(inputs: &Inputs) -> RuleOutcome {
    evaluate_checks(inputs, CHECKS, success_reason)
}

pub fn features(inputs: &Inputs) -> FeatureVector {
    FeatureVector::new(vec![
        f64::from(inputs.age),
        inputs.annual_income,
        flag(inputs.is_laborer),
    ])
}
