//! National Scholarship Portal.

use super::super::domain::{ApplicantFacts, Occupation, RuleOutcome};
use super::super::features::FeatureVector;
use super::super::rules::{evaluate_checks, RuleCheck};

pub const FEATURES: &[&str] = &["age", "annual_income", "student_class"];

const MINIMUM_AGE: i32 = 10;
const INCOME_LIMIT: f64 = 120_000.0;
const ELIGIBLE_CLASSES: [u8; 2] = [10, 12];

#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub age: i32,
    pub annual_income: f64,
    pub student_class: u8,
}

impl From<&ApplicantFacts> for Inputs {
    fn from(facts: &ApplicantFacts) -> Self {
        let student_class = if facts.occupation == Occupation::Student {
            12
        } else {
            10
        };

        Self {
            age: facts.age,
            annual_income: facts.annual_income,
            student_class,
        }
    }
}

const CHECKS: &[RuleCheck<Inputs>] = &[
    RuleCheck {
        name: "minimum_age",
        passes: |inputs| inputs.age >= MINIMUM_AGE,
        failure: "Ineligible: applicant must be at least 10 years old for this demo.",
    },
    RuleCheck {
        name: "income_limit",
        passes: |inputs| inputs.annual_income <= INCOME_LIMIT,
        failure: "Ineligible: annual income exceeds the simplified NSP limit of ₹1.2 lakh.",
    },
    RuleCheck {
        name: "eligible_class",
        passes: |inputs| ELIGIBLE_CLASSES.contains(&inputs.student_class),
        failure: "Ineligible: only class 10 and 12 students are considered in this simplified \
                  NSP demo.",
    },
];

pub fn evaluate(inputs: &Inputs) -> RuleOutcome {
    evaluate_checks(inputs, CHECKS, |_| {
        "Eligible by rule check: class and income are within the simplified NSP criteria."
    })
}

pub fn features(inputs: &Inputs) -> FeatureVector {
    FeatureVector::new(vec![
        f64::from(inputs.age),
        inputs.annual_income,
        f64::from(inputs.student_class),
    ])
}
