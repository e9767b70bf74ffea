use serde::Serialize;

/// Applicant attributes that must never reach a scorer. They are only read by fairness audits.
pub const SENSITIVE_FEATURES: &[&str] = &["gender", "disability_status"];

/// Attributes the service never collects.
pub const EXCLUDED_FEATURES: &[&str] = &["caste", "religion", "political_affiliation"];

/// Ordered numeric inputs for a scheme's scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
