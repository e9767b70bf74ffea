use serde::{de, Deserialize, Deserializer, Serialize};

use super::explanation::ExplanationPayload;

/// Government benefit schemes known to the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeId {
    PmKisan,
    Pmay,
    Nsp,
    Ayushman,
}

impl SchemeId {
    pub const COUNT: usize = 4;

    /// Catalogue order; also the default fan-out order of the orchestrator.
    pub const ALL: [SchemeId; SchemeId::COUNT] = [
        SchemeId::PmKisan,
        SchemeId::Pmay,
        SchemeId::Nsp,
        SchemeId::Ayushman,
    ];

    /// Stable identifier used for artifact directories and URLs.
    pub const fn as_str(self) -> &'static str {
        match self {
            SchemeId::PmKisan => "pm_kisan",
            SchemeId::Pmay => "pmay",
            SchemeId::Nsp => "nsp",
            SchemeId::Ayushman => "ayushman",
        }
    }

    /// Public-facing scheme label used in API responses.
    pub const fn label(self) -> &'static str {
        match self {
            SchemeId::PmKisan => "PM-KISAN",
            SchemeId::Pmay => "PMAY",
            SchemeId::Nsp => "NSP",
            SchemeId::Ayushman => "Ayushman Bharat (PM-JAY)",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            SchemeId::PmKisan => 0,
            SchemeId::Pmay => 1,
            SchemeId::Nsp => 2,
            SchemeId::Ayushman => 3,
        }
    }

    /// Accepts either the identifier or the label, ignoring case and `-`/`_` differences.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|scheme| {
            scheme.as_str() == normalized
                || scheme.label().to_ascii_lowercase().replace('-', "_") == normalized
        })
    }
}

/// Raw applicant payload as received at the service boundary.
///
/// Missing numeric fields deserialize to zero. That substitution silently changes what the
/// applicant declared, so a missing income reads as "no income" to every rule gate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicantSubmission {
    #[serde(default, deserialize_with = "whole_number")]
    pub age: i32,
    #[serde(default)]
    pub annual_income: f64,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub land_holding_acres: Option<f64>,
    #[serde(default)]
    pub disability_status: Option<String>,
    #[serde(default)]
    pub has_family_id: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWholeNumber {
    Integer(i64),
    Float(f64),
}

/// Accepts `45` and `45.0` alike; fractional or out-of-range values are rejected.
fn whole_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let out_of_range =
        || <D::Error as de::Error>::custom("expected a whole number within i32 range");
    match RawWholeNumber::deserialize(deserializer)? {
        RawWholeNumber::Integer(value) => i32::try_from(value).map_err(|_| out_of_range()),
        RawWholeNumber::Float(value)
            if value.fract() == 0.0
                && value >= f64::from(i32::MIN)
                && value <= f64::from(i32::MAX) =>
        {
            Ok(value as i32)
        }
        RawWholeNumber::Float(_) => Err(out_of_range()),
    }
}

/// Occupation categories that scheme rules distinguish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupation {
    Farmer,
    Student,
    Other(String),
}

impl Occupation {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "farmer" => Occupation::Farmer,
            "student" => Occupation::Student,
            other => Occupation::Other(other.to_string()),
        }
    }
}

/// Non-sensitive facts. This is the only view of an applicant that scheme rules and feature
/// extractors receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantFacts {
    pub age: i32,
    pub annual_income: f64,
    pub state: String,
    pub occupation: Occupation,
    pub land_holding_acres: Option<f64>,
    pub has_family_id: bool,
}

/// Demographic attributes reserved for fairness auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveAttributes {
    pub gender: String,
    pub disability_status: Option<String>,
}

/// Sensitive attribute a caller can audit a batch against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveAttribute {
    #[default]
    Gender,
    DisabilityStatus,
}

impl SensitiveAttributes {
    pub fn group_label(&self, attribute: SensitiveAttribute) -> String {
        match attribute {
            SensitiveAttribute::Gender => {
                let gender = self.gender.trim();
                if gender.is_empty() {
                    "unspecified".to_string()
                } else {
                    gender.to_string()
                }
            }
            SensitiveAttribute::DisabilityStatus => self
                .disability_status
                .as_deref()
                .map(str::trim)
                .filter(|status| !status.is_empty())
                .unwrap_or("undisclosed")
                .to_string(),
        }
    }
}

/// Applicant split into the facts schemes may read and the attributes only audits may read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub facts: ApplicantFacts,
    pub sensitive: SensitiveAttributes,
}

impl From<ApplicantSubmission> for ApplicantProfile {
    fn from(submission: ApplicantSubmission) -> Self {
        Self {
            facts: ApplicantFacts {
                age: submission.age,
                annual_income: submission.annual_income,
                state: submission.state,
                occupation: Occupation::parse(&submission.occupation),
                land_holding_acres: submission.land_holding_acres,
                has_family_id: submission.has_family_id.unwrap_or(false),
            },
            sensitive: SensitiveAttributes {
                gender: submission.gender,
                disability_status: submission.disability_status,
            },
        }
    }
}

/// Outcome of a scheme's rule gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub eligible: bool,
    pub reason: String,
    /// Name of the check that short-circuited evaluation, when one failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_check: Option<&'static str>,
}

impl RuleOutcome {
    pub fn eligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: true,
            reason: reason.into(),
            failed_check: None,
        }
    }

    pub fn ineligible(check: &'static str, reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reason: reason.into(),
            failed_check: Some(check),
        }
    }
}

/// Per-scheme result for an applicant who passed the rule gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityDecision {
    pub scheme: SchemeId,
    pub display_name: String,
    pub rule_eligible: bool,
    pub rule_reason: String,
    /// Scorer output in `[0, 1]`.
    pub approval_probability: f64,
    pub expected_benefit: f64,
    pub explanation: ExplanationPayload,
}

/// Single-scheme check that keeps the rule outcome even when the applicant is ineligible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeEvaluation {
    pub scheme: SchemeId,
    pub rule: RuleOutcome,
    pub decision: Option<EligibilityDecision>,
}
