//! Response shapes for the HTTP and CLI edges.
//!
//! Probabilities stay in `[0, 1]` everywhere in the core; the percentage conversion happens
//! here and nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{EligibilityDecision, SchemeEvaluation, SchemeId};
use super::explanation::ExplanationPayload;
use super::fairness::BiasReport;
use super::orchestrator::OrchestrationResult;
use super::registry::SchemeDefinition;

/// Converts a `[0, 1]` probability into a percentage rounded to two decimals.
pub fn to_percentage(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeResultView {
    pub scheme: String,
    pub scheme_id: SchemeId,
    pub eligible: bool,
    pub approval_probability: f64,
    pub expected_annual_benefit: f64,
    pub explanation: ExplanationPayload,
}

impl From<&EligibilityDecision> for SchemeResultView {
    fn from(decision: &EligibilityDecision) -> Self {
        Self {
            scheme: decision.scheme.label().to_string(),
            scheme_id: decision.scheme,
            eligible: decision.rule_eligible,
            approval_probability: to_percentage(decision.approval_probability),
            expected_annual_benefit: decision.expected_benefit,
            explanation: decision.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessView {
    pub status: String,
    pub metric: String,
    pub details: Value,
    pub explanation: String,
}

impl From<&BiasReport> for FairnessView {
    fn from(report: &BiasReport) -> Self {
        Self {
            status: report.status.label().to_string(),
            metric: report.metric_name.to_string(),
            details: report.details(),
            explanation: report.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub schemes: Vec<SchemeResultView>,
    pub fairness: FairnessView,
    pub ethical_disclaimer: String,
    pub generated_at: DateTime<Utc>,
}

impl PredictResponse {
    pub fn from_result(result: &OrchestrationResult, generated_at: DateTime<Utc>) -> Self {
        Self {
            schemes: result.decisions.iter().map(SchemeResultView::from).collect(),
            fairness: FairnessView::from(&result.bias_report),
            ethical_disclaimer: result.ethical_disclaimer.clone(),
            generated_at,
        }
    }
}

/// Single-scheme check. Ineligible applicants get a zero benefit and no probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeCheckView {
    pub scheme: String,
    pub scheme_id: SchemeId,
    pub eligible: bool,
    pub rule_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_check: Option<String>,
    pub approval_probability: Option<f64>,
    pub expected_annual_benefit: f64,
    pub explanation: Option<ExplanationPayload>,
}

impl From<&SchemeEvaluation> for SchemeCheckView {
    fn from(evaluation: &SchemeEvaluation) -> Self {
        let decision = evaluation.decision.as_ref();
        Self {
            scheme: evaluation.scheme.label().to_string(),
            scheme_id: evaluation.scheme,
            eligible: evaluation.rule.eligible,
            rule_reason: evaluation.rule.reason.clone(),
            failed_check: evaluation.rule.failed_check.map(str::to_string),
            approval_probability: decision
                .map(|decision| to_percentage(decision.approval_probability)),
            expected_annual_benefit: decision.map_or(0.0, |decision| decision.expected_benefit),
            explanation: decision.map(|decision| decision.explanation.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeCatalogueEntry {
    pub scheme_id: SchemeId,
    pub display_name: String,
    pub benefit_amount: f64,
    pub fairness_threshold: f64,
    pub features: Vec<String>,
}

impl From<&SchemeDefinition> for SchemeCatalogueEntry {
    fn from(definition: &SchemeDefinition) -> Self {
        Self {
            scheme_id: definition.id,
            display_name: definition.display_name.clone(),
            benefit_amount: definition.benefit_amount,
            fairness_threshold: definition.fairness_threshold,
            features: definition
                .feature_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

/// Direct audit over caller-supplied outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessAuditRequest {
    pub predictions: Vec<u8>,
    pub group_labels: Vec<String>,
    #[serde(default)]
    pub allowed_diff: Option<f64>,
    #[serde(default)]
    pub warn_multiplier: Option<f64>,
}
