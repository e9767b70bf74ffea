use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    ApplicantProfile, EligibilityDecision, RuleOutcome, SchemeEvaluation, SchemeId,
    SensitiveAttribute,
};
use super::explanation::ExplanationBuilder;
use super::fairness::{audit, BiasReport, FairnessPolicy};
use super::registry::{SchemeDefinition, SchemeRegistry};
use super::scoring::{ModelError, ModelRegistry, ModelStore};
use crate::config::FairnessConfig;

pub const DEFAULT_BATCH_DISCLAIMER: &str =
    "This tool is a demonstration and must not be used for official government decisions.";

/// Decisions for every scheme the applicant passed, plus one audit over the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationResult {
    pub decisions: Vec<EligibilityDecision>,
    pub bias_report: BiasReport,
    pub ethical_disclaimer: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("scheme {} is not registered", .0.as_str())]
    SchemeNotRegistered(SchemeId),
}

/// Fans a profile out over the registered schemes: rule gate, then scoring and explanation for
/// schemes that pass.
pub struct EligibilityOrchestrator<S> {
    schemes: Arc<SchemeRegistry>,
    models: Arc<ModelRegistry<S>>,
    explanations: ExplanationBuilder,
    fairness: FairnessConfig,
}

impl<S> EligibilityOrchestrator<S>
where
    S: ModelStore,
{
    pub fn new(
        schemes: Arc<SchemeRegistry>,
        models: Arc<ModelRegistry<S>>,
        fairness: FairnessConfig,
    ) -> Self {
        Self {
            schemes,
            models,
            explanations: ExplanationBuilder,
            fairness,
        }
    }

    pub fn registry(&self) -> &SchemeRegistry {
        &self.schemes
    }

    pub fn models(&self) -> &ModelRegistry<S> {
        &self.models
    }

    pub fn fairness(&self) -> FairnessConfig {
        self.fairness
    }

    /// Evaluates every registered scheme and audits the batch by declared gender.
    pub fn evaluate_all(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<OrchestrationResult, OrchestrationError> {
        self.evaluate_all_by(profile, SensitiveAttribute::Gender)
    }

    /// Like [`Self::evaluate_all`], grouping the audit by `attribute`.
    ///
    /// Every emitted decision enters the audit as an approval and every label is the
    /// applicant's own group, so a single-applicant batch always audits as one group. The
    /// audit therefore reports approval rates of emitted decisions, not of model outcomes.
    pub fn evaluate_all_by(
        &self,
        profile: &ApplicantProfile,
        attribute: SensitiveAttribute,
    ) -> Result<OrchestrationResult, OrchestrationError> {
        let mut decisions = Vec::with_capacity(self.schemes.len());

        for scheme in self.schemes.iter() {
            let rule = self.gate(scheme, profile);
            if rule.eligible {
                decisions.push(self.score(scheme, profile, &rule)?);
            }
        }

        let group = profile.sensitive.group_label(attribute);
        let predictions = vec![1_u8; decisions.len()];
        let labels = vec![group.as_str(); decisions.len()];

        let reference = self.schemes.definition(self.fairness.reference_scheme);
        let policy = FairnessPolicy::new(reference.fairness_threshold)
            .with_warn_multiplier(self.fairness.warn_multiplier);
        let bias_report = audit(&predictions, &labels, &policy);

        info!(
            decisions = decisions.len(),
            status = bias_report.status.label(),
            "eligibility batch evaluated"
        );

        let ethical_disclaimer = reference
            .ethical_disclaimer
            .clone()
            .unwrap_or_else(|| DEFAULT_BATCH_DISCLAIMER.to_string());

        Ok(OrchestrationResult {
            decisions,
            bias_report,
            ethical_disclaimer,
        })
    }

    /// Checks one registered scheme, keeping the rule outcome when the applicant fails it.
    pub fn evaluate_scheme(
        &self,
        profile: &ApplicantProfile,
        scheme: SchemeId,
    ) -> Result<SchemeEvaluation, OrchestrationError> {
        if !self.schemes.is_registered(scheme) {
            return Err(OrchestrationError::SchemeNotRegistered(scheme));
        }

        let definition = self.schemes.definition(scheme);
        let rule = self.gate(definition, profile);
        let decision = if rule.eligible {
            Some(self.score(definition, profile, &rule)?)
        } else {
            None
        };

        Ok(SchemeEvaluation {
            scheme,
            rule,
            decision,
        })
    }

    fn gate(&self, scheme: &SchemeDefinition, profile: &ApplicantProfile) -> RuleOutcome {
        let outcome = scheme.id.evaluate_rules(&profile.facts);
        debug!(
            scheme = scheme.id.as_str(),
            eligible = outcome.eligible,
            failed_check = outcome.failed_check.unwrap_or(""),
            "rule gate evaluated"
        );
        outcome
    }

    /// Only reached after the gate passed, so ineligible schemes never touch the scorer.
    fn score(
        &self,
        scheme: &SchemeDefinition,
        profile: &ApplicantProfile,
        rule: &RuleOutcome,
    ) -> Result<EligibilityDecision, OrchestrationError> {
        let features = scheme.id.extract_features(&profile.facts);
        let probability = self.models.score(scheme.id, &features)?;
        let explanation = self
            .explanations
            .build(scheme, rule.eligible, &rule.reason, probability);

        Ok(EligibilityDecision {
            scheme: scheme.id,
            display_name: scheme.display_name.clone(),
            rule_eligible: rule.eligible,
            rule_reason: rule.reason.clone(),
            approval_probability: probability,
            expected_benefit: scheme.benefit_amount,
            explanation,
        })
    }
}
