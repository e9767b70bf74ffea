//! Rule-gated scheme eligibility, probability scoring, explanations, and fairness audits.
//!
//! Applicant submissions are split into non-sensitive facts, which schemes and scorers see, and
//! sensitive attributes, which only the fairness auditor sees.

pub mod domain;
pub mod explanation;
pub mod fairness;
pub mod features;
pub mod metadata;
pub mod orchestrator;
pub mod registry;
pub mod router;
pub(crate) mod rules;
pub mod schemes;
pub mod scoring;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantFacts, ApplicantProfile, ApplicantSubmission, EligibilityDecision, Occupation,
    RuleOutcome, SchemeEvaluation, SchemeId, SensitiveAttribute, SensitiveAttributes,
};
pub use explanation::{ExplanationBuilder, ExplanationPayload, ProbabilityBand};
pub use fairness::{
    audit, read_audit_records, AuditInputError, AuditRecords, AuditStatus, BiasReport,
    FairnessPolicy, GroupRates,
};
pub use features::FeatureVector;
pub use metadata::{FileMetadataStore, MetadataStore, SchemeMetadata, StaticMetadataStore};
pub use orchestrator::{EligibilityOrchestrator, OrchestrationError, OrchestrationResult};
pub use registry::{SchemeDefinition, SchemeRegistry};
pub use router::eligibility_router;
pub use scoring::{
    JsonModelStore, LogisticModel, LogisticScorer, ModelError, ModelRegistry, ModelStore,
    ProbabilityScorer,
};
pub use views::{
    to_percentage, FairnessAuditRequest, FairnessView, PredictResponse, SchemeCatalogueEntry,
    SchemeCheckView, SchemeResultView,
};
