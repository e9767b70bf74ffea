use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::config::FairnessConfig;
use crate::eligibility::domain::{ApplicantProfile, ApplicantSubmission, SchemeId};
use crate::eligibility::features::FeatureVector;
use crate::eligibility::metadata::{
    FairnessPolicyMetadata, SchemeMetadata, StaticMetadataStore,
};
use crate::eligibility::orchestrator::EligibilityOrchestrator;
use crate::eligibility::registry::SchemeRegistry;
use crate::eligibility::scoring::{ModelError, ModelRegistry, ModelStore, ProbabilityScorer};

pub(super) const FIXED_PROBABILITY: f64 = 0.62;

pub(super) fn farmer_submission() -> ApplicantSubmission {
    ApplicantSubmission {
        age: 45,
        annual_income: 120_000.0,
        gender: "female".to_string(),
        state: "Bihar".to_string(),
        occupation: "Farmer".to_string(),
        land_holding_acres: Some(2.5),
        disability_status: None,
        has_family_id: Some(true),
    }
}

pub(super) fn farmer_profile() -> ApplicantProfile {
    ApplicantProfile::from(farmer_submission())
}

/// Fails the first check of every catalogued scheme.
pub(super) fn ineligible_everywhere() -> ApplicantProfile {
    ApplicantProfile::from(ApplicantSubmission {
        age: 0,
        occupation: "trader".to_string(),
        gender: "male".to_string(),
        ..ApplicantSubmission::default()
    })
}

/// Scorer returning a fixed probability and counting every call.
pub(super) struct CountingScorer {
    probability: f64,
    calls: Arc<AtomicUsize>,
}

impl ProbabilityScorer for CountingScorer {
    fn predict_probability(&self, _features: &FeatureVector) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.probability
    }
}

#[derive(Default)]
pub(super) struct CountingStore {
    pub(super) loads: AtomicUsize,
    pub(super) predictions: Arc<AtomicUsize>,
    pub(super) missing: BTreeSet<SchemeId>,
}

impl CountingStore {
    pub(super) fn without(schemes: &[SchemeId]) -> Self {
        Self {
            missing: schemes.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl ModelStore for CountingStore {
    fn load(&self, scheme: SchemeId) -> Result<Arc<dyn ProbabilityScorer>, ModelError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.missing.contains(&scheme) {
            return Err(ModelError::unavailable(scheme, "model file not found"));
        }
        Ok(Arc::new(CountingScorer {
            probability: FIXED_PROBABILITY,
            calls: Arc::clone(&self.predictions),
        }))
    }
}

pub(super) fn metadata_store() -> StaticMetadataStore {
    StaticMetadataStore::default().with(
        SchemeId::PmKisan,
        SchemeMetadata {
            fairness_policy: Some(FairnessPolicyMetadata {
                allowed_bias_threshold: Some(0.08),
                sensitive_attributes: vec!["gender".to_string()],
            }),
            ethical_disclaimer: Some("Advisory output only.".to_string()),
            ..SchemeMetadata::default()
        },
    )
}

pub(super) fn build_orchestrator(
    store: CountingStore,
) -> (EligibilityOrchestrator<CountingStore>, Arc<ModelRegistry<CountingStore>>) {
    let schemes = Arc::new(SchemeRegistry::standard(&metadata_store()));
    let models = Arc::new(ModelRegistry::new(store));
    let orchestrator =
        EligibilityOrchestrator::new(schemes, Arc::clone(&models), FairnessConfig::default());
    (orchestrator, models)
}

pub(super) fn prediction_count(models: &ModelRegistry<CountingStore>) -> usize {
    models.store().predictions.load(Ordering::SeqCst)
}

pub(super) fn load_count(models: &ModelRegistry<CountingStore>) -> usize {
    models.store().loads.load(Ordering::SeqCst)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
