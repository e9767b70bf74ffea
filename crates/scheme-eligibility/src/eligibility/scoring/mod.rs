//! Probability scorer contract and the per-process model cache.

mod logistic;

pub use logistic::{JsonModelStore, LogisticModel, LogisticScorer};

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::domain::SchemeId;
use super::features::FeatureVector;

/// Trained binary classifier for one scheme. Implementations are immutable once loaded.
pub trait ProbabilityScorer: Send + Sync {
    /// Probability of approval for `features`, deterministic for a fixed artifact.
    fn predict_probability(&self, features: &FeatureVector) -> f64;
}

/// Resolves a scheme to a freshly loaded scorer.
pub trait ModelStore: Send + Sync {
    fn load(&self, scheme: SchemeId) -> Result<Arc<dyn ProbabilityScorer>, ModelError>;
}

/// Scorer resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model unavailable for scheme {}: {detail}", .scheme.as_str())]
    Unavailable { scheme: SchemeId, detail: String },
    #[error("scorer for scheme {} returned a non-finite probability", .scheme.as_str())]
    InvalidProbability { scheme: SchemeId },
}

impl ModelError {
    pub fn unavailable(scheme: SchemeId, detail: impl Into<String>) -> Self {
        Self::Unavailable {
            scheme,
            detail: detail.into(),
        }
    }

    pub fn scheme(&self) -> SchemeId {
        match self {
            ModelError::Unavailable { scheme, .. } | ModelError::InvalidProbability { scheme } => {
                *scheme
            }
        }
    }
}

/// Lazily loads scorers through a [`ModelStore`] and caches them for the process lifetime.
///
/// Each scheme owns a slot with double-checked locking: concurrent callers for the same scheme
/// trigger a single store load and all observe the same `Arc`, while a cold load only blocks
/// callers of that scheme. Failed loads are not cached.
pub struct ModelRegistry<S> {
    store: S,
    slots: [RwLock<Option<Arc<dyn ProbabilityScorer>>>; SchemeId::COUNT],
}

impl<S> ModelRegistry<S>
where
    S: ModelStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            slots: std::array::from_fn(|_| RwLock::new(None)),
        }
    }

    pub fn scorer(&self, scheme: SchemeId) -> Result<Arc<dyn ProbabilityScorer>, ModelError> {
        if let Some(scorer) = self.cached(scheme) {
            return Ok(scorer);
        }

        // Slots are only ever filled whole, so a poisoned lock still guards a valid value.
        let mut slot = self.slots[scheme.index()]
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(scorer) = slot.as_ref() {
            return Ok(Arc::clone(scorer));
        }

        match self.store.load(scheme) {
            Ok(scorer) => {
                info!(scheme = scheme.as_str(), "scorer loaded");
                *slot = Some(Arc::clone(&scorer));
                Ok(scorer)
            }
            Err(err) => {
                warn!(scheme = scheme.as_str(), error = %err, "scorer load failed");
                Err(err)
            }
        }
    }

    /// Scores `features` with the scheme's scorer, clamping finite output into `[0, 1]`.
    pub fn score(&self, scheme: SchemeId, features: &FeatureVector) -> Result<f64, ModelError> {
        let probability = self.scorer(scheme)?.predict_probability(features);
        if !probability.is_finite() {
            return Err(ModelError::InvalidProbability { scheme });
        }
        Ok(probability.clamp(0.0, 1.0))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_loaded(&self, scheme: SchemeId) -> bool {
        self.cached(scheme).is_some()
    }

    /// Eagerly loads `schemes`, returning the failures without aborting on the first one.
    pub fn preload(&self, schemes: impl IntoIterator<Item = SchemeId>) -> Vec<ModelError> {
        schemes
            .into_iter()
            .filter_map(|scheme| self.scorer(scheme).err())
            .collect()
    }

    fn cached(&self, scheme: SchemeId) -> Option<Arc<dyn ProbabilityScorer>> {
        self.slots[scheme.index()]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
