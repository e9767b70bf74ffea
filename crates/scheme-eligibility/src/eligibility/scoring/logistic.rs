use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::super::domain::SchemeId;
use super::super::features::FeatureVector;
use super::{ModelError, ModelStore, ProbabilityScorer};

/// Serialized logistic-regression artifact exported by the training pipeline.
///
/// Inputs are standardized with `(x - scaler_mean) / scaler_scale` before the linear term when
/// the scaler is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
}

impl LogisticModel {
    /// Checks the artifact against the scheme's published feature order.
    pub fn validate_for(&self, scheme: SchemeId) -> Result<(), String> {
        let expected = scheme.feature_names();
        if self.features.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(format!(
                "artifact features {:?} do not match scheme order {:?}",
                self.features, expected
            ));
        }

        let width = expected.len();
        if self.coefficients.len() != width {
            return Err(format!(
                "expected {width} coefficients, found {}",
                self.coefficients.len()
            ));
        }

        match (&self.scaler_mean, &self.scaler_scale) {
            (None, None) => {}
            (Some(mean), Some(scale)) => {
                if mean.len() != width || scale.len() != width {
                    return Err(format!("scaler must have {width} entries"));
                }
                if scale.iter().any(|value| *value == 0.0 || !value.is_finite()) {
                    return Err("scaler_scale entries must be finite and nonzero".to_string());
                }
            }
            _ => return Err("scaler_mean and scaler_scale must be provided together".to_string()),
        }

        let finite = self.intercept.is_finite() && self.coefficients.iter().all(|c| c.is_finite());
        if !finite {
            return Err("model parameters must be finite".to_string());
        }

        Ok(())
    }
}

/// Scorer backed by a validated [`LogisticModel`].
#[derive(Debug, Clone)]
pub struct LogisticScorer {
    model: LogisticModel,
}

impl LogisticScorer {
    pub fn new(scheme: SchemeId, model: LogisticModel) -> Result<Self, ModelError> {
        model
            .validate_for(scheme)
            .map_err(|detail| ModelError::unavailable(scheme, detail))?;
        Ok(Self { model })
    }

    fn standardized(&self, index: usize, value: f64) -> f64 {
        match (&self.model.scaler_mean, &self.model.scaler_scale) {
            (Some(mean), Some(scale)) => (value - mean[index]) / scale[index],
            _ => value,
        }
    }
}

impl ProbabilityScorer for LogisticScorer {
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        let logit = features
            .as_slice()
            .iter()
            .zip(&self.model.coefficients)
            .enumerate()
            .fold(self.model.intercept, |acc, (index, (value, weight))| {
                acc + weight * self.standardized(index, *value)
            });

        1.0 / (1.0 + (-logit).exp())
    }
}

/// Loads `<root>/<scheme_id>/model.json` artifacts.
#[derive(Debug, Clone)]
pub struct JsonModelStore {
    root: PathBuf,
}

impl JsonModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, scheme: SchemeId) -> PathBuf {
        self.root.join(scheme.as_str()).join("model.json")
    }
}

impl ModelStore for JsonModelStore {
    fn load(&self, scheme: SchemeId) -> Result<Arc<dyn ProbabilityScorer>, ModelError> {
        let path = self.path_for(scheme);
        let raw = fs::read_to_string(&path).map_err(|err| {
            let detail = if err.kind() == io::ErrorKind::NotFound {
                format!("model file not found at {}; train the model first", path.display())
            } else {
                format!("failed to read {}: {err}", path.display())
            };
            ModelError::unavailable(scheme, detail)
        })?;

        let model: LogisticModel = serde_json::from_str(&raw).map_err(|err| {
            ModelError::unavailable(scheme, format!("malformed artifact {}: {err}", path.display()))
        })?;

        Ok(Arc::new(LogisticScorer::new(scheme, model)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pm_kisan_model() -> LogisticModel {
        LogisticModel {
            features: SchemeId::PmKisan
                .feature_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            coefficients: vec![0.0, 0.0, 0.0, 0.0],
            intercept: 0.0,
            scaler_mean: None,
            scaler_scale: None,
        }
    }

    #[test]
    fn zero_model_predicts_even_odds() {
        let scorer = LogisticScorer::new(SchemeId::PmKisan, pm_kisan_model()).expect("valid");
        let probability =
            scorer.predict_probability(&FeatureVector::new(vec![2.0, 100_000.0, 1.0, 1.0]));
        assert!((probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn scaler_is_applied_before_weights() {
        let mut model = pm_kisan_model();
        model.coefficients = vec![0.0, -1.0, 0.0, 0.0];
        model.scaler_mean = Some(vec![0.0, 100_000.0, 0.0, 0.0]);
        model.scaler_scale = Some(vec![1.0, 50_000.0, 1.0, 1.0]);
        let scorer = LogisticScorer::new(SchemeId::PmKisan, model).expect("valid");

        let at_mean = scorer.predict_probability(&FeatureVector::new(vec![1.0, 100_000.0, 1.0, 1.0]));
        let richer = scorer.predict_probability(&FeatureVector::new(vec![1.0, 150_000.0, 1.0, 1.0]));

        assert!((at_mean - 0.5).abs() < 1e-12);
        let expected = 1.0 / (1.0 + 1.0_f64.exp());
        assert!((richer - expected).abs() < 1e-12);
    }

    #[test]
    fn reordered_features_are_rejected() {
        let mut model = pm_kisan_model();
        model.features.swap(0, 1);

        match LogisticScorer::new(SchemeId::PmKisan, model) {
            Err(ModelError::Unavailable { detail, .. }) => assert!(detail.contains("order")),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn half_specified_scaler_is_rejected() {
        let mut model = pm_kisan_model();
        model.scaler_mean = Some(vec![0.0; 4]);
        assert!(model.validate_for(SchemeId::PmKisan).is_err());
    }

    #[test]
    fn missing_artifact_is_unavailable() {
        let store = JsonModelStore::new("/nonexistent/models");
        match store.load(SchemeId::Nsp) {
            Err(ModelError::Unavailable { scheme, detail }) => {
                assert_eq!(scheme, SchemeId::Nsp);
                assert!(detail.contains("train the model first"));
            }
            Err(other) => panic!("expected unavailable, got {other:?}"),
            Ok(_) => panic!("expected unavailable, got a scorer"),
        }
    }
}
