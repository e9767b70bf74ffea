use metrics_exporter_prometheus::PrometheusHandle;
use scheme_eligibility::config::AppConfig;
use scheme_eligibility::eligibility::{
    EligibilityOrchestrator, FileMetadataStore, JsonModelStore, ModelRegistry, SchemeRegistry,
    SensitiveAttribute,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the file-backed stores named in the configuration into an orchestrator.
pub(crate) fn build_orchestrator(config: &AppConfig) -> EligibilityOrchestrator<JsonModelStore> {
    let metadata = FileMetadataStore::new(&config.stores.metadata_dir);
    let schemes = Arc::new(SchemeRegistry::standard(&metadata));
    let models = Arc::new(ModelRegistry::new(JsonModelStore::new(
        &config.stores.model_dir,
    )));
    EligibilityOrchestrator::new(schemes, models, config.fairness)
}

pub(crate) fn parse_attribute(raw: &str) -> Result<SensitiveAttribute, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "gender" => Ok(SensitiveAttribute::Gender),
        "disability" | "disability_status" => Ok(SensitiveAttribute::DisabilityStatus),
        other => Err(format!(
            "unknown sensitive attribute '{other}' (expected gender or disability_status)"
        )),
    }
}

pub(crate) fn parse_allowed_diff(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("allowed difference must be non-negative (found {raw})"))
    }
}

pub(crate) fn parse_warn_multiplier(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if value.is_finite() && value >= 1.0 {
        Ok(value)
    } else {
        Err(format!("warn multiplier must be at least 1.0 (found {raw})"))
    }
}
