use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::{ApplicantProfile, ApplicantSubmission, SchemeId};
use super::fairness::{audit, AuditRecords, FairnessPolicy};
use super::orchestrator::{EligibilityOrchestrator, OrchestrationError};
use super::scoring::{ModelError, ModelStore};
use super::views::{
    FairnessAuditRequest, FairnessView, PredictResponse, SchemeCatalogueEntry, SchemeCheckView,
};

/// Router builder exposing eligibility and fairness endpoints.
pub fn eligibility_router<S>(orchestrator: Arc<EligibilityOrchestrator<S>>) -> Router
where
    S: ModelStore + 'static,
{
    Router::new()
        .route("/predict", post(predict_handler::<S>))
        .route("/api/v1/eligibility/predict", post(predict_handler::<S>))
        .route("/api/v1/eligibility/schemes", get(catalogue_handler::<S>))
        .route(
            "/api/v1/eligibility/schemes/:scheme_id/predict",
            post(scheme_check_handler::<S>),
        )
        .route("/api/v1/fairness/audit", post(audit_handler::<S>))
        .with_state(orchestrator)
}

pub(crate) async fn predict_handler<S>(
    State(orchestrator): State<Arc<EligibilityOrchestrator<S>>>,
    axum::Json(submission): axum::Json<ApplicantSubmission>,
) -> Response
where
    S: ModelStore + 'static,
{
    let profile = ApplicantProfile::from(submission);
    match orchestrator.evaluate_all(&profile) {
        Ok(result) => {
            let view = PredictResponse::from_result(&result, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => orchestration_error_response(error),
    }
}

pub(crate) async fn scheme_check_handler<S>(
    State(orchestrator): State<Arc<EligibilityOrchestrator<S>>>,
    Path(scheme_id): Path<String>,
    axum::Json(submission): axum::Json<ApplicantSubmission>,
) -> Response
where
    S: ModelStore + 'static,
{
    let Some(scheme) = SchemeId::parse(&scheme_id) else {
        let payload = json!({
            "error": format!("unknown scheme '{scheme_id}'"),
        });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    let profile = ApplicantProfile::from(submission);
    match orchestrator.evaluate_scheme(&profile, scheme) {
        Ok(evaluation) => {
            let view = SchemeCheckView::from(&evaluation);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => orchestration_error_response(error),
    }
}

pub(crate) async fn catalogue_handler<S>(
    State(orchestrator): State<Arc<EligibilityOrchestrator<S>>>,
) -> Response
where
    S: ModelStore + 'static,
{
    let entries: Vec<SchemeCatalogueEntry> = orchestrator
        .registry()
        .iter()
        .map(SchemeCatalogueEntry::from)
        .collect();
    (StatusCode::OK, axum::Json(json!({ "schemes": entries }))).into_response()
}

pub(crate) async fn audit_handler<S>(
    State(orchestrator): State<Arc<EligibilityOrchestrator<S>>>,
    axum::Json(request): axum::Json<FairnessAuditRequest>,
) -> Response
where
    S: ModelStore + 'static,
{
    if let Some(allowed_diff) = request.allowed_diff.filter(|value| *value < 0.0) {
        let payload = json!({
            "error": format!("allowed_diff must be non-negative (found {allowed_diff})"),
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }
    if let Some(multiplier) = request.warn_multiplier.filter(|value| *value < 1.0) {
        let payload = json!({
            "error": format!("warn_multiplier must be at least 1.0 (found {multiplier})"),
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }

    let fairness = orchestrator.fairness();
    let allowed_diff = request.allowed_diff.unwrap_or_else(|| {
        orchestrator
            .registry()
            .definition(fairness.reference_scheme)
            .fairness_threshold
    });
    let policy = FairnessPolicy::new(allowed_diff)
        .with_warn_multiplier(request.warn_multiplier.unwrap_or(fairness.warn_multiplier));

    let records = match AuditRecords::new(request.predictions, request.group_labels) {
        Ok(records) => records,
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    let report = audit(&records.predictions, &records.group_labels, &policy);
    (StatusCode::OK, axum::Json(FairnessView::from(&report))).into_response()
}

fn orchestration_error_response(error: OrchestrationError) -> Response {
    let status = match &error {
        OrchestrationError::Model(ModelError::Unavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        OrchestrationError::Model(ModelError::InvalidProbability { .. }) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        OrchestrationError::SchemeNotRegistered(_) => StatusCode::NOT_FOUND,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
