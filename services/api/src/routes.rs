use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use scheme_eligibility::eligibility::{eligibility_router, EligibilityOrchestrator, ModelStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(orchestrator: Arc<EligibilityOrchestrator<S>>) -> axum::Router
where
    S: ModelStore + 'static,
{
    eligibility_router(orchestrator)
        .route("/", axum::routing::get(banner))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn banner() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Scheme eligibility orchestrator is running.",
        "endpoints": [
            "POST /predict",
            "POST /api/v1/eligibility/predict",
            "POST /api/v1/eligibility/schemes/:scheme_id/predict",
            "GET /api/v1/eligibility/schemes",
            "POST /api/v1/fairness/audit"
        ]
    }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
