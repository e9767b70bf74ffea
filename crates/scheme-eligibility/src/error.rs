use crate::config::ConfigError;
use crate::eligibility::fairness::AuditInputError;
use crate::eligibility::orchestrator::OrchestrationError;
use crate::eligibility::scoring::ModelError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Orchestration(OrchestrationError),
    Audit(AuditInputError),
    Input(serde_json::Error),
    Output(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Orchestration(err) => write!(f, "eligibility error: {}", err),
            AppError::Audit(err) => write!(f, "audit input error: {}", err),
            AppError::Input(err) => write!(f, "invalid applicant profile: {}", err),
            AppError::Output(err) => write!(f, "failed to render output: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Orchestration(err) => Some(err),
            AppError::Audit(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Audit(_) | AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Orchestration(OrchestrationError::Model(ModelError::Unavailable {
                ..
            })) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Orchestration(OrchestrationError::SchemeNotRegistered(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Orchestration(OrchestrationError::Model(
                ModelError::InvalidProbability { .. },
            ))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Output(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<OrchestrationError> for AppError {
    fn from(value: OrchestrationError) -> Self {
        Self::Orchestration(value)
    }
}

impl From<ModelError> for AppError {
    fn from(value: ModelError) -> Self {
        Self::Orchestration(OrchestrationError::Model(value))
    }
}

impl From<AuditInputError> for AppError {
    fn from(value: AuditInputError) -> Self {
        Self::Audit(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}
