//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Per-probe failures (`ProbeTimeout`, `Probe`) are contained by the
/// aggregator and converted into report data; they never surface through
/// HTTP. `DuplicateProbe` is fatal at startup. A dependency being down is
/// reported as 503 by the handlers, not raised as an error.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("duplicate probe name: {0}")]
    DuplicateProbe(String),

    #[error("probe timed out after {elapsed_ms}ms")]
    ProbeTimeout { elapsed_ms: u64 },

    #[error("probe check failed: {0}")]
    Probe(String),

    #[error("probe not found: {0}")]
    ProbeNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ProbeNotFound(name) => (
                StatusCode::NOT_FOUND,
                format!("probe '{}' is not registered", name),
            ),
            AppError::Serialization(err) => {
                tracing::error!("report serialization failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to serialize report".to_string(),
                )
            }
            AppError::Io(err) => {
                tracing::error!("IO error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::Other(err) => {
                tracing::error!("unexpected error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            // Startup-time and aggregation-internal errors; handlers never
            // return these.
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
