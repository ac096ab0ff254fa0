//! Health endpoint handlers
//!
//! Every request triggers a fresh aggregation run; there is no caching
//! layer, so rapid polling re-executes every probe each time.

use crate::{
    error::{AppError, Result},
    health::{reporter, HealthStatus},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

fn status_code_for(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// 200 when everything is healthy, 503 otherwise, with a minimal body.
pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.aggregator.run().await;

    (
        status_code_for(report.overall_status),
        Json(json!({ "status": report.overall_status })),
    )
}

/// Always 200; the body is the stable machine-readable report.
pub async fn handle_health_info(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let report = state.aggregator.run().await;
    let body = reporter::to_machine_readable(&report)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Dashboard payload; only a fully unhealthy report turns into a 503.
pub async fn handle_health_ui(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let report = state.aggregator.run().await;
    let body = reporter::to_ui_format(&report)?;

    let status_code = if report.overall_status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    Ok((
        status_code,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    ))
}

/// Runs one probe by name; 404 for names that were never registered.
pub async fn handle_probe_health(
    State(state): State<AppState>,
    Path(probe): Path<String>,
) -> Result<impl IntoResponse> {
    info!("checking single probe '{}'", probe);

    match state.aggregator.run_probe(&probe).await {
        Some(result) => Ok((status_code_for(result.status), Json(result))),
        None => Err(AppError::ProbeNotFound(probe)),
    }
}
