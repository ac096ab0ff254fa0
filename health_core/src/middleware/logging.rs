//! Request logging middleware

use axum::{extract::Request, middleware::Next, response::Response};
use http::StatusCode;
use std::time::Instant;

/// Logs one line per request. A 503 is the expected "dependency down"
/// answer for a health service, so it logs at warn rather than error.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status == StatusCode::SERVICE_UNAVAILABLE {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency_ms,
            "dependency reported unhealthy"
        );
    } else if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency_ms,
            "request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency_ms,
            "request processed"
        );
    }

    response
}
