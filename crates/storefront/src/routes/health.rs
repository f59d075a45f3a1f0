//! Liveness and readiness checks.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check. Does not touch the data file.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check.
///
/// Returns 503 Service Unavailable if the data file cannot be read or parsed.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
