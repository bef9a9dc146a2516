//! # Health Check Handlers
//!
//! Orchestrator-facing liveness and readiness endpoints.
//!
//! `/health` follows the latched probe outcome. `/ready` only reports that the
//! reporting path is serving and never reflects the probe, so a failed
//! instance stays scrapable.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;

use crate::constants::responses;
use crate::web::state::AppState;

/// Liveness probe: GET /health
///
/// `200 healthy` until the probe records a non-success outcome, `503 unhealthy` after.
pub async fn liveness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.telemetry.health().is_healthy() {
        (StatusCode::OK, responses::HEALTHY)
    } else {
        debug!("Health check reporting unhealthy");
        (StatusCode::SERVICE_UNAVAILABLE, responses::UNHEALTHY)
    }
}

/// Readiness probe: GET /ready
pub async fn readiness() -> (StatusCode, &'static str) {
    (StatusCode::OK, responses::READY)
}
