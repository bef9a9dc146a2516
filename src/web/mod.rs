//! # Reporting Interface
//!
//! Axum HTTP surface exposing the probe telemetry to scrapers and the
//! hosting orchestrator.
//!
//! - `GET /metrics` - counter exposition
//! - `GET /health` - latched probe health (`200 healthy` / `503 unhealthy`)
//! - `GET /ready` - always `200 ready`
//!
//! Handlers only read atomics, so they stay responsive while the probe's
//! network call is in flight.

pub mod handlers;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use state::AppState;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, Span};

/// Create the reporting application with all routes and the trace layer
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::metrics_routes())
        .layer(TraceLayer::new_for_http().on_failure(on_request_failure))
        .with_state(app_state)
}

/// `503` is the latched liveness answer, not a server fault
fn is_reported_unhealthy(failure: &ServerErrorsFailureClass) -> bool {
    matches!(
        failure,
        ServerErrorsFailureClass::StatusCode(status) if *status == StatusCode::SERVICE_UNAVAILABLE
    )
}

fn on_request_failure(failure: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    let latency_ms = latency.as_millis() as u64;
    if is_reported_unhealthy(&failure) {
        debug!(latency_ms, "Reported unhealthy");
    } else {
        error!(classification = %failure, latency_ms, "Reporting request failed");
    }
}
