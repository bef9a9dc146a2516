//! # Metrics Handler
//!
//! Text exposition of the outcome counters for the metrics-collection tier.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::web::state::AppState;

/// Counter exposition: GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Response {
    let registry = state.telemetry.metrics();
    match registry.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, registry.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to encode metrics",
            )
                .into_response()
        }
    }
}
