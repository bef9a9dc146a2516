//! # Reporting Interface Routes

use axum::routing::get;
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Liveness and readiness routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::liveness))
        .route("/ready", get(handlers::health::readiness))
}

/// Counter exposition route
pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(handlers::metrics::metrics))
}
