//! # Reporting Interface State
//!
//! Shared state handed to every handler: the probe telemetry, read-only.

use std::sync::Arc;

use crate::telemetry::ProbeTelemetry;

/// Shared application state for the reporting interface
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<ProbeTelemetry>,
}

impl AppState {
    pub fn new(telemetry: Arc<ProbeTelemetry>) -> Self {
        Self { telemetry }
    }
}
