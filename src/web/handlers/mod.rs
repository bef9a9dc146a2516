//! # Reporting Interface Handlers
//!
//! Read-only views of the probe telemetry, grouped by concern.

pub mod health;
pub mod metrics;
