//! # Probe Telemetry
//!
//! The shared service object owning the outcome counters and the health latch.
//! It is handed by `Arc` to both execution paths: the probe writes through
//! [`ProbeTelemetry::record`], the reporting interface only reads.

pub mod health;
pub mod metrics;

pub use health::{HealthState, HealthStatus};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

use std::sync::atomic::{AtomicBool, Ordering};

use crate::probe::Classification;

/// Counters plus health latch
#[derive(Debug)]
pub struct ProbeTelemetry {
    metrics: MetricsRegistry,
    health: HealthState,
    recorded: AtomicBool,
}

impl ProbeTelemetry {
    /// Build telemetry with counters named after `metric_prefix`
    pub fn new(metric_prefix: &str) -> Result<Self, prometheus::Error> {
        Ok(Self {
            metrics: MetricsRegistry::new(metric_prefix)?,
            health: HealthState::new(),
            recorded: AtomicBool::new(false),
        })
    }

    /// Apply the process's probe outcome: counter first, then the health latch.
    ///
    /// A reader that observes `Unhealthy` is guaranteed to also observe the
    /// incremented error counter. Only the first outcome is applied; later
    /// calls change nothing and return `false`.
    pub fn record(&self, classification: Classification) -> bool {
        if self.recorded.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.metrics.increment(classification);
        if !classification.is_success() {
            self.health.mark_unhealthy();
        }
        true
    }

    /// Whether an outcome has been recorded
    pub fn is_recorded(&self) -> bool {
        self.recorded.load(Ordering::Acquire)
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }
}
