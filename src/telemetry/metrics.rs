//! # Probe Counters
//!
//! Three monotonic counters, one per [`Classification`], held in a private
//! Prometheus registry. Counters are atomics, so `increment` from the probe path
//! and `snapshot`/`render` from the reporting path never block each other.

use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::constants::metrics::{AUTH_ERROR_SUFFIX, OTHER_ERROR_SUFFIX, SUCCESS_SUFFIX};
use crate::probe::Classification;

/// Point-in-time counter values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub success: u64,
    pub auth_error: u64,
    pub other_error: u64,
}

impl MetricsSnapshot {
    /// Sum of both error counters
    pub fn errors(&self) -> u64 {
        self.auth_error + self.other_error
    }
}

/// Process-wide outcome counters
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    success: IntCounter,
    auth_error: IntCounter,
    other_error: IntCounter,
}

impl MetricsRegistry {
    /// Create the registry with counters named `<prefix>_<suffix>`
    ///
    /// Fails only when the prefix yields an invalid metric name.
    pub fn new(prefix: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let success = register_counter(
            &registry,
            prefix,
            SUCCESS_SUFFIX,
            "Total number of successful connections and table operations",
        )?;
        let auth_error = register_counter(
            &registry,
            prefix,
            AUTH_ERROR_SUFFIX,
            "Total number of authentication errors when connecting",
        )?;
        let other_error = register_counter(
            &registry,
            prefix,
            OTHER_ERROR_SUFFIX,
            "Total number of other errors when connecting",
        )?;

        Ok(Self {
            registry,
            success,
            auth_error,
            other_error,
        })
    }

    /// Add one to the counter matching `kind`
    pub fn increment(&self, kind: Classification) {
        self.counter(kind).inc();
    }

    /// Read all three counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            success: self.success.get(),
            auth_error: self.auth_error.get(),
            other_error: self.other_error.get(),
        }
    }

    /// Text exposition of the current counter values
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Content type matching [`render`](Self::render) output
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    fn counter(&self, kind: Classification) -> &IntCounter {
        match kind {
            Classification::Success => &self.success,
            Classification::AuthError => &self.auth_error,
            Classification::OtherError => &self.other_error,
        }
    }
}

fn register_counter(
    registry: &Registry,
    prefix: &str,
    suffix: &str,
    help: &str,
) -> Result<IntCounter, prometheus::Error> {
    let counter = IntCounter::with_opts(Opts::new(format!("{prefix}_{suffix}"), help))?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}
