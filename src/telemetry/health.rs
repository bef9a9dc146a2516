//! # Health Latch
//!
//! One-way health flag: starts healthy, can only move to unhealthy.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Externally visible health value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Latched health state, single writer and many readers
#[derive(Debug)]
pub struct HealthState {
    unhealthy: AtomicBool,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            unhealthy: AtomicBool::new(false),
        }
    }

    /// Latch to unhealthy. Returns `true` only for the call that flipped the flag.
    pub fn mark_unhealthy(&self) -> bool {
        !self.unhealthy.swap(true, Ordering::Release)
    }

    pub fn is_healthy(&self) -> bool {
        !self.unhealthy.load(Ordering::Acquire)
    }

    pub fn status(&self) -> HealthStatus {
        if self.is_healthy() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
