//! # Structured Logging Module
//!
//! Environment-aware console logging for a containerized probe. Logs go to
//! stdout; the orchestrator collects them. Raw error text only ever appears
//! here, never on the reporting interface.

use std::io::IsTerminal;
use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

use crate::constants::{defaults, env};
use crate::probe::ProbeStage;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process; later calls are no-ops
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var(env::LOG_FORMAT)
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(std::io::stdout().is_terminal())
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
            return;
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            json,
            "Structured logging initialized"
        );
    });
}

/// Current environment name from `PROBE_ENV`, then `APP_ENV`
///
/// Logging starts before configuration is loaded, so this reads the process
/// environment directly.
pub fn get_environment() -> String {
    resolve_environment(
        std::env::var(env::PROBE_ENV).ok(),
        std::env::var(env::APP_ENV).ok(),
    )
}

/// First non-empty of the two names, else the default environment
fn resolve_environment(probe_env: Option<String>, app_env: Option<String>) -> String {
    [probe_env, app_env]
        .into_iter()
        .flatten()
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| defaults::ENVIRONMENT.to_string())
}

/// Default log level for an environment
pub fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for one probe stage
pub fn log_probe_stage(probe_id: Uuid, stage: ProbeStage, status: &str, details: Option<&str>) {
    tracing::info!(
        probe_id = %probe_id,
        stage = %stage,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "PROBE_STAGE"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("test"), "debug");
    }

    #[test]
    fn test_environment_resolution() {
        assert_eq!(resolve_environment(None, None), "development");
        assert_eq!(
            resolve_environment(Some("production".to_string()), Some("test".to_string())),
            "production"
        );
        assert_eq!(resolve_environment(None, Some("test".to_string())), "test");
        assert_eq!(
            resolve_environment(Some(String::new()), Some("staging".to_string())),
            "staging"
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
        log_probe_stage(Uuid::new_v4(), ProbeStage::Credential, "acquired", None);
    }
}
