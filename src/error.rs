//! Error types for the probe.
//!
//! Two tiers: [`ProbeError`] is fatal and terminates the process before any
//! probe runs; [`CredentialError`], [`ClientError`] and [`OperationError`] are
//! recoverable and are always converted into a
//! [`Classification`](crate::probe::Classification) by the runner.

use std::net::SocketAddr;
use thiserror::Error;
use uuid::Uuid;

/// Fatal startup errors
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind reporting listener on {address}: {source}")]
    Listener {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Probe {probe_id} already ran in this process; restart for a new trial")]
    AlreadyProbed { probe_id: Uuid },
}

/// Configuration loading failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{variable} environment variable is required")]
    MissingRequired { variable: &'static str },

    #[error("Invalid value for {variable}: {reason}")]
    InvalidValue {
        variable: &'static str,
        reason: String,
    },

    #[error("Failed to read configuration source: {0}")]
    Source(String),
}

/// Managed identity credential acquisition failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Malformed identity selector {selector:?}: {reason}")]
    MalformedSelector { selector: String, reason: String },

    #[error("Managed identity endpoint unreachable: {0}")]
    EndpointUnreachable(String),

    #[error("Managed identity unavailable (HTTP {status}): {message}")]
    IdentityUnavailable { status: u16, message: String },

    #[error("Invalid token response from managed identity endpoint: {0}")]
    InvalidTokenResponse(String),
}

/// Failures while constructing the store client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Invalid account endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to build transport: {0}")]
    Transport(String),
}

/// Failure of the create-resource call itself
///
/// `status` and `error_code` are only present when the store replied with a
/// structured error; transport failures carry just the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    pub message: String,
    pub status: Option<u16>,
    pub error_code: Option<String>,
}

impl OperationError {
    /// Error reported by the store with an HTTP status and optional error code
    pub fn from_response(
        status: u16,
        error_code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            error_code,
        }
    }

    /// Error with no structured signal (connect, DNS, TLS, body read)
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            error_code: None,
        }
    }
}

pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::MissingRequired {
            variable: "COSMOS_ACCOUNT_URL",
        };
        assert_eq!(
            err.to_string(),
            "COSMOS_ACCOUNT_URL environment variable is required"
        );

        let err = OperationError::from_response(409, Some("TableAlreadyExists".into()), "conflict");
        assert_eq!(err.to_string(), "conflict");
        assert_eq!(err.status, Some(409));
    }

    #[test]
    fn test_config_error_converts_to_fatal() {
        let err: ProbeError = ConfigError::MissingRequired {
            variable: "COSMOS_ACCOUNT_URL",
        }
        .into();
        assert!(matches!(err, ProbeError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_transport_error_has_no_structured_signal() {
        let err = OperationError::transport("connection refused");
        assert!(err.status.is_none());
        assert!(err.error_code.is_none());
    }
}
