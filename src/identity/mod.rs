//! # Workload Identity
//!
//! Credential acquisition for the probe. A [`Credential`] is acquired once,
//! handed to the store client, and dropped with it after the single create call.

pub mod managed_identity;

pub use managed_identity::{ManagedIdentityCredentialProvider, TokenEndpoint};

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CredentialError;

/// Access token issued for the probe's identity
#[derive(Clone)]
pub struct Credential {
    access_token: String,
    expires_on: Option<DateTime<Utc>>,
    identity: Option<String>,
}

impl Credential {
    pub fn new(
        access_token: impl Into<String>,
        expires_on: Option<DateTime<Utc>>,
        identity: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            expires_on,
            identity,
        }
    }

    /// Bearer token value for the `Authorization` header
    pub fn bearer_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.expires_on
    }

    /// Explicit identity selector, `None` for the host default identity
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .field("identity", &self.identity)
            .finish()
    }
}

/// Source of workload-identity credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Acquire a credential, scoped to `selector` when one is given.
    ///
    /// No retries: a single failure is reported as-is.
    async fn acquire(&self, selector: Option<&str>) -> Result<Credential, CredentialError>;

    /// Provider name for logs
    fn provider_name(&self) -> &'static str;
}

/// Reject selectors that cannot name a managed identity
pub fn validate_selector(selector: &str) -> Result<(), CredentialError> {
    if selector.trim().is_empty() {
        return Err(CredentialError::MalformedSelector {
            selector: selector.to_string(),
            reason: "selector is empty".to_string(),
        });
    }

    if let Some(bad) = selector
        .chars()
        .find(|c| c.is_whitespace() || c.is_control())
    {
        return Err(CredentialError::MalformedSelector {
            selector: selector.to_string(),
            reason: format!("selector contains invalid character {bad:?}"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("super-secret", None, Some("client".to_string()));
        let debug = format!("{credential:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(credential.bearer_token(), "super-secret");
        assert_eq!(credential.identity(), Some("client"));
    }

    #[test]
    fn test_selector_validation() {
        assert!(validate_selector("11111111-2222-3333-4444-555555555555").is_ok());
        assert!(matches!(
            validate_selector(""),
            Err(CredentialError::MalformedSelector { .. })
        ));
        assert!(matches!(
            validate_selector("  "),
            Err(CredentialError::MalformedSelector { .. })
        ));
        assert!(matches!(
            validate_selector("abc def"),
            Err(CredentialError::MalformedSelector { .. })
        ));
    }
}
