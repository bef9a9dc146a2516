//! # Probe Outcome Classification
//!
//! Maps a [`ProbeOutcome`] onto the fixed `Success | AuthError | OtherError`
//! taxonomy.
//!
//! ## Rule pipeline
//!
//! Evaluated in order, first match wins:
//!
//! ```text
//! 1. completed, 409 status, or TableAlreadyExists code  -> Success
//! 2. 401 / 403 status                                   -> AuthError
//! 3. no status, message names an auth failure           -> AuthError
//! 4. message says "already exists"                      -> Success
//! 5. credential failure                                 -> AuthError
//! 6. anything else                                      -> OtherError
//! ```
//!
//! Rules 3 and 4 are the degraded path for transports that surface no
//! structured status or code. Rule 3 never runs when a status is present.
//!
//! Credential failures are dispatched to rule 5 by variant, so they never
//! reach the message rules. Client construction failures are classified by
//! the configured [`ClientErrorPolicy`].
//!
//! ## Usage
//!
//! ```rust
//! use cosmos_probe::error::OperationError;
//! use cosmos_probe::probe::{Classification, OutcomeClassifier, ProbeOutcome, StandardClassifier};
//!
//! let classifier = StandardClassifier::new();
//! let outcome = ProbeOutcome::OperationFailed(OperationError::from_response(
//!     403,
//!     Some("AuthorizationPermissionMismatch".to_string()),
//!     "This request is not authorized to perform this operation",
//! ));
//!
//! assert_eq!(classifier.classify(&outcome), Classification::AuthError);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{keywords, table};
use crate::error::OperationError;
use crate::probe::outcome::ProbeOutcome;

/// Final outcome taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Success,
    AuthError,
    OtherError,
}

impl Classification {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::AuthError => write!(f, "auth_error"),
            Self::OtherError => write!(f, "other_error"),
        }
    }
}

/// How a client construction failure is classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientErrorPolicy {
    #[default]
    OtherError,
    AuthError,
}

impl ClientErrorPolicy {
    fn classification(self) -> Classification {
        match self {
            Self::OtherError => Classification::OtherError,
            Self::AuthError => Classification::AuthError,
        }
    }
}

impl fmt::Display for ClientErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OtherError => write!(f, "other_error"),
            Self::AuthError => write!(f, "auth_error"),
        }
    }
}

impl FromStr for ClientErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "other_error" | "other" => Ok(Self::OtherError),
            "auth_error" | "auth" => Ok(Self::AuthError),
            _ => Err(format!(
                "Invalid client error policy: {s} (expected other_error or auth_error)"
            )),
        }
    }
}

/// Which pipeline rule decided a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedRule {
    Completed,
    StructuredAlreadyExists,
    StructuredAuthStatus,
    AuthKeyword,
    AlreadyExistsKeyword,
    CredentialFailure,
    ClientErrorPolicy,
    Unrecognized,
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Completed => "completed",
            Self::StructuredAlreadyExists => "structured_already_exists",
            Self::StructuredAuthStatus => "structured_auth_status",
            Self::AuthKeyword => "auth_keyword",
            Self::AlreadyExistsKeyword => "already_exists_keyword",
            Self::CredentialFailure => "credential_failure",
            Self::ClientErrorPolicy => "client_error_policy",
            Self::Unrecognized => "unrecognized",
        };
        write!(f, "{name}")
    }
}

/// Classification plus the rule that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub classification: Classification,
    pub rule: MatchedRule,
}

impl Verdict {
    fn new(classification: Classification, rule: MatchedRule) -> Self {
        Self {
            classification,
            rule,
        }
    }
}

/// Trait for outcome classification strategies
pub trait OutcomeClassifier: Send + Sync {
    /// Classify an outcome and report which rule matched
    fn evaluate(&self, outcome: &ProbeOutcome) -> Verdict;

    /// Classifier name for logs
    fn classifier_name(&self) -> &'static str;

    fn classify(&self, outcome: &ProbeOutcome) -> Classification {
        self.evaluate(outcome).classification
    }
}

/// Structured-first classifier with string-matching fallback
#[derive(Debug, Clone, Default)]
pub struct StandardClassifier {
    client_error_policy: ClientErrorPolicy,
}

impl StandardClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client_error_policy(client_error_policy: ClientErrorPolicy) -> Self {
        Self {
            client_error_policy,
        }
    }

    fn evaluate_operation_error(&self, error: &OperationError) -> Verdict {
        if is_structured_already_exists(error) {
            return Verdict::new(Classification::Success, MatchedRule::StructuredAlreadyExists);
        }

        if matches!(error.status, Some(401) | Some(403)) {
            return Verdict::new(Classification::AuthError, MatchedRule::StructuredAuthStatus);
        }

        let message = error.message.to_lowercase();

        if error.status.is_none()
            && keywords::AUTH_FAILURE
                .iter()
                .any(|keyword| message.contains(keyword))
        {
            return Verdict::new(Classification::AuthError, MatchedRule::AuthKeyword);
        }

        if message.contains(keywords::ALREADY_EXISTS) {
            return Verdict::new(Classification::Success, MatchedRule::AlreadyExistsKeyword);
        }

        Verdict::new(Classification::OtherError, MatchedRule::Unrecognized)
    }
}

impl OutcomeClassifier for StandardClassifier {
    fn evaluate(&self, outcome: &ProbeOutcome) -> Verdict {
        match outcome {
            ProbeOutcome::Completed => Verdict::new(Classification::Success, MatchedRule::Completed),
            ProbeOutcome::OperationFailed(error) => self.evaluate_operation_error(error),
            ProbeOutcome::CredentialFailed(_) => {
                Verdict::new(Classification::AuthError, MatchedRule::CredentialFailure)
            }
            ProbeOutcome::ClientFailed(_) => Verdict::new(
                self.client_error_policy.classification(),
                MatchedRule::ClientErrorPolicy,
            ),
        }
    }

    fn classifier_name(&self) -> &'static str {
        "standard"
    }
}

fn is_structured_already_exists(error: &OperationError) -> bool {
    error.status == Some(409) || error.error_code.as_deref() == Some(table::ALREADY_EXISTS_CODE)
}
