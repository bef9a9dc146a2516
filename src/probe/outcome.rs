use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, CredentialError, OperationError};

/// Stage of the probe that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStage {
    Credential,
    Client,
    Operation,
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential => write!(f, "credential"),
            Self::Client => write!(f, "client"),
            Self::Operation => write!(f, "operation"),
        }
    }
}

/// Raw result of one probe traversal, consumed by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The create call returned success
    Completed,
    CredentialFailed(CredentialError),
    ClientFailed(ClientError),
    OperationFailed(OperationError),
}

impl ProbeOutcome {
    /// Stage that failed, `None` when the create call succeeded
    pub fn failed_stage(&self) -> Option<ProbeStage> {
        match self {
            Self::Completed => None,
            Self::CredentialFailed(_) => Some(ProbeStage::Credential),
            Self::ClientFailed(_) => Some(ProbeStage::Client),
            Self::OperationFailed(_) => Some(ProbeStage::Operation),
        }
    }

    /// Original error text, for logs only
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Completed => None,
            Self::CredentialFailed(e) => Some(e.to_string()),
            Self::ClientFailed(e) => Some(e.to_string()),
            Self::OperationFailed(e) => Some(e.to_string()),
        }
    }
}

impl From<CredentialError> for ProbeOutcome {
    fn from(error: CredentialError) -> Self {
        Self::CredentialFailed(error)
    }
}

impl From<ClientError> for ProbeOutcome {
    fn from(error: ClientError) -> Self {
        Self::ClientFailed(error)
    }
}

impl From<OperationError> for ProbeOutcome {
    fn from(error: OperationError) -> Self {
        Self::OperationFailed(error)
    }
}
