use serde::{Deserialize, Serialize};
use std::fmt;

/// Probe lifecycle states, traversed once per process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    /// Nothing attempted yet
    #[default]
    Idle,
    /// Managed identity issued a credential
    CredentialAcquired,
    /// Store client constructed
    ClientReady,
    /// Create call returned, successfully or not
    Probed,
    /// Outcome classified and recorded
    Reported,
}

impl ProbeState {
    /// Check if this is the terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Reported)
    }

    /// Legal next states. Failures before the create call skip straight to `Reported`.
    pub fn can_transition_to(&self, next: ProbeState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::CredentialAcquired)
                | (Self::Idle, Self::Reported)
                | (Self::CredentialAcquired, Self::ClientReady)
                | (Self::CredentialAcquired, Self::Reported)
                | (Self::ClientReady, Self::Probed)
                | (Self::Probed, Self::Reported)
        )
    }
}

impl fmt::Display for ProbeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::CredentialAcquired => write!(f, "credential_acquired"),
            Self::ClientReady => write!(f, "client_ready"),
            Self::Probed => write!(f, "probed"),
            Self::Reported => write!(f, "reported"),
        }
    }
}
