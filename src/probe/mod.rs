//! # Probe Engine
//!
//! - [`error_classifier`] - Outcome → classification rule pipeline
//! - [`outcome`] - Raw probe outcome and failing stage
//! - [`states`] - Run-once lifecycle states
//! - [`runner`] - State machine driving one probe

pub mod error_classifier;
pub mod outcome;
pub mod runner;
pub mod states;

pub use error_classifier::{
    Classification, ClientErrorPolicy, MatchedRule, OutcomeClassifier, StandardClassifier, Verdict,
};
pub use outcome::{ProbeOutcome, ProbeStage};
pub use runner::{ProbeDependencies, ProbeReport, ProbeRunner, ProbeTarget};
pub use states::ProbeState;
