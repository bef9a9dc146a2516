//! # Probe Runner
//!
//! Run-once state machine: credential → client → create call → classification
//! → recorded outcome.
//!
//! ```text
//! Idle ──▶ CredentialAcquired ──▶ ClientReady ──▶ Probed ──▶ Reported
//!   │               │                                           ▲
//!   └───────────────┴──────────── failure ──────────────────────┘
//! ```
//!
//! [`ProbeRunner::run`] consumes the runner, so one runner performs exactly one
//! traversal. Getting a new trial means starting a new process.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::identity::CredentialProvider;
use crate::logging::log_probe_stage;
use crate::probe::error_classifier::{Classification, MatchedRule, OutcomeClassifier};
use crate::probe::outcome::{ProbeOutcome, ProbeStage};
use crate::probe::states::ProbeState;
use crate::store::ResourceConnector;
use crate::telemetry::ProbeTelemetry;

/// What the probe targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub endpoint: String,
    pub resource_name: String,
    pub identity: Option<String>,
}

/// External collaborators used by the runner
#[derive(Clone)]
pub struct ProbeDependencies {
    pub credentials: Arc<dyn CredentialProvider>,
    pub connector: Arc<dyn ResourceConnector>,
    pub classifier: Arc<dyn OutcomeClassifier>,
}

/// Summary of a finished traversal
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub probe_id: Uuid,
    pub classification: Classification,
    pub rule: MatchedRule,
    pub failed_stage: Option<ProbeStage>,
    pub transitions: Vec<ProbeState>,
    pub duration: Duration,
}

pub struct ProbeRunner {
    probe_id: Uuid,
    target: ProbeTarget,
    dependencies: ProbeDependencies,
    telemetry: Arc<ProbeTelemetry>,
    state: ProbeState,
    transitions: Vec<ProbeState>,
}

impl ProbeRunner {
    pub fn new(
        target: ProbeTarget,
        dependencies: ProbeDependencies,
        telemetry: Arc<ProbeTelemetry>,
    ) -> Self {
        Self {
            probe_id: Uuid::new_v4(),
            target,
            dependencies,
            telemetry,
            state: ProbeState::Idle,
            transitions: vec![ProbeState::Idle],
        }
    }

    pub fn probe_id(&self) -> Uuid {
        self.probe_id
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// Execute the probe once and record its outcome.
    ///
    /// Never fails: every credential, client and operation error is converted
    /// into a [`Classification`]. No timeout is applied to the remote calls.
    pub async fn run(mut self) -> ProbeReport {
        let started = Instant::now();
        info!(
            probe_id = %self.probe_id,
            endpoint = %self.target.endpoint,
            resource = %self.target.resource_name,
            identity = self.target.identity.as_deref().unwrap_or("<default>"),
            provider = self.dependencies.credentials.provider_name(),
            classifier = self.dependencies.classifier.classifier_name(),
            "Starting connectivity probe"
        );

        let outcome = self.execute().await;
        let verdict = self.dependencies.classifier.evaluate(&outcome);

        if !self.telemetry.record(verdict.classification) {
            warn!(
                probe_id = %self.probe_id,
                classification = %verdict.classification,
                "Outcome already recorded for this process, counters unchanged"
            );
        }
        self.transition(ProbeState::Reported);

        let failed_stage = outcome.failed_stage();
        match outcome.error_message() {
            None => info!(
                probe_id = %self.probe_id,
                classification = %verdict.classification,
                rule = %verdict.rule,
                "Probe succeeded"
            ),
            Some(message) if verdict.classification.is_success() => info!(
                probe_id = %self.probe_id,
                classification = %verdict.classification,
                rule = %verdict.rule,
                resource = %self.target.resource_name,
                detail = %message,
                "Resource already exists (expected)"
            ),
            Some(message) => error!(
                probe_id = %self.probe_id,
                classification = %verdict.classification,
                rule = %verdict.rule,
                stage = ?failed_stage,
                error = %message,
                "Probe failed"
            ),
        }

        ProbeReport {
            probe_id: self.probe_id,
            classification: verdict.classification,
            rule: verdict.rule,
            failed_stage,
            transitions: self.transitions,
            duration: started.elapsed(),
        }
    }

    async fn execute(&mut self) -> ProbeOutcome {
        let credential = match self
            .dependencies
            .credentials
            .acquire(self.target.identity.as_deref())
            .await
        {
            Ok(credential) => credential,
            Err(e) => {
                log_probe_stage(
                    self.probe_id,
                    ProbeStage::Credential,
                    "failed",
                    Some(e.to_string().as_str()),
                );
                return e.into();
            }
        };
        self.transition(ProbeState::CredentialAcquired);
        log_probe_stage(self.probe_id, ProbeStage::Credential, "acquired", None);

        let store = match self
            .dependencies
            .connector
            .connect(&self.target.endpoint, credential)
        {
            Ok(store) => store,
            Err(e) => {
                log_probe_stage(
                    self.probe_id,
                    ProbeStage::Client,
                    "failed",
                    Some(e.to_string().as_str()),
                );
                return e.into();
            }
        };
        self.transition(ProbeState::ClientReady);
        log_probe_stage(self.probe_id, ProbeStage::Client, "ready", None);

        let result = store.create_if_absent(&self.target.resource_name).await;
        self.transition(ProbeState::Probed);

        match result {
            Ok(()) => {
                log_probe_stage(self.probe_id, ProbeStage::Operation, "created", None);
                ProbeOutcome::Completed
            }
            Err(e) => {
                log_probe_stage(
                    self.probe_id,
                    ProbeStage::Operation,
                    "failed",
                    Some(e.message.as_str()),
                );
                e.into()
            }
        }
    }

    fn transition(&mut self, next: ProbeState) {
        if !self.state.can_transition_to(next) {
            // Only reachable if the traversal order in `execute` changes
            warn!(
                probe_id = %self.probe_id,
                from = %self.state,
                to = %next,
                "Unexpected probe state transition"
            );
        }
        self.state = next;
        self.transitions.push(next);
    }
}
