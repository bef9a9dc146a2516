//! # Probe System Bootstrap
//!
//! Brings up the two execution paths of the process:
//!
//! 1. **Reporting path** (background, long-lived): the listener is bound
//!    before anything else so a bind failure aborts startup, then the axum
//!    server runs on its own task for the rest of the process lifetime.
//! 2. **Probe path** (foreground, one-shot): [`ProbeSystemHandle::run_probe`]
//!    drives a single [`ProbeRunner`] and refuses every later call, after
//!    which [`ProbeSystemHandle::park_until`] waits without polling for the
//!    shutdown signal.
//!
//! The two paths share only the [`ProbeTelemetry`] service object.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ProbeConfig;
use crate::constants::env;
use crate::error::{ConfigError, ProbeError, ProbeResult};
use crate::identity::ManagedIdentityCredentialProvider;
use crate::probe::{ProbeDependencies, ProbeReport, ProbeRunner, ProbeTarget, StandardClassifier};
use crate::store::TableServiceConnector;
use crate::telemetry::ProbeTelemetry;
use crate::web::{self, state::AppState};

impl From<&ProbeConfig> for ProbeTarget {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            endpoint: config.account_url.clone(),
            resource_name: config.table_name.clone(),
            identity: config.client_id.clone(),
        }
    }
}

/// Production collaborators: managed identity, Table API client, standard classifier
pub fn azure_dependencies(config: &ProbeConfig) -> ProbeDependencies {
    ProbeDependencies {
        credentials: Arc::new(ManagedIdentityCredentialProvider::new(
            config.token_endpoint.clone(),
            config.token_resource.clone(),
        )),
        connector: Arc::new(TableServiceConnector::new()),
        classifier: Arc::new(StandardClassifier::with_client_error_policy(
            config.client_error_policy,
        )),
    }
}

/// Entry point for starting the reporting path
pub struct ProbeSystem;

impl ProbeSystem {
    /// Start the reporting interface on the configured port
    pub async fn start(config: &ProbeConfig) -> ProbeResult<ProbeSystemHandle> {
        Self::start_on(config.listen_addr(), &config.metric_prefix).await
    }

    /// Start the reporting interface on an explicit address (port 0 picks a free port)
    pub async fn start_on(address: SocketAddr, metric_prefix: &str) -> ProbeResult<ProbeSystemHandle> {
        let telemetry = ProbeTelemetry::new(metric_prefix).map_err(|e| {
            ProbeError::from(ConfigError::InvalidValue {
                variable: env::METRIC_PREFIX,
                reason: e.to_string(),
            })
        })?;
        let telemetry = Arc::new(telemetry);

        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ProbeError::Listener { address, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ProbeError::Listener { address, source })?;

        let app = web::create_app(AppState::new(Arc::clone(&telemetry)));
        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();

        let server_task = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_receiver.await;
            });
            if let Err(e) = server.await {
                error!(error = %e, "Reporting server error");
            }
        });

        info!(address = %local_addr, "Reporting interface listening");

        Ok(ProbeSystemHandle {
            telemetry,
            local_addr,
            shutdown_sender: Some(shutdown_sender),
            server_task,
            completed_probe: None,
        })
    }
}

/// Handle on a running probe process
pub struct ProbeSystemHandle {
    telemetry: Arc<ProbeTelemetry>,
    local_addr: SocketAddr,
    shutdown_sender: Option<oneshot::Sender<()>>,
    server_task: JoinHandle<()>,
    completed_probe: Option<Uuid>,
}

impl ProbeSystemHandle {
    pub fn telemetry(&self) -> Arc<ProbeTelemetry> {
        Arc::clone(&self.telemetry)
    }

    /// Address the reporting interface actually bound
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run this process's single probe on the foreground path.
    ///
    /// Fails with [`ProbeError::AlreadyProbed`] once a probe has run.
    pub async fn run_probe(
        &mut self,
        target: ProbeTarget,
        dependencies: ProbeDependencies,
    ) -> ProbeResult<ProbeReport> {
        if let Some(probe_id) = self.completed_probe {
            warn!(probe_id = %probe_id, "Probe already ran in this process");
            return Err(ProbeError::AlreadyProbed { probe_id });
        }

        let runner = ProbeRunner::new(target, dependencies, self.telemetry());
        self.completed_probe = Some(runner.probe_id());
        let report = runner.run().await;
        info!(
            probe_id = %report.probe_id,
            classification = %report.classification,
            duration_ms = report.duration.as_millis() as u64,
            health = %self.telemetry.health().status(),
            "Probe complete, serving telemetry until shutdown"
        );
        Ok(report)
    }

    /// Block until `signal` resolves, then stop the reporting interface
    pub async fn park_until<F>(mut self, signal: F)
    where
        F: Future<Output = ()>,
    {
        signal.await;
        info!("Shutdown signal received");
        self.stop().await;
    }

    async fn stop(&mut self) {
        match self.shutdown_sender.take() {
            Some(sender) => {
                if sender.send(()).is_err() {
                    warn!("Reporting server already stopped");
                }
            }
            None => {
                warn!("Probe system already stopped");
                return;
            }
        }

        if let Err(e) = (&mut self.server_task).await {
            error!(error = %e, "Reporting server task failed");
        }
        info!("Reporting interface stopped");
    }
}

/// Resolve on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_target_from_config() {
        let config = ProbeConfig::from_source(HashMap::from([
            ("COSMOS_ACCOUNT_URL".to_string(), "https://acct".to_string()),
            ("AZURE_CLIENT_ID".to_string(), "client".to_string()),
        ]))
        .unwrap();

        let target = ProbeTarget::from(&config);
        assert_eq!(target.endpoint, "https://acct");
        assert_eq!(target.resource_name, "ScaleTestTable");
        assert_eq!(target.identity.as_deref(), Some("client"));
    }

    #[tokio::test]
    async fn test_bind_conflict_is_listener_error() {
        let first = ProbeSystem::start_on("127.0.0.1:0".parse().unwrap(), "cosmos")
            .await
            .unwrap();

        let err = ProbeSystem::start_on(first.local_addr(), "cosmos")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ProbeError::Listener { .. }));

        first.park_until(async {}).await;
    }

    #[tokio::test]
    async fn test_invalid_metric_prefix_is_config_error() {
        let err = ProbeSystem::start_on("127.0.0.1:0".parse().unwrap(), "bad prefix")
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ProbeError::Config(ConfigError::InvalidValue { .. })
        ));
    }
}
