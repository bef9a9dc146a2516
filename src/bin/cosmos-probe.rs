//! Cosmos MSI Probe Binary
//!
//! Starts the reporting interface, runs one managed-identity probe against the
//! configured account, then serves counters and health until Ctrl-C or SIGTERM.
//!
//! Missing configuration or an unbindable reporting port exits non-zero before
//! the probe runs. Probe failures never terminate the process.

use anyhow::Context;
use tracing::{error, info};

use cosmos_probe::bootstrap::{azure_dependencies, shutdown_signal, ProbeSystem};
use cosmos_probe::config::ProbeConfig;
use cosmos_probe::logging;
use cosmos_probe::probe::ProbeTarget;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_structured_logging();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Cosmos MSI probe");

    let config = ProbeConfig::from_env()
        .inspect_err(|e| error!(error = %e, "Invalid configuration"))
        .context("failed to load probe configuration")?;
    config.log_summary();

    let mut handle = ProbeSystem::start(&config)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to start reporting interface"))
        .context("failed to start reporting interface")?;

    handle
        .run_probe(ProbeTarget::from(&config), azure_dependencies(&config))
        .await
        .context("probe did not run")?;

    handle.park_until(shutdown_signal()).await;
    info!("Cosmos MSI probe stopped");
    Ok(())
}
