#![allow(clippy::doc_markdown)] // Allow technical terms like CosmosDB, OAuth2 in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Cosmos MSI Probe
//!
//! One-shot, managed-identity connectivity probe for Cosmos DB Table API
//! accounts, built to run as many independently scheduled instances.
//!
//! ## Overview
//!
//! Each process acquires a workload-identity token, tries to create one
//! table, classifies the outcome as `success`, `auth_error` or
//! `other_error`, and then keeps serving the result so an external
//! scraper and orchestrator can read it:
//!
//! - three monotonic counters on `GET /metrics`
//! - a latched liveness signal on `GET /health`
//! - an unconditional readiness signal on `GET /ready`
//!
//! A new trial is obtained by restarting the process.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment configuration
//! - [`identity`] - Managed identity credential acquisition
//! - [`store`] - Table service client
//! - [`probe`] - Classification pipeline and run-once state machine
//! - [`telemetry`] - Counters and health latch
//! - [`web`] - Reporting interface
//! - [`bootstrap`] - Process lifecycle wiring
//! - [`error`] - Error taxonomy
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cosmos_probe::bootstrap::{azure_dependencies, shutdown_signal, ProbeSystem};
//! use cosmos_probe::config::ProbeConfig;
//! use cosmos_probe::probe::ProbeTarget;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProbeConfig::from_env()?;
//! let mut handle = ProbeSystem::start(&config).await?;
//!
//! let report = handle
//!     .run_probe(ProbeTarget::from(&config), azure_dependencies(&config))
//!     .await?;
//! println!("probe classified as {}", report.classification);
//!
//! handle.park_until(shutdown_signal()).await;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod logging;
pub mod probe;
pub mod store;
pub mod telemetry;
pub mod web;

pub use config::ProbeConfig;
pub use error::{ClientError, ConfigError, CredentialError, OperationError, ProbeError, ProbeResult};
pub use probe::{Classification, ClientErrorPolicy, ProbeReport, ProbeRunner, ProbeState};
pub use telemetry::{HealthStatus, MetricsSnapshot, ProbeTelemetry};
