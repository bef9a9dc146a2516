//! # Probe Configuration
//!
//! Environment-first configuration, read once at startup and immutable afterwards.
//! Values are collected through the `config` crate's environment source with
//! empty values treated as absent, then validated into [`ProbeConfig`].

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;
use tracing::info;

use crate::constants::{defaults, env};
use crate::error::ConfigError;
use crate::identity::TokenEndpoint;
use crate::probe::ClientErrorPolicy;

/// Validated process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Table API account endpoint, e.g. `https://acct.table.cosmos.azure.com`
    pub account_url: String,
    /// Table the probe tries to create
    pub table_name: String,
    /// Managed identity client ID; `None` uses the host's default identity
    pub client_id: Option<String>,
    /// Port of the reporting interface
    pub metrics_port: u16,
    /// How a client construction failure is classified
    pub client_error_policy: ClientErrorPolicy,
    /// Domain prefix of the exported counter names
    pub metric_prefix: String,
    /// Audience of the requested access token
    pub token_resource: String,
    /// Managed identity token endpoint: App Service style when the host
    /// advertises one, otherwise the instance metadata service
    pub token_endpoint: TokenEndpoint,
}

/// Raw view of the environment, keys lowercased by the `config` crate
#[derive(Debug, Default, Deserialize)]
struct RawEnvironment {
    cosmos_account_url: Option<String>,
    table_name: Option<String>,
    azure_client_id: Option<String>,
    metrics_port: Option<String>,
    probe_client_error_policy: Option<String>,
    probe_metric_prefix: Option<String>,
    probe_token_resource: Option<String>,
    probe_imds_endpoint: Option<String>,
    identity_endpoint: Option<String>,
    identity_header: Option<String>,
}

impl ProbeConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::default())
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_source(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(config::Environment::default().source(Some(vars.into_iter().collect())))
    }

    fn load(source: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawEnvironment = config::Config::builder()
            .add_source(source.ignore_empty(true))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ConfigError::Source(e.to_string()))?;

        Self::validate(raw)
    }

    fn validate(raw: RawEnvironment) -> Result<Self, ConfigError> {
        let account_url = raw
            .cosmos_account_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingRequired {
                variable: env::ACCOUNT_URL,
            })?;

        let metrics_port = match raw.metrics_port {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue {
                    variable: env::METRICS_PORT,
                    reason: format!("{port:?} is not a valid port: {e}"),
                })?,
            None => defaults::METRICS_PORT,
        };

        let client_error_policy = match raw.probe_client_error_policy {
            Some(policy) => policy
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    variable: env::CLIENT_ERROR_POLICY,
                    reason,
                })?,
            None => ClientErrorPolicy::default(),
        };

        let token_endpoint = match (raw.identity_endpoint, raw.identity_header) {
            (Some(url), Some(secret)) => TokenEndpoint::app_service(url, secret),
            (Some(_), None) => {
                return Err(ConfigError::InvalidValue {
                    variable: env::IDENTITY_HEADER,
                    reason: format!("required when {} is set", env::IDENTITY_ENDPOINT),
                })
            }
            (None, _) => TokenEndpoint::imds(
                raw.probe_imds_endpoint
                    .unwrap_or_else(|| defaults::IMDS_ENDPOINT.to_string()),
            ),
        };

        Ok(Self {
            account_url,
            table_name: raw
                .table_name
                .unwrap_or_else(|| defaults::TABLE_NAME.to_string()),
            client_id: raw.azure_client_id,
            metrics_port,
            client_error_policy,
            metric_prefix: raw
                .probe_metric_prefix
                .unwrap_or_else(|| defaults::METRIC_PREFIX.to_string()),
            token_resource: raw
                .probe_token_resource
                .unwrap_or_else(|| defaults::TOKEN_RESOURCE.to_string()),
            token_endpoint,
        })
    }

    /// Address the reporting interface listens on
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.metrics_port))
    }

    /// Log the effective configuration; every field is non-secret
    pub fn log_summary(&self) {
        info!(
            account_url = %self.account_url,
            table_name = %self.table_name,
            client_id = self.client_id.as_deref().unwrap_or("<default identity>"),
            metrics_port = self.metrics_port,
            client_error_policy = %self.client_error_policy,
            metric_prefix = %self.metric_prefix,
            token_source = self.token_endpoint.kind(),
            token_url = %self.token_endpoint.token_url(),
            "Loaded probe configuration"
        );
    }
}
