//! # Probe Constants
//!
//! Defaults, wire constants and classification keywords shared across the crate.

/// Environment variable names consumed at startup
pub mod env {
    pub const ACCOUNT_URL: &str = "COSMOS_ACCOUNT_URL";
    pub const TABLE_NAME: &str = "TABLE_NAME";
    pub const CLIENT_ID: &str = "AZURE_CLIENT_ID";
    pub const METRICS_PORT: &str = "METRICS_PORT";
    pub const CLIENT_ERROR_POLICY: &str = "PROBE_CLIENT_ERROR_POLICY";
    pub const METRIC_PREFIX: &str = "PROBE_METRIC_PREFIX";
    pub const TOKEN_RESOURCE: &str = "PROBE_TOKEN_RESOURCE";
    pub const IMDS_ENDPOINT: &str = "PROBE_IMDS_ENDPOINT";
    pub const IDENTITY_ENDPOINT: &str = "IDENTITY_ENDPOINT";
    pub const IDENTITY_HEADER: &str = "IDENTITY_HEADER";
    pub const PROBE_ENV: &str = "PROBE_ENV";
    pub const APP_ENV: &str = "APP_ENV";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Configuration defaults
pub mod defaults {
    pub const TABLE_NAME: &str = "ScaleTestTable";
    pub const METRICS_PORT: u16 = 8080;
    pub const METRIC_PREFIX: &str = "cosmos";
    pub const TOKEN_RESOURCE: &str = "https://cosmos.azure.com";
    pub const IMDS_ENDPOINT: &str = "http://169.254.169.254";
    pub const ENVIRONMENT: &str = "development";
}

/// Instance metadata service token endpoint
pub mod imds {
    pub const TOKEN_PATH: &str = "/metadata/identity/oauth2/token";
    pub const API_VERSION: &str = "2018-02-01";
    pub const METADATA_HEADER: &str = "Metadata";
}

/// App Service style identity endpoint, advertised through `IDENTITY_ENDPOINT`
pub mod app_service {
    pub const API_VERSION: &str = "2019-08-01";
    pub const SECRET_HEADER: &str = "X-IDENTITY-HEADER";
}

/// Table service wire constants
pub mod table {
    pub const TABLES_PATH: &str = "Tables";
    pub const API_VERSION: &str = "2019-02-02";
    pub const VERSION_HEADER: &str = "x-ms-version";
    pub const DATE_HEADER: &str = "x-ms-date";
    pub const ERROR_CODE_HEADER: &str = "x-ms-error-code";
    pub const ACCEPT_NO_METADATA: &str = "application/json;odata=nometadata";
    pub const PREFER_NO_CONTENT: &str = "return-no-content";

    /// Error code the store returns when the table is already provisioned
    pub const ALREADY_EXISTS_CODE: &str = "TableAlreadyExists";
}

/// Message fragments used by the degraded string-matching classification path
pub mod keywords {
    /// Case-insensitive fragments that mark an authentication/authorization failure
    pub const AUTH_FAILURE: [&str; 4] = [
        "unauthorized",
        "forbidden",
        "authentication",
        "authorization",
    ];

    /// Case-insensitive fragment that marks an already-provisioned resource
    pub const ALREADY_EXISTS: &str = "already exists";
}

/// Counter name suffixes appended to the configured metric prefix
pub mod metrics {
    pub const SUCCESS_SUFFIX: &str = "connection_success_total";
    pub const AUTH_ERROR_SUFFIX: &str = "auth_error_total";
    pub const OTHER_ERROR_SUFFIX: &str = "other_error_total";
}

/// Fixed response bodies of the reporting interface
pub mod responses {
    pub const HEALTHY: &str = "healthy";
    pub const UNHEALTHY: &str = "unhealthy";
    pub const READY: &str = "ready";
}
