//! Managed identity tokens from the hosting platform's token endpoint.
//!
//! Two endpoint flavours are supported: the instance metadata service (VMs,
//! AKS nodes) and the App Service style endpoint that the platform advertises
//! through `IDENTITY_ENDPOINT` and `IDENTITY_HEADER`.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::constants::{app_service, imds};
use crate::error::CredentialError;
use crate::identity::{validate_selector, Credential, CredentialProvider};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_on: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Where managed identity tokens are requested from
#[derive(Clone, PartialEq, Eq)]
pub enum TokenEndpoint {
    /// Instance metadata service, addressed by its base URL
    Imds { base_url: String },
    /// App Service style endpoint with its per-host secret
    AppService { url: String, secret: String },
}

impl TokenEndpoint {
    pub fn imds(base_url: impl Into<String>) -> Self {
        Self::Imds {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn app_service(url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::AppService {
            url: url.into(),
            secret: secret.into(),
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Imds { .. } => "imds",
            Self::AppService { .. } => "app_service",
        }
    }

    /// Full URL of the token request, without the query string
    pub fn token_url(&self) -> String {
        match self {
            Self::Imds { base_url } => format!("{base_url}{}", imds::TOKEN_PATH),
            Self::AppService { url, .. } => url.clone(),
        }
    }

    fn api_version(&self) -> &'static str {
        match self {
            Self::Imds { .. } => imds::API_VERSION,
            Self::AppService { .. } => app_service::API_VERSION,
        }
    }

    fn authentication_header(&self) -> (&'static str, &str) {
        match self {
            Self::Imds { .. } => (imds::METADATA_HEADER, "true"),
            Self::AppService { secret, .. } => (app_service::SECRET_HEADER, secret.as_str()),
        }
    }
}

impl fmt::Debug for TokenEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Imds { base_url } => f.debug_struct("Imds").field("base_url", base_url).finish(),
            Self::AppService { url, .. } => f
                .debug_struct("AppService")
                .field("url", url)
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}

/// Requests access tokens from the platform's managed identity endpoint
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredentialProvider {
    endpoint: TokenEndpoint,
    resource: String,
}

impl ManagedIdentityCredentialProvider {
    /// `resource` is the token audience
    pub fn new(endpoint: TokenEndpoint, resource: impl Into<String>) -> Self {
        Self {
            endpoint,
            resource: resource.into(),
        }
    }

    pub fn endpoint(&self) -> &TokenEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl CredentialProvider for ManagedIdentityCredentialProvider {
    async fn acquire(&self, selector: Option<&str>) -> Result<Credential, CredentialError> {
        if let Some(selector) = selector {
            validate_selector(selector)?;
        }

        // Identity endpoints are host-local; never route them through a proxy
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| CredentialError::EndpointUnreachable(e.to_string()))?;

        let mut query = vec![
            ("api-version", self.endpoint.api_version()),
            ("resource", self.resource.as_str()),
        ];
        if let Some(selector) = selector {
            query.push(("client_id", selector));
        }

        let token_url = self.endpoint.token_url();
        debug!(
            token_url = %token_url,
            source = self.endpoint.kind(),
            client_id = selector.unwrap_or("<default>"),
            "Requesting managed identity token"
        );

        let (header, value) = self.endpoint.authentication_header();
        let response = client
            .get(token_url)
            .header(header, value)
            .query(&query)
            .send()
            .await
            .map_err(|e| CredentialError::EndpointUnreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CredentialError::InvalidTokenResponse(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error_description.or(e.message).or(e.error))
                .unwrap_or(body);
            return Err(CredentialError::IdentityUnavailable {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| CredentialError::InvalidTokenResponse(e.to_string()))?;

        if token.access_token.is_empty() {
            return Err(CredentialError::InvalidTokenResponse(
                "access_token is empty".to_string(),
            ));
        }

        let expires_on = token
            .expires_on
            .as_deref()
            .and_then(|secs| secs.parse::<i64>().ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(Credential::new(
            token.access_token,
            expires_on,
            selector.map(str::to_string),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "managed_identity"
    }
}
