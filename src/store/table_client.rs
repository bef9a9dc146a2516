//! Table service client for Cosmos DB Table API accounts.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::constants::table;
use crate::error::{ClientError, OperationError};
use crate::identity::Credential;
use crate::store::{error_chain, ResourceConnector, ResourceStore};

#[derive(Debug, Deserialize)]
struct ODataErrorBody {
    #[serde(rename = "odata.error")]
    error: ODataError,
}

#[derive(Debug, Deserialize)]
struct ODataError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<ODataMessage>,
}

#[derive(Debug, Deserialize)]
struct ODataMessage {
    #[serde(default)]
    value: Option<String>,
}

/// Connector producing [`TableServiceClient`]s
#[derive(Debug, Clone, Default)]
pub struct TableServiceConnector;

impl TableServiceConnector {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceConnector for TableServiceConnector {
    fn connect(
        &self,
        endpoint: &str,
        credential: Credential,
    ) -> Result<Box<dyn ResourceStore>, ClientError> {
        Ok(Box::new(TableServiceClient::new(endpoint, credential)?))
    }
}

/// Client bound to one account endpoint and one credential
#[derive(Debug)]
pub struct TableServiceClient {
    tables_url: Url,
    credential: Credential,
    http: reqwest::Client,
}

impl TableServiceClient {
    pub fn new(endpoint: &str, credential: Credential) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        let base = Url::parse(endpoint.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", base.scheme())));
        }
        if base.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }

        let tables_url = Url::parse(&format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            table::TABLES_PATH
        ))
        .map_err(|e| invalid(e.to_string()))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(error_chain(&e)))?;

        Ok(Self {
            tables_url,
            credential,
            http,
        })
    }

    pub fn tables_url(&self) -> &Url {
        &self.tables_url
    }
}

#[async_trait]
impl ResourceStore for TableServiceClient {
    async fn create_if_absent(&self, name: &str) -> Result<(), OperationError> {
        debug!(url = %self.tables_url, table = %name, "Issuing create table request");

        let response = self
            .http
            .post(self.tables_url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.credential.bearer_token()))
            .header(table::VERSION_HEADER, table::API_VERSION)
            .header(
                table::DATE_HEADER,
                Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            )
            .header(ACCEPT, table::ACCEPT_NO_METADATA)
            .header("Prefer", table::PREFER_NO_CONTENT)
            .json(&json!({ "TableName": name }))
            .send()
            .await
            .map_err(|e| OperationError::transport(error_chain(&e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let header_code = response
            .headers()
            .get(table::ERROR_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();

        Err(parse_error_response(status, header_code, &body))
    }
}

/// Build an [`OperationError`] from a non-success store reply
fn parse_error_response(
    status: StatusCode,
    header_code: Option<String>,
    body: &str,
) -> OperationError {
    let odata = serde_json::from_str::<ODataErrorBody>(body).ok().map(|b| b.error);

    let error_code = header_code.or_else(|| odata.as_ref().and_then(|e| e.code.clone()));
    let detail = odata
        .and_then(|e| e.message)
        .and_then(|m| m.value)
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("no response body").to_string());

    let message = match &error_code {
        Some(code) => format!("HTTP {} ({code}): {detail}", status.as_u16()),
        None => format!("HTTP {}: {detail}", status.as_u16()),
    };

    OperationError::from_response(status.as_u16(), error_code, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential::new("token", None, None)
    }

    #[test]
    fn test_tables_url_built_from_endpoint() {
        let client =
            TableServiceClient::new("https://acct.table.cosmos.azure.com/", credential()).unwrap();
        assert_eq!(
            client.tables_url().as_str(),
            "https://acct.table.cosmos.azure.com/Tables"
        );
    }

    #[test]
    fn test_invalid_endpoints_rejected() {
        for endpoint in ["not a url", "ftp://acct.example.com", "acct.table.cosmos.azure.com"] {
            let err = TableServiceClient::new(endpoint, credential()).unwrap_err();
            assert!(
                matches!(err, ClientError::InvalidEndpoint { .. }),
                "{endpoint} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_code_from_body() {
        let body = r#"{"odata.error":{"code":"TableAlreadyExists","message":{"lang":"en-US","value":"The table specified already exists."}}}"#;
        let err = parse_error_response(StatusCode::CONFLICT, None, body);

        assert_eq!(err.status, Some(409));
        assert_eq!(err.error_code.as_deref(), Some("TableAlreadyExists"));
        assert!(err.message.contains("The table specified already exists."));
    }

    #[test]
    fn test_header_code_preferred() {
        let body = r#"{"odata.error":{"code":"Other"}}"#;
        let err = parse_error_response(
            StatusCode::FORBIDDEN,
            Some("AuthorizationPermissionMismatch".to_string()),
            body,
        );
        assert_eq!(err.error_code.as_deref(), Some("AuthorizationPermissionMismatch"));
        assert_eq!(err.status, Some(403));
    }

    #[test]
    fn test_plain_body_and_empty_body() {
        let err = parse_error_response(StatusCode::BAD_GATEWAY, None, "upstream failed");
        assert_eq!(err.message, "HTTP 502: upstream failed");
        assert!(err.error_code.is_none());

        let err = parse_error_response(StatusCode::SERVICE_UNAVAILABLE, None, "");
        assert_eq!(err.message, "HTTP 503: Service Unavailable");
    }
}
