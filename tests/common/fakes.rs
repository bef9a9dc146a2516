use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use cosmos_probe::error::{ClientError, CredentialError, OperationError};
use cosmos_probe::identity::{Credential, CredentialProvider};
use cosmos_probe::probe::{ProbeDependencies, ProbeTarget, StandardClassifier};
use cosmos_probe::store::{ResourceConnector, ResourceStore};
use cosmos_probe::ClientErrorPolicy;

/// Credential provider returning a scripted result and remembering the selector it saw
#[derive(Debug)]
pub struct ScriptedCredentials {
    result: Result<(), CredentialError>,
    seen_selectors: Mutex<Vec<Option<String>>>,
}

impl ScriptedCredentials {
    pub fn granting() -> Self {
        Self::with_result(Ok(()))
    }

    pub fn failing(error: CredentialError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<(), CredentialError>) -> Self {
        Self {
            result,
            seen_selectors: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_selectors(&self) -> Vec<Option<String>> {
        self.seen_selectors.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialProvider for ScriptedCredentials {
    async fn acquire(&self, selector: Option<&str>) -> Result<Credential, CredentialError> {
        self.seen_selectors
            .lock()
            .unwrap()
            .push(selector.map(str::to_string));
        self.result
            .clone()
            .map(|()| Credential::new("scripted-token", None, selector.map(str::to_string)))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// How the scripted store answers the create call
#[derive(Debug, Clone)]
pub enum StoreScript {
    Reply(Result<(), OperationError>),
    /// Wait for the gate to open, then reply
    Gated(Arc<Notify>, Result<(), OperationError>),
}

/// Connector that either refuses to build a client or hands out a scripted store
#[derive(Debug)]
pub struct ScriptedConnector {
    result: Result<StoreScript, ClientError>,
    created: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConnector {
    pub fn replying(reply: Result<(), OperationError>) -> Self {
        Self::with_result(Ok(StoreScript::Reply(reply)))
    }

    pub fn gated(gate: Arc<Notify>, reply: Result<(), OperationError>) -> Self {
        Self::with_result(Ok(StoreScript::Gated(gate, reply)))
    }

    pub fn failing(error: ClientError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<StoreScript, ClientError>) -> Self {
        Self {
            result,
            created: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Names passed to `create_if_absent` so far
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

impl ResourceConnector for ScriptedConnector {
    fn connect(
        &self,
        _endpoint: &str,
        _credential: Credential,
    ) -> Result<Box<dyn ResourceStore>, ClientError> {
        let script = self.result.clone()?;
        Ok(Box::new(ScriptedStore {
            script,
            created: Arc::clone(&self.created),
        }))
    }
}

struct ScriptedStore {
    script: StoreScript,
    created: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ResourceStore for ScriptedStore {
    async fn create_if_absent(&self, name: &str) -> Result<(), OperationError> {
        self.created.lock().unwrap().push(name.to_string());
        match &self.script {
            StoreScript::Reply(reply) => reply.clone(),
            StoreScript::Gated(gate, reply) => {
                gate.notified().await;
                reply.clone()
            }
        }
    }
}

pub fn target() -> ProbeTarget {
    ProbeTarget {
        endpoint: "https://probe-account.table.cosmos.azure.com".to_string(),
        resource_name: "ScaleTestTable".to_string(),
        identity: None,
    }
}

pub fn dependencies(
    credentials: Arc<ScriptedCredentials>,
    connector: Arc<ScriptedConnector>,
) -> ProbeDependencies {
    dependencies_with_policy(credentials, connector, ClientErrorPolicy::default())
}

pub fn dependencies_with_policy(
    credentials: Arc<ScriptedCredentials>,
    connector: Arc<ScriptedConnector>,
    policy: ClientErrorPolicy,
) -> ProbeDependencies {
    ProbeDependencies {
        credentials,
        connector,
        classifier: Arc::new(StandardClassifier::with_client_error_policy(policy)),
    }
}

pub fn already_exists_error() -> OperationError {
    OperationError::from_response(
        409,
        Some("TableAlreadyExists".to_string()),
        "HTTP 409 (TableAlreadyExists): The table specified already exists.",
    )
}

pub fn forbidden_error() -> OperationError {
    OperationError::from_response(
        403,
        Some("AuthorizationPermissionMismatch".to_string()),
        "HTTP 403 (AuthorizationPermissionMismatch): Request blocked by Auth",
    )
}
