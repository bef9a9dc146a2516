//! # Resource Store
//!
//! Client seam for the remote store. [`ResourceConnector`] builds an
//! authenticated client from an endpoint and a [`Credential`];
//! [`ResourceStore::create_if_absent`] issues the single creation request.
//!
//! An "already exists" reply is returned as an [`OperationError`] like any
//! other store error; deciding that it counts as success belongs to the
//! classifier.

pub mod table_client;

pub use table_client::{TableServiceClient, TableServiceConnector};

use async_trait::async_trait;

use crate::error::{ClientError, OperationError};
use crate::identity::Credential;

/// Builds store clients bound to one endpoint and credential
pub trait ResourceConnector: Send + Sync {
    fn connect(
        &self,
        endpoint: &str,
        credential: Credential,
    ) -> Result<Box<dyn ResourceStore>, ClientError>;
}

/// Authenticated handle on the remote store
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Issue one creation request for `name`
    async fn create_if_absent(&self, name: &str) -> Result<(), OperationError>;
}

/// Flatten an error and its sources into one log-friendly line
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
