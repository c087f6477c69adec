//! Document store boundary — per-user document reads, writes, and queries.
//!
//! DESIGN
//! ======
//! The trait traffics in `serde_json::Value`: documents are opaque to the
//! store and typed only at the call sites. Missing documents are a normal
//! `Ok(None)` read result, not an error.

#[cfg(test)]
#[path = "documents_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::net::BearerToken;

/// Collection holding one résumé document per user, keyed by user id.
pub const RESUMES_COLLECTION: &str = "resumes";
/// Collection holding job-application records.
pub const APPLICATIONS_COLLECTION: &str = "applications";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document read failed: {status}")]
    ReadFailed { status: u16 },
    #[error("document write rejected: {status}")]
    WriteRejected { status: u16 },
    #[error("query failed: {status}")]
    QueryFailed { status: u16 },
    #[error("store transport error: {0}")]
    Transport(String),
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Single-field equality filter, the only query shape the views need.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Filter {
    pub field: String,
    pub equals: Value,
}

impl Filter {
    #[must_use]
    pub fn field_eq(field: &str, value: impl Into<Value>) -> Self {
        Self { field: field.to_owned(), equals: value.into() }
    }
}

/// External document service consumed by the page controllers and form model.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. `Ok(None)` when the document does not exist.
    ///
    /// # Errors
    ///
    /// `ReadFailed` or `Transport` on anything other than found/not-found.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Write one document verbatim (last write wins).
    ///
    /// # Errors
    ///
    /// `WriteRejected` or `Transport` when the store refuses the write.
    async fn set_document(&self, collection: &str, id: &str, value: Value) -> Result<(), StoreError>;

    /// Fetch all documents in `collection` matching `filter`.
    ///
    /// # Errors
    ///
    /// `QueryFailed` or `Transport` when the query cannot be served.
    async fn query_documents(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError>;
}

// =============================================================================
// REST ADAPTER
// =============================================================================

/// `DocumentStore` backed by the document service's REST API.
pub struct RestDocumentStore {
    config: StoreConfig,
    client: reqwest::Client,
    bearer: BearerToken,
}

impl RestDocumentStore {
    /// Build the adapter. `bearer` is shared with the identity adapter so
    /// requests carry the freshest access token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` if the HTTP client cannot be built.
    pub fn new(config: StoreConfig, bearer: BearerToken) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self { config, client, bearer })
    }

    async fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer.get().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let request = self.client.get(document_endpoint(&self.config.base_url, collection, id));
        let resp = self
            .authorized(request)
            .await
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(StoreError::ReadFailed { status: resp.status().as_u16() });
        }
        let value = resp.json::<Value>().await.map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(Some(value))
    }

    async fn set_document(&self, collection: &str, id: &str, value: Value) -> Result<(), StoreError> {
        let request = self
            .client
            .put(document_endpoint(&self.config.base_url, collection, id))
            .json(&value);
        let resp = self
            .authorized(request)
            .await
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StoreError::WriteRejected { status: resp.status().as_u16() });
        }
        Ok(())
    }

    async fn query_documents(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let request = self
            .client
            .post(query_endpoint(&self.config.base_url, collection))
            .json(filter);
        let resp = self
            .authorized(request)
            .await
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StoreError::QueryFailed { status: resp.status().as_u16() });
        }

        #[derive(serde::Deserialize)]
        struct QueryResponse {
            documents: Vec<Value>,
        }
        let body: QueryResponse = resp.json().await.map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(body.documents)
    }
}

fn document_endpoint(base_url: &str, collection: &str, id: &str) -> String {
    format!("{base_url}/v1/{collection}/{id}")
}

fn query_endpoint(base_url: &str, collection: &str) -> String {
    format!("{base_url}/v1/{collection}:query")
}

// =============================================================================
// TEST SUPPORT
// =============================================================================
