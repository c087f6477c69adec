//! External collaborator boundaries: identity provider and document store.
//!
//! SYSTEM CONTEXT
//! ==============
//! `identity` owns the auth change stream and credential calls, `documents`
//! owns per-user document reads and writes, and `types` defines the shared
//! document schema. Everything else in the crate talks to these two traits,
//! never to the wire directly.

pub mod documents;
pub mod identity;
pub mod types;

use std::sync::Arc;

use tokio::sync::RwLock;

/// Shared handle to the current access token.
///
/// The identity adapter writes it on sign-in/refresh and clears it on
/// sign-out; the document adapter reads it for the `Authorization` header.
#[derive(Clone, Default)]
pub struct BearerToken(Arc<RwLock<Option<String>>>);

impl BearerToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: String) {
        *self.0.write().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.0.write().await = None;
    }

    pub async fn get(&self) -> Option<String> {
        self.0.read().await.clone()
    }
}
