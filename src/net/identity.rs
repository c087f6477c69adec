//! Identity provider boundary — change stream, credential sign-in, token refresh.
//!
//! ARCHITECTURE
//! ============
//! The provider pushes `Option<Principal>` notifications onto a single
//! claimed mpsc stream: `Some` after a successful sign-in, `None` after
//! sign-out. The session store is the only consumer; it serializes
//! processing, so the adapter never needs to coordinate publishes itself.
//!
//! ERROR HANDLING
//! ==============
//! Sign-out failure leaves local token state untouched so the caller keeps
//! its current session; everything else maps onto the `AuthError` taxonomy
//! and fails closed further up the stack.

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{RwLock, mpsc};
use tracing::warn;

use crate::config::AuthConfig;
use crate::net::BearerToken;
use crate::net::types::UserIdentity;

/// Buffered capacity of the change stream. Notifications are rare (sign-in,
/// sign-out, session restore), so a small buffer suffices.
const CHANGE_STREAM_CAPACITY: usize = 16;

/// Raw principal as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Principal {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<Principal> for UserIdentity {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.uid,
            email: principal.email,
            display_name: principal.display_name,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredential,
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("identity transport error: {0}")]
    Transport(String),
    #[error("change stream already claimed")]
    StreamClaimed,
}

/// External identity service consumed by the session store and login flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Claim the provider's change stream.
    ///
    /// At most one subscriber may exist for the provider's lifetime; the
    /// stream delivers the current principal (`Some`) or signed-out (`None`).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StreamClaimed` if the stream was already taken.
    fn subscribe(&self) -> Result<mpsc::Receiver<Option<Principal>>, AuthError>;

    /// Sign in with email and password. The resulting principal arrives on
    /// the change stream, not the return value, so the session store stays
    /// the single writer of session state.
    ///
    /// # Errors
    ///
    /// `InvalidCredential` for rejected credentials, transport or
    /// availability errors otherwise.
    async fn sign_in_with_credentials(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Refresh the principal's credential. `force` bypasses any cached token.
    ///
    /// # Errors
    ///
    /// `RefreshFailed` when the provider rejects the refresh.
    async fn refresh_token(&self, principal: &Principal, force: bool) -> Result<(), AuthError>;

    /// Sign out. Emits a `None` notification on success.
    ///
    /// # Errors
    ///
    /// Returns the provider error on failure; local state is unchanged.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

// =============================================================================
// REST ADAPTER
// =============================================================================

#[derive(Debug, Deserialize)]
struct SignInResponse {
    uid: String,
    email: String,
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug)]
struct TokenPair {
    id_token: String,
    refresh_token: String,
}

/// `IdentityProvider` backed by the identity service's REST API.
pub struct RestIdentityProvider {
    config: AuthConfig,
    client: reqwest::Client,
    bearer: BearerToken,
    /// Change-stream sender; populated by `subscribe`, at most once.
    changes: Mutex<Option<mpsc::Sender<Option<Principal>>>>,
    tokens: RwLock<Option<TokenPair>>,
}

impl RestIdentityProvider {
    /// Build the adapter. `bearer` is shared with the document store so
    /// authorized calls pick up refreshed tokens immediately.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderUnavailable` if the HTTP client cannot
    /// be constructed.
    pub fn new(config: AuthConfig, bearer: BearerToken) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.refresh_timeout_secs))
            .build()
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?;
        Ok(Self {
            config,
            client,
            bearer,
            changes: Mutex::new(None),
            tokens: RwLock::new(None),
        })
    }

    /// Push a notification onto the claimed change stream, if any.
    fn emit(&self, change: Option<Principal>) {
        let Ok(slot) = self.changes.lock() else {
            return;
        };
        let Some(tx) = slot.as_ref() else {
            return;
        };
        match tx.try_send(change) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("identity change stream full; dropping notification");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("identity change stream closed; dropping notification");
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    fn subscribe(&self) -> Result<mpsc::Receiver<Option<Principal>>, AuthError> {
        let Ok(mut slot) = self.changes.lock() else {
            return Err(AuthError::ProviderUnavailable("change stream lock poisoned".into()));
        };
        if slot.is_some() {
            return Err(AuthError::StreamClaimed);
        }
        let (tx, rx) = mpsc::channel(CHANGE_STREAM_CAPACITY);
        // The REST adapter has no restorable session, so the first
        // notification resolves the subscriber's loading state right away.
        let _ = tx.try_send(None);
        *slot = Some(tx);
        Ok(rx)
    }

    async fn sign_in_with_credentials(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(sign_in_endpoint(&self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredential);
        }
        if !status.is_success() {
            return Err(AuthError::ProviderUnavailable(status.to_string()));
        }

        let body: SignInResponse = resp.json().await.map_err(|e| AuthError::Transport(e.to_string()))?;
        self.bearer.set(body.id_token.clone()).await;
        *self.tokens.write().await = Some(TokenPair {
            id_token: body.id_token,
            refresh_token: body.refresh_token,
        });

        self.emit(Some(Principal {
            uid: body.uid,
            email: body.email,
            display_name: body.display_name,
        }));
        Ok(())
    }

    async fn refresh_token(&self, principal: &Principal, force: bool) -> Result<(), AuthError> {
        if !force {
            if self.tokens.read().await.is_some() {
                return Ok(());
            }
        }

        let refresh_token = {
            let tokens = self.tokens.read().await;
            tokens
                .as_ref()
                .map(|pair| pair.refresh_token.clone())
                .ok_or_else(|| AuthError::RefreshFailed(format!("no refresh token for {}", principal.uid)))?
        };

        let resp = self
            .client
            .post(refresh_endpoint(&self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AuthError::RefreshFailed(resp.status().to_string()));
        }

        let body: RefreshResponse = resp.json().await.map_err(|e| AuthError::Transport(e.to_string()))?;
        self.bearer.set(body.id_token.clone()).await;
        *self.tokens.write().await = Some(TokenPair {
            id_token: body.id_token,
            refresh_token: body.refresh_token,
        });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let id_token = {
            let tokens = self.tokens.read().await;
            tokens.as_ref().map(|pair| pair.id_token.clone())
        };

        // Revoke the server-side session when one exists. A purely local
        // session (no token) just clears and notifies.
        if let Some(token) = id_token {
            let resp = self
                .client
                .post(sign_out_endpoint(&self.config.base_url))
                .header("x-api-key", &self.config.api_key)
                .bearer_auth(token)
                .send()
                .await
                .map_err(|e| AuthError::Transport(e.to_string()))?;
            if !resp.status().is_success() {
                return Err(AuthError::ProviderUnavailable(resp.status().to_string()));
            }
        }

        *self.tokens.write().await = None;
        self.bearer.clear().await;
        self.emit(None);
        Ok(())
    }
}

fn sign_in_endpoint(base_url: &str) -> String {
    format!("{base_url}/v1/auth/sign-in")
}

fn refresh_endpoint(base_url: &str) -> String {
    format!("{base_url}/v1/auth/refresh")
}

fn sign_out_endpoint(base_url: &str) -> String {
    format!("{base_url}/v1/auth/sign-out")
}

// =============================================================================
// TEST SUPPORT
// =============================================================================
