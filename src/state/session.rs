//! Session store — the authoritative view of who is signed in.
//!
//! ARCHITECTURE
//! ============
//! One listener task drains the identity provider's change stream and is,
//! together with `sign_out`, the only writer of session state. Consumers
//! subscribe through a watch channel and never mutate. The mpsc stream
//! doubles as a single-flight queue: each notification is processed to
//! completion, token refresh included, before the next is taken.
//!
//! ERROR HANDLING
//! ==============
//! Fail closed: a principal whose token cannot be refreshed (error or
//! bounded-wait timeout) is published as signed out, never as a stale
//! identity. Sign-out failure keeps the current session and returns the
//! error to the caller.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::DEFAULT_REFRESH_TIMEOUT_SECS;
use crate::net::identity::{AuthError, IdentityProvider, Principal};
use crate::net::types::UserIdentity;

/// Published session snapshot.
///
/// `loading` is true only between listener start and the first provider
/// notification; `identity` is `None` iff no authenticated principal is
/// currently known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<UserIdentity>,
    pub loading: bool,
}

impl Session {
    #[must_use]
    pub fn initializing() -> Self {
        Self { identity: None, loading: true }
    }

    #[must_use]
    pub fn authenticated(identity: UserIdentity) -> Self {
        Self { identity: Some(identity), loading: false }
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self { identity: None, loading: false }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Initializing
        } else if self.identity.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }
}

/// Coarse session lifecycle state used by guards and redirects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Authenticated,
    Unauthenticated,
}

/// Owns session state for the whole process. Constructed once at startup and
/// handed to consumers by reference; there is no global fallback instance.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    sessions: Arc<watch::Sender<Session>>,
    refresh_timeout: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self::with_refresh_timeout(provider, Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn with_refresh_timeout(provider: Arc<dyn IdentityProvider>, refresh_timeout: Duration) -> Self {
        let (tx, _rx) = watch::channel(Session::initializing());
        Self { provider, sessions: Arc::new(tx), refresh_timeout }
    }

    /// Start draining the provider's change stream. Returns a handle for
    /// shutdown; aborting it is the teardown path.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StreamClaimed` if a listener is already running.
    pub fn spawn_listener(&self) -> Result<JoinHandle<()>, AuthError> {
        let changes = self.provider.subscribe()?;
        let worker = Listener {
            provider: Arc::clone(&self.provider),
            sessions: Arc::clone(&self.sessions),
            refresh_timeout: self.refresh_timeout,
        };
        Ok(tokio::spawn(async move { worker.run(changes).await }))
    }

    /// Read-only subscription to session snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sessions.subscribe()
    }

    /// Current snapshot without subscribing.
    #[must_use]
    pub fn current(&self) -> Session {
        self.sessions.borrow().clone()
    }

    /// Sign out through the provider. On success the published session drops
    /// the identity; on failure the session is left unchanged and the error
    /// is returned for the caller to surface.
    ///
    /// # Errors
    ///
    /// Propagates the provider's sign-out error.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.sessions.send_replace(Session::unauthenticated());
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "sign-out failed; keeping current session");
                Err(e)
            }
        }
    }
}

struct Listener {
    provider: Arc<dyn IdentityProvider>,
    sessions: Arc<watch::Sender<Session>>,
    refresh_timeout: Duration,
}

impl Listener {
    async fn run(&self, mut changes: mpsc::Receiver<Option<Principal>>) {
        while let Some(change) = changes.recv().await {
            self.apply(change).await;
        }
        info!("identity change stream closed");
    }

    async fn apply(&self, change: Option<Principal>) {
        let Some(principal) = change else {
            self.sessions.send_replace(Session::unauthenticated());
            return;
        };

        // Refresh before publishing so authorized calls issued right after
        // the session flips never race a stale token.
        let refresh = tokio::time::timeout(self.refresh_timeout, self.provider.refresh_token(&principal, true)).await;
        let session = match refresh {
            Ok(Ok(())) => {
                info!(uid = %principal.uid, "session authenticated");
                Session::authenticated(UserIdentity::from(principal))
            }
            Ok(Err(e)) => {
                warn!(uid = %principal.uid, error = %e, "token refresh failed; treating as signed out");
                Session::unauthenticated()
            }
            Err(_) => {
                warn!(uid = %principal.uid, timeout_secs = self.refresh_timeout.as_secs(), "token refresh timed out; treating as signed out");
                Session::unauthenticated()
            }
        };
        self.sessions.send_replace(session);
    }
}
