//! Route guard gating protected screens on session state.
//!
//! DESIGN
//! ======
//! Navigation to the login entry point is edge-triggered: the guard keeps
//! the previously observed session phase and fires only on the transition
//! into `Unauthenticated` (or on the first evaluation of a fresh mount).
//! Staying unauthenticated across re-evaluations never re-fires. The guard
//! performs no I/O of its own.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use std::sync::Arc;

use crate::nav::Navigator;
use crate::state::session::{Session, SessionPhase};

/// Login entry point targeted when an unauthenticated session is observed.
pub const LOGIN_PATH: &str = "/login";

/// What the wrapped route should render after an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session still resolving: show a placeholder, no side effects.
    Placeholder,
    /// Authenticated: render the wrapped content unchanged.
    Content,
    /// Unauthenticated: render nothing; navigation has been requested.
    Hidden,
}

/// Per-mount guard. Each mount constructs a fresh guard and re-derives its
/// decision from current session state; nothing is cached across mounts.
pub struct RouteGuard {
    navigator: Arc<dyn Navigator>,
    login_path: String,
    last_phase: Option<SessionPhase>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self::with_login_path(navigator, LOGIN_PATH)
    }

    #[must_use]
    pub fn with_login_path(navigator: Arc<dyn Navigator>, login_path: impl Into<String>) -> Self {
        Self { navigator, login_path: login_path.into(), last_phase: None }
    }

    /// Evaluate the session and return what to render. Requests navigation
    /// to the login path exactly once per transition into unauthenticated.
    pub fn evaluate(&mut self, session: &Session) -> GuardOutcome {
        let phase = session.phase();
        let outcome = match phase {
            SessionPhase::Initializing => GuardOutcome::Placeholder,
            SessionPhase::Authenticated => GuardOutcome::Content,
            SessionPhase::Unauthenticated => {
                if self.last_phase != Some(SessionPhase::Unauthenticated) {
                    self.navigator.navigate(&self.login_path);
                }
                GuardOutcome::Hidden
            }
        };
        self.last_phase = Some(phase);
        outcome
    }
}
