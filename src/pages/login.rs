//! Login screen controller — credential submit and post-auth redirect.
//!
//! The submit path never navigates on its own: a successful sign-in surfaces
//! through the identity change stream, the session flips to authenticated,
//! and `observe_session` performs the one-time redirect. Failures surface as
//! an inline error string.

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;

use std::sync::Arc;

use crate::nav::Navigator;
use crate::net::identity::IdentityProvider;
use crate::state::session::Session;

/// Landing route for authenticated users arriving from the login screen.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Trim the email and require both fields.
pub(crate) fn validate_credentials(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Controller state for the login screen.
pub struct LoginController {
    navigator: Arc<dyn Navigator>,
    pub email: String,
    pub password: String,
    pub error: String,
    pub busy: bool,
    redirected: bool,
}

impl LoginController {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator,
            email: String::new(),
            password: String::new(),
            error: String::new(),
            busy: false,
            redirected: false,
        }
    }

    /// Submit the current credentials. Re-entrant submits while busy are
    /// ignored; validation and provider errors land in `error`.
    pub async fn submit(&mut self, provider: &dyn IdentityProvider) {
        if self.busy {
            return;
        }
        let (email, password) = match validate_credentials(&self.email, &self.password) {
            Ok(fields) => fields,
            Err(message) => {
                self.error = message.to_owned();
                return;
            }
        };

        self.busy = true;
        self.error.clear();
        match provider.sign_in_with_credentials(&email, &password).await {
            Ok(()) => {
                tracing::info!(%email, "sign-in accepted; awaiting session update");
            }
            Err(e) => {
                tracing::warn!(%email, error = %e, "sign-in failed");
                self.error = e.to_string();
            }
        }
        self.busy = false;
    }

    /// React to a session snapshot: an authenticated session on the login
    /// screen redirects to the dashboard, once.
    pub fn observe_session(&mut self, session: &Session) {
        if session.identity.is_some() && !self.redirected {
            self.redirected = true;
            self.navigator.navigate(DASHBOARD_PATH);
        }
    }
}
