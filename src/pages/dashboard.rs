//! Dashboard controller — résumé panel, application list, sign-out.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. The route guard decides whether
//! it renders at all; once mounted it loads the user's résumé and
//! application records and coordinates the edit -> save -> reload flow.
//!
//! ERROR HANDLING
//! ==============
//! Résumé read/save failures surface as inline message strings on this
//! screen only. Application-list failures are logged and leave the list
//! empty. Nothing here touches session state.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

use time::OffsetDateTime;
use tracing::{error, warn};

use crate::forms::resume::ResumeForm;
use crate::net::documents::{APPLICATIONS_COLLECTION, DocumentStore, Filter, RESUMES_COLLECTION};
use crate::net::types::{Application, Resume, UserIdentity};
use crate::state::prefs::{PrefStore, VISITED_DASHBOARD_KEY};
use crate::state::session::SessionStore;

/// Inline message for a failed résumé read.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading your data. Please try again.";
/// Inline message for a failed résumé save.
pub const SAVE_ERROR_MESSAGE: &str = "Error saving resume. Please try again.";

/// Controller state for the dashboard screen.
pub struct DashboardController {
    pub resume: Option<Resume>,
    pub applications: Vec<Application>,
    pub loading: bool,
    pub error: String,
    pub edit_mode: bool,
    pub show_tutorial: bool,
}

impl DashboardController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            resume: None,
            applications: Vec::new(),
            loading: true,
            error: String::new(),
            edit_mode: false,
            show_tutorial: false,
        }
    }

    /// Full mount sequence: résumé, applications, first-visit flag.
    pub async fn load(&mut self, store: &dyn DocumentStore, user: &UserIdentity, prefs: &dyn PrefStore) {
        self.load_resume(store, user).await;
        self.load_applications(store, user).await;
        self.note_first_visit(prefs);
    }

    /// Fetch the user's résumé. A missing document is the normal "no résumé
    /// yet" state; only read failures set the inline error.
    pub async fn load_resume(&mut self, store: &dyn DocumentStore, user: &UserIdentity) {
        self.loading = true;
        match store.get_document(RESUMES_COLLECTION, &user.id).await {
            Ok(Some(value)) => match serde_json::from_value::<Resume>(value) {
                Ok(resume) => {
                    self.resume = Some(resume);
                    self.error.clear();
                }
                Err(e) => {
                    error!(user_id = %user.id, error = %e, "stored resume failed to decode");
                    self.error = LOAD_ERROR_MESSAGE.to_owned();
                }
            },
            Ok(None) => {
                self.resume = None;
                self.error.clear();
            }
            Err(e) => {
                error!(user_id = %user.id, error = %e, "resume load failed");
                self.error = LOAD_ERROR_MESSAGE.to_owned();
            }
        }
        self.loading = false;
    }

    /// Fetch the user's application records. Failures leave the current
    /// list untouched; individual malformed records are skipped.
    pub async fn load_applications(&mut self, store: &dyn DocumentStore, user: &UserIdentity) {
        let filter = Filter::field_eq("user_id", user.id.as_str());
        match store.query_documents(APPLICATIONS_COLLECTION, &filter).await {
            Ok(documents) => {
                self.applications = documents
                    .into_iter()
                    .filter_map(|value| match serde_json::from_value::<Application>(value) {
                        Ok(app) => Some(app),
                        Err(e) => {
                            warn!(user_id = %user.id, error = %e, "skipping malformed application record");
                            None
                        }
                    })
                    .collect();
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "application load failed");
            }
        }
    }

    /// Show the tutorial exactly once per preference-store lifetime.
    fn note_first_visit(&mut self, prefs: &dyn PrefStore) {
        if prefs.get(VISITED_DASHBOARD_KEY).is_none() {
            self.show_tutorial = true;
            prefs.set(VISITED_DASHBOARD_KEY, "true");
        }
    }

    /// Open the résumé editor seeded from the loaded document.
    pub fn begin_edit(&mut self) -> ResumeForm {
        self.edit_mode = true;
        match &self.resume {
            Some(resume) => ResumeForm::from_initial(resume.clone()),
            None => ResumeForm::new(),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_mode = false;
    }

    /// Persist the edited form. Success exits edit mode and refreshes the
    /// panel from the saved document; failure keeps the editor open with an
    /// inline error.
    pub async fn save_resume(&mut self, store: &dyn DocumentStore, user: &UserIdentity, form: &ResumeForm) {
        match form.save(store, &user.id, OffsetDateTime::now_utc()).await {
            Ok(saved) => {
                self.resume = Some(saved);
                self.edit_mode = false;
                self.error.clear();
            }
            Err(e) => {
                error!(user_id = %user.id, error = %e, "resume save failed");
                self.error = SAVE_ERROR_MESSAGE.to_owned();
            }
        }
    }

    /// Sign out via the session store. On failure the session is left
    /// unchanged by the store; this screen just logs and stays put.
    pub async fn sign_out(&self, sessions: &SessionStore) {
        if let Err(e) = sessions.sign_out().await {
            error!(error = %e, "sign-out failed");
        }
    }

    /// Heading label for the signed-in user.
    #[must_use]
    pub fn welcome_label(user: &UserIdentity) -> String {
        format!("Welcome, {}", user.label())
    }
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}
