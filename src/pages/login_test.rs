use super::*;
use std::sync::atomic::Ordering;

use crate::nav::test_support::RecordingNavigator;
use crate::net::identity::test_support::FakeIdentityProvider;
use crate::net::types::UserIdentity;

fn controller() -> (LoginController, Arc<RecordingNavigator>) {
    let nav = Arc::new(RecordingNavigator::new());
    (LoginController::new(nav.clone()), nav)
}

// =============================================================================
// validate_credentials
// =============================================================================

#[test]
fn validate_trims_email() {
    assert_eq!(
        validate_credentials("  a@b.com  ", "pw"),
        Ok(("a@b.com".to_owned(), "pw".to_owned()))
    );
}

#[test]
fn validate_rejects_empty_email() {
    assert_eq!(validate_credentials("   ", "pw"), Err("Enter both email and password."));
}

#[test]
fn validate_rejects_empty_password() {
    assert_eq!(validate_credentials("a@b.com", ""), Err("Enter both email and password."));
}

// =============================================================================
// submit
// =============================================================================

#[tokio::test]
async fn submit_with_invalid_input_sets_error_without_provider_call() {
    let provider = FakeIdentityProvider::new();
    let (mut login, _nav) = controller();

    login.submit(&provider).await;
    assert_eq!(login.error, "Enter both email and password.");
    assert!(!login.busy);
}

#[tokio::test]
async fn submit_success_clears_error_and_emits_principal() {
    let provider = FakeIdentityProvider::new();
    let mut changes = provider.subscribe().unwrap();
    let (mut login, nav) = controller();
    login.email = "a@b.com".into();
    login.password = "pw".into();
    login.error = "stale".into();

    login.submit(&provider).await;

    assert!(login.error.is_empty());
    assert!(!login.busy);
    // Redirect is driven by the session, not the submit path.
    assert!(nav.paths().is_empty());
    let change = changes.recv().await.unwrap();
    assert_eq!(change.unwrap().email, "a@b.com");
}

#[tokio::test]
async fn submit_failure_surfaces_error_inline() {
    let provider = FakeIdentityProvider::new();
    provider.sign_in_ok.store(false, Ordering::Relaxed);
    let (mut login, nav) = controller();
    login.email = "a@b.com".into();
    login.password = "wrong".into();

    login.submit(&provider).await;

    assert_eq!(login.error, "invalid credentials");
    assert!(!login.busy);
    assert!(nav.paths().is_empty());
}

// =============================================================================
// observe_session
// =============================================================================

#[test]
fn authenticated_session_redirects_to_dashboard_once() {
    let (mut login, nav) = controller();
    let session = Session::authenticated(UserIdentity {
        id: "u1".into(),
        email: "a@b.com".into(),
        display_name: None,
    });

    login.observe_session(&session);
    login.observe_session(&session);

    assert_eq!(nav.paths(), vec![DASHBOARD_PATH.to_owned()]);
}

#[test]
fn unauthenticated_session_does_not_redirect() {
    let (mut login, nav) = controller();
    login.observe_session(&Session::initializing());
    login.observe_session(&Session::unauthenticated());
    assert!(nav.paths().is_empty());
}
