use super::*;

use crate::nav::test_support::RecordingNavigator;
use crate::net::types::UserIdentity;

fn identity(id: &str) -> UserIdentity {
    UserIdentity { id: id.to_owned(), email: format!("{id}@example.com"), display_name: None }
}

// =============================================================================
// Outcomes per phase
// =============================================================================

#[test]
fn initializing_renders_placeholder_without_navigation() {
    let nav = Arc::new(RecordingNavigator::new());
    let mut guard = RouteGuard::new(nav.clone());

    let outcome = guard.evaluate(&Session::initializing());
    assert_eq!(outcome, GuardOutcome::Placeholder);
    assert!(nav.paths().is_empty());
}

#[test]
fn authenticated_renders_content() {
    let nav = Arc::new(RecordingNavigator::new());
    let mut guard = RouteGuard::new(nav.clone());

    let outcome = guard.evaluate(&Session::authenticated(identity("u1")));
    assert_eq!(outcome, GuardOutcome::Content);
    assert!(nav.paths().is_empty());
}

#[test]
fn unauthenticated_hides_content_and_navigates_to_login() {
    let nav = Arc::new(RecordingNavigator::new());
    let mut guard = RouteGuard::new(nav.clone());

    let outcome = guard.evaluate(&Session::unauthenticated());
    assert_eq!(outcome, GuardOutcome::Hidden);
    assert_eq!(nav.paths(), vec![LOGIN_PATH.to_owned()]);
}

// =============================================================================
// Edge-triggered navigation
// =============================================================================

#[test]
fn staying_unauthenticated_does_not_refire_navigation() {
    let nav = Arc::new(RecordingNavigator::new());
    let mut guard = RouteGuard::new(nav.clone());

    for _ in 0..5 {
        guard.evaluate(&Session::unauthenticated());
    }
    assert_eq!(nav.paths().len(), 1);
}

#[test]
fn transition_from_initializing_navigates_once() {
    let nav = Arc::new(RecordingNavigator::new());
    let mut guard = RouteGuard::new(nav.clone());

    guard.evaluate(&Session::initializing());
    guard.evaluate(&Session::unauthenticated());
    guard.evaluate(&Session::unauthenticated());
    assert_eq!(nav.paths().len(), 1);
}

#[test]
fn transition_from_authenticated_navigates_again() {
    let nav = Arc::new(RecordingNavigator::new());
    let mut guard = RouteGuard::new(nav.clone());

    guard.evaluate(&Session::unauthenticated());
    guard.evaluate(&Session::authenticated(identity("u1")));
    guard.evaluate(&Session::unauthenticated());
    assert_eq!(nav.paths().len(), 2);
}

#[test]
fn fresh_mount_rederives_from_current_state() {
    let nav = Arc::new(RecordingNavigator::new());

    let mut first = RouteGuard::new(nav.clone());
    first.evaluate(&Session::unauthenticated());

    // A new mount has no memory of the previous guard's decision.
    let mut second = RouteGuard::new(nav.clone());
    second.evaluate(&Session::unauthenticated());

    assert_eq!(nav.paths().len(), 2);
}

#[test]
fn custom_login_path_is_used() {
    let nav = Arc::new(RecordingNavigator::new());
    let mut guard = RouteGuard::with_login_path(nav.clone(), "/signin");

    guard.evaluate(&Session::unauthenticated());
    assert_eq!(nav.paths(), vec!["/signin".to_owned()]);
}
