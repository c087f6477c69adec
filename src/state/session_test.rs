use super::*;
use std::sync::atomic::Ordering;

use crate::net::identity::test_support::FakeIdentityProvider;

async fn next_session(rx: &mut watch::Receiver<Session>) -> Session {
    tokio::time::timeout(Duration::from_secs(1), rx.changed())
        .await
        .expect("session update within deadline")
        .expect("watch channel open");
    rx.borrow().clone()
}

fn spawn_store(provider: Arc<FakeIdentityProvider>) -> (SessionStore, JoinHandle<()>) {
    let store = SessionStore::new(provider);
    let handle = store.spawn_listener().expect("first listener");
    (store, handle)
}

// =============================================================================
// Loading lifecycle
// =============================================================================

#[tokio::test]
async fn store_starts_initializing() {
    let provider = Arc::new(FakeIdentityProvider::new());
    let store = SessionStore::new(provider);
    let session = store.current();
    assert!(session.loading);
    assert!(session.identity.is_none());
    assert_eq!(session.phase(), SessionPhase::Initializing);
}

#[tokio::test]
async fn loading_clears_on_first_notification_and_stays_false() {
    let provider = Arc::new(FakeIdentityProvider::new());
    let (store, _handle) = spawn_store(provider.clone());
    let mut rx = store.subscribe();

    provider.push(None).await;
    let session = next_session(&mut rx).await;
    assert!(!session.loading);

    provider.push(Some(FakeIdentityProvider::principal("u1", "a@b.com"))).await;
    let session = next_session(&mut rx).await;
    assert!(!session.loading);

    provider.push(None).await;
    let session = next_session(&mut rx).await;
    assert!(!session.loading);
}

// =============================================================================
// Notifications
// =============================================================================

#[tokio::test]
async fn principal_with_successful_refresh_authenticates() {
    let provider = Arc::new(FakeIdentityProvider::new());
    let (store, _handle) = spawn_store(provider.clone());
    let mut rx = store.subscribe();

    provider.push(Some(FakeIdentityProvider::principal("u1", "a@b.com"))).await;
    let session = next_session(&mut rx).await;

    let identity = session.identity.clone().expect("authenticated");
    assert_eq!(identity.id, "u1");
    assert_eq!(identity.email, "a@b.com");
    assert!(!session.loading);
    assert_eq!(session.phase(), SessionPhase::Authenticated);
}

#[tokio::test]
async fn refresh_failure_fails_closed() {
    let provider = Arc::new(FakeIdentityProvider::new());
    provider.refresh_ok.store(false, Ordering::Relaxed);
    let (store, _handle) = spawn_store(provider.clone());
    let mut rx = store.subscribe();

    provider.push(Some(FakeIdentityProvider::principal("u1", "a@b.com"))).await;
    let session = next_session(&mut rx).await;

    assert!(session.identity.is_none());
    assert!(!session.loading);
}

#[tokio::test]
async fn refresh_timeout_fails_closed() {
    let provider = Arc::new(FakeIdentityProvider::new());
    if let Ok(mut delay) = provider.refresh_delay.lock() {
        *delay = Some(Duration::from_millis(200));
    }
    let store = SessionStore::with_refresh_timeout(provider.clone(), Duration::from_millis(10));
    let _handle = store.spawn_listener().expect("listener");
    let mut rx = store.subscribe();

    provider.push(Some(FakeIdentityProvider::principal("u1", "a@b.com"))).await;
    let session = next_session(&mut rx).await;

    assert!(session.identity.is_none());
    assert!(!session.loading);
}

#[tokio::test]
async fn null_notification_publishes_unauthenticated() {
    let provider = Arc::new(FakeIdentityProvider::new());
    let (store, _handle) = spawn_store(provider.clone());
    let mut rx = store.subscribe();

    provider.push(None).await;
    let session = next_session(&mut rx).await;

    assert!(session.identity.is_none());
    assert_eq!(session.phase(), SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn slow_refresh_does_not_overwrite_a_later_sign_out() {
    let provider = Arc::new(FakeIdentityProvider::new());
    if let Ok(mut delay) = provider.refresh_delay.lock() {
        *delay = Some(Duration::from_millis(50));
    }
    let (store, _handle) = spawn_store(provider.clone());

    // Sign-out lands while the sign-in's refresh is still in flight. Each
    // notification is processed to completion before the next, so the final
    // published state must reflect the sign-out.
    provider.push(Some(FakeIdentityProvider::principal("u1", "a@b.com"))).await;
    provider.push(None).await;

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(store.current().identity.is_none());
    assert!(!store.current().loading);
}

// =============================================================================
// Sign-out
// =============================================================================

#[tokio::test]
async fn sign_out_success_drops_identity() {
    let provider = Arc::new(FakeIdentityProvider::new());
    let (store, _handle) = spawn_store(provider.clone());
    let mut rx = store.subscribe();

    provider.push(Some(FakeIdentityProvider::principal("u1", "a@b.com"))).await;
    let _ = next_session(&mut rx).await;

    store.sign_out().await.expect("sign-out");
    assert!(store.current().identity.is_none());
}

#[tokio::test]
async fn sign_out_failure_keeps_identity() {
    let provider = Arc::new(FakeIdentityProvider::new());
    let (store, _handle) = spawn_store(provider.clone());
    let mut rx = store.subscribe();

    provider.push(Some(FakeIdentityProvider::principal("u1", "a@b.com"))).await;
    let _ = next_session(&mut rx).await;

    provider.sign_out_ok.store(false, Ordering::Relaxed);
    let result = store.sign_out().await;
    assert!(result.is_err());
    assert_eq!(store.current().identity.map(|u| u.id), Some("u1".to_owned()));
}

// =============================================================================
// Listener lifecycle
// =============================================================================

#[tokio::test]
async fn second_listener_is_rejected() {
    let provider = Arc::new(FakeIdentityProvider::new());
    let (store, _handle) = spawn_store(provider);
    assert!(matches!(store.spawn_listener(), Err(AuthError::StreamClaimed)));
}

#[tokio::test]
async fn aborted_listener_stops_publishing() {
    let provider = Arc::new(FakeIdentityProvider::new());
    let (store, handle) = spawn_store(provider.clone());
    let mut rx = store.subscribe();

    provider.push(None).await;
    let _ = next_session(&mut rx).await;

    handle.abort();
    tokio::time::sleep(Duration::from_millis(20)).await;

    provider.push(Some(FakeIdentityProvider::principal("u1", "a@b.com"))).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.current().identity.is_none());
}
