use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use super::*;
use crate::api::Method;
use crate::config::ClientConfig;
use crate::error::{ApiError, StorageError};
use crate::test_support::{Harness, MockTransport, TEST_BASE, harness, settle};

fn alice() -> serde_json::Value {
    json!({ "id": "u1", "username": "alice", "email": "alice@example.com" })
}

fn bob() -> serde_json::Value {
    json!({ "id": 7, "username": "bob", "email": "bob@example.com" })
}

fn auth_body(token: &str, user: &serde_json::Value) -> String {
    json!({ "token": token, "user": user }).to_string()
}

fn count_invalidations(h: &Harness) -> Arc<AtomicUsize> {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    h.client.on_unauthorized(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    fired
}

async fn signed_in_as_alice() -> (Harness, SessionManager) {
    let h = harness(Some("tok-alice"));
    h.transport.reply(Method::Get, ME_PATH, 200, alice());
    let session = SessionManager::new(h.client.clone());
    session.restore().await;
    assert_eq!(session.phase(), SessionPhase::Authenticated);
    (h, session)
}

// =============================================================================
// restore
// =============================================================================

#[test]
fn starts_initializing_and_anonymous() {
    let h = harness(Some("tok"));
    let session = SessionManager::new(h.client.clone());

    let snap = session.snapshot();
    assert!(snap.is_initializing);
    assert_eq!(snap.current_user, None);
    assert_eq!(snap.phase(), SessionPhase::Initializing);
    assert_eq!(*session.subscribe().borrow(), snap);
}

#[tokio::test]
async fn restore_with_valid_token_authenticates() {
    let (h, session) = signed_in_as_alice().await;

    let user = session.current_user().unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(session.credential_token().as_deref(), Some("tok-alice"));
    assert!(!session.snapshot().is_initializing);
    assert_eq!(h.transport.last_request().bearer_token(), Some("tok-alice"));
}

#[tokio::test]
async fn restore_without_token_skips_network() {
    let h = harness(None);
    let session = SessionManager::new(h.client.clone());

    session.restore().await;

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn restore_with_rejected_token_clears_it_silently() {
    let h = harness(Some("expired"));
    h.transport.reply_text(Method::Get, ME_PATH, 401, "token expired");
    let fired = count_invalidations(&h);
    let session = SessionManager::new(h.client.clone());

    session.restore().await;

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.credential_token(), None);
    assert_eq!(h.tokens.load(), None);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn restore_with_unreachable_server_clears_token() {
    let h = harness(Some("tok"));
    h.transport.fail(Method::Get, ME_PATH);
    let session = SessionManager::new(h.client.clone());

    session.restore().await;

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(h.tokens.load(), None);
}

#[tokio::test]
async fn restore_runs_once() {
    let (h, session) = signed_in_as_alice().await;

    session.restore().await;

    assert_eq!(h.transport.requests().len(), 1);
    assert_eq!(session.phase(), SessionPhase::Authenticated);
}

// =============================================================================
// login / register
// =============================================================================

#[tokio::test]
async fn login_persists_token_and_sets_user() {
    let h = harness(None);
    h.transport.reply_text(Method::Post, LOGIN_PATH, 200, &auth_body("tok-bob", &bob()));
    let session = SessionManager::new(h.client.clone());
    session.restore().await;

    let user = session.login("bob@example.com", "hunter22").await.unwrap();

    assert_eq!(user.id, "7");
    assert_eq!(session.current_user(), Some(user));
    assert_eq!(session.credential_token().as_deref(), Some("tok-bob"));
    assert_eq!(h.tokens.load().as_deref(), Some("tok-bob"));

    let req = h.transport.last_request();
    assert_eq!(req.body.as_deref(), Some(r#"{"email":"bob@example.com","password":"hunter22"}"#));
}

#[tokio::test]
async fn later_requests_carry_the_new_token() {
    let h = harness(None);
    h.transport.reply_text(Method::Post, LOGIN_PATH, 200, &auth_body("tok-bob", &bob()));
    h.transport.reply(Method::Get, "/stats", 200, json!({}));
    let session = SessionManager::new(h.client.clone());
    session.restore().await;

    session.login("bob@example.com", "hunter22").await.unwrap();
    h.client.execute(crate::api::ApiCall::get("/stats")).await.unwrap();

    assert_eq!(h.transport.last_request().bearer_token(), Some("tok-bob"));
}

#[tokio::test]
async fn register_sends_all_fields_and_signs_in() {
    let h = harness(None);
    h.transport.reply_text(Method::Post, REGISTER_PATH, 201, &auth_body("tok-new", &alice()));
    let session = SessionManager::new(h.client.clone());
    session.restore().await;

    let user = session.register("alice", "alice@example.com", "password1").await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(h.tokens.load().as_deref(), Some("tok-new"));
    let body: serde_json::Value = serde_json::from_str(h.transport.last_request().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "username": "alice", "email": "alice@example.com", "password": "password1" }));
}

#[tokio::test]
async fn failed_login_leaves_session_unchanged() {
    let (h, session) = signed_in_as_alice().await;
    h.transport.reply_text(Method::Post, LOGIN_PATH, 401, r#"{"detail":"Invalid credentials"}"#);
    let fired = count_invalidations(&h);

    let err = session.login("alice@example.com", "wrong").await.unwrap_err();

    match err {
        SessionError::Api(api) => assert_eq!(api.server_message().as_deref(), Some("Invalid credentials")),
        other => panic!("expected api error, got {other:?}"),
    }
    assert_eq!(session.current_user().unwrap().username, "alice");
    assert_eq!(h.tokens.load().as_deref(), Some("tok-alice"));
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert!(!session.snapshot().busy);
}

#[tokio::test]
async fn register_conflict_surfaces_server_error() {
    let h = harness(None);
    h.transport.reply_text(Method::Post, REGISTER_PATH, 409, r#"{"detail":"Username taken"}"#);
    let session = SessionManager::new(h.client.clone());
    session.restore().await;

    let err = session.register("alice", "alice@example.com", "password1").await.unwrap_err();

    assert!(matches!(err, SessionError::Api(ApiError::Http { status: 409, .. })));
    assert_eq!(session.phase(), SessionPhase::Anonymous);
}

struct ReadOnlyStore;

impl TokenStore for ReadOnlyStore {
    fn load(&self) -> Option<String> {
        None
    }

    fn save(&self, _token: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only".to_owned()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[tokio::test]
async fn unpersistable_token_fails_login() {
    let transport = Arc::new(MockTransport::default());
    transport.reply_text(Method::Post, LOGIN_PATH, 200, &auth_body("tok", &alice()));
    let config = ClientConfig::with_api_url(TEST_BASE).unwrap();
    let client = ApiClient::new(&config, transport, Arc::new(ReadOnlyStore));
    let session = SessionManager::new(client);
    session.restore().await;

    let err = session.login("alice@example.com", "password1").await.unwrap_err();

    assert!(matches!(err, SessionError::Storage(_)));
    assert_eq!(session.current_user(), None);
    assert_eq!(session.credential_token(), None);
}

#[tokio::test]
async fn busy_while_credential_exchange_in_flight() {
    let h = harness(None);
    let gate = h.transport.gate(Method::Post, LOGIN_PATH);
    let session = SessionManager::new(h.client.clone());
    session.restore().await;

    let observe = async {
        settle().await;
        let during = session.snapshot().busy;
        gate.send((200, auth_body("tok", &alice()))).unwrap();
        during
    };
    let (result, during) = tokio::join!(session.login("alice@example.com", "password1"), observe);

    assert!(during);
    assert!(result.is_ok());
    assert!(!session.snapshot().busy);
}

// =============================================================================
// logout
// =============================================================================

#[tokio::test]
async fn logout_clears_everything() {
    let (h, session) = signed_in_as_alice().await;

    session.logout();

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.credential_token(), None);
    assert_eq!(h.tokens.load(), None);
}

#[tokio::test]
async fn logout_when_anonymous_is_a_no_op() {
    let h = harness(None);
    let session = SessionManager::new(h.client.clone());
    session.restore().await;
    let mut rx = session.subscribe();
    rx.borrow_and_update();

    session.logout();
    session.logout();

    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert!(!rx.has_changed().unwrap());
}

// =============================================================================
// ordering
// =============================================================================

#[tokio::test]
async fn logout_during_login_wins() {
    let h = harness(None);
    let gate = h.transport.gate(Method::Post, LOGIN_PATH);
    let session = SessionManager::new(h.client.clone());
    session.restore().await;

    let interleave = async {
        settle().await;
        session.logout();
        gate.send((200, auth_body("tok-late", &alice()))).unwrap();
    };
    let (result, ()) = tokio::join!(session.login("alice@example.com", "password1"), interleave);

    assert!(matches!(result, Err(SessionError::Superseded)));
    assert_eq!(session.current_user(), None);
    assert_eq!(session.credential_token(), None);
    assert_eq!(h.tokens.load(), None);
}

#[tokio::test]
async fn newest_login_wins_when_older_resolves_last() {
    let h = harness(None);
    let first_gate = h.transport.gate(Method::Post, LOGIN_PATH);
    let second_gate = h.transport.gate(Method::Post, LOGIN_PATH);
    let session = SessionManager::new(h.client.clone());
    session.restore().await;

    let release = async {
        settle().await;
        second_gate.send((200, auth_body("tok-bob", &bob()))).unwrap();
        settle().await;
        first_gate.send((200, auth_body("tok-alice", &alice()))).unwrap();
    };
    let (first, second, ()) = tokio::join!(
        session.login("alice@example.com", "password1"),
        session.login("bob@example.com", "password2"),
        release
    );

    assert!(matches!(first, Err(SessionError::Superseded)));
    assert_eq!(second.unwrap().username, "bob");
    assert_eq!(session.current_user().unwrap().username, "bob");
    assert_eq!(h.tokens.load().as_deref(), Some("tok-bob"));
}

#[tokio::test]
async fn login_during_restore_is_not_overwritten() {
    let h = harness(Some("tok-old"));
    let restore_gate = h.transport.gate(Method::Get, ME_PATH);
    h.transport.reply_text(Method::Post, LOGIN_PATH, 200, &auth_body("tok-bob", &bob()));
    let session = SessionManager::new(h.client.clone());

    let interleave = async {
        settle().await;
        let user = session.login("bob@example.com", "password2").await;
        restore_gate.send((401, String::new())).unwrap();
        user
    };
    let ((), login) = tokio::join!(session.restore(), interleave);

    assert_eq!(login.unwrap().username, "bob");
    assert_eq!(session.phase(), SessionPhase::Authenticated);
    assert_eq!(h.tokens.load().as_deref(), Some("tok-bob"));
    assert!(!session.snapshot().is_initializing);
}

#[tokio::test]
async fn failed_login_during_restore_keeps_restored_identity() {
    let h = harness(Some("tok-old"));
    let restore_gate = h.transport.gate(Method::Get, ME_PATH);
    h.transport.reply_text(Method::Post, LOGIN_PATH, 401, r#"{"detail":"bad credentials"}"#);
    let session = SessionManager::new(h.client.clone());

    let interleave = async {
        settle().await;
        let attempt = session.login("bob@example.com", "wrong-password").await;
        restore_gate.send((200, alice().to_string())).unwrap();
        attempt
    };
    let ((), login) = tokio::join!(session.restore(), interleave);

    assert!(login.unwrap_err().to_string().contains("unauthorized"));
    assert_eq!(session.phase(), SessionPhase::Authenticated);
    assert_eq!(session.current_user().map(|u| u.username), Some("alice".to_owned()));
    assert_eq!(session.credential_token().as_deref(), Some("tok-old"));
    assert_eq!(h.tokens.load().as_deref(), Some("tok-old"));
}

#[tokio::test]
async fn failed_login_during_rejected_restore_leaves_no_orphan_token() {
    let h = harness(Some("tok-old"));
    let restore_gate = h.transport.gate(Method::Get, ME_PATH);
    h.transport.reply_text(Method::Post, LOGIN_PATH, 401, "");
    let session = SessionManager::new(h.client.clone());

    let interleave = async {
        settle().await;
        let attempt = session.login("bob@example.com", "wrong-password").await;
        restore_gate.send((401, String::new())).unwrap();
        attempt
    };
    let ((), login) = tokio::join!(session.restore(), interleave);

    assert!(login.is_err());
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.credential_token(), None);
    assert_eq!(h.tokens.load(), None);
}

// =============================================================================
// 401 invalidation
// =============================================================================

#[tokio::test]
async fn unauthorized_response_signs_out() {
    let (h, session) = signed_in_as_alice().await;
    h.transport.reply_text(Method::Get, "/users/alice", 401, "expired");

    let err = h.client.execute(crate::api::ApiCall::get("/users/alice")).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.credential_token(), None);
    assert_eq!(h.tokens.load(), None);
}

#[tokio::test]
async fn subscribers_observe_invalidation() {
    let (h, session) = signed_in_as_alice().await;
    h.transport.reply_text(Method::Post, "/models/m1/star", 401, "");
    let mut rx = session.subscribe();
    rx.borrow_and_update();

    assert!(h.client.execute(crate::api::ApiCall::post("/models/m1/star")).await.is_err());

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().phase(), SessionPhase::Anonymous);
}

#[tokio::test]
async fn dropped_manager_ignores_later_unauthorized() {
    let h = harness(Some("tok"));
    h.transport.reply_text(Method::Get, "/x", 401, "");
    drop(SessionManager::new(h.client.clone()));

    assert!(h.client.execute(crate::api::ApiCall::get("/x")).await.is_err());
    assert_eq!(h.tokens.load().as_deref(), Some("tok"));
}

#[test]
fn phase_follows_snapshot_fields() {
    let user = serde_json::from_value::<UserIdentity>(alice()).unwrap();
    let authed = SessionSnapshot { current_user: Some(user), is_initializing: false, busy: false };
    assert_eq!(authed.phase(), SessionPhase::Authenticated);
    assert!(authed.is_authenticated());
    assert_eq!(SessionSnapshot::default().phase(), SessionPhase::Initializing);
    let anon = SessionSnapshot { is_initializing: false, ..SessionSnapshot::default() };
    assert_eq!(anon.phase(), SessionPhase::Anonymous);
}
