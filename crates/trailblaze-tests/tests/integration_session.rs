// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for guarded requests, forced logout and persistence.

use std::sync::Arc;

use serde_json::json;
use trailblaze_client::{
    AccountOperation, ClientError, FileStorage, HttpMethod, HttpRequest, Session, SessionEvent,
    SessionStore,
};
use trailblaze_bin::ClientApp;
use trailblaze_tests::common::temp_test_dir;
use trailblaze_tests::prelude::*;

async fn wait_for_in_flight(transport: &MockTransport, expected: usize) {
    while transport.in_flight() < expected {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Guarded requests
// =============================================================================

#[tokio::test]
async fn test_guarded_request_carries_credentials() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.respond_json("/list/all", json!(["ana", "rui"]));

    let users: Vec<String> = client.guard().get_json("/list/all").await.unwrap();
    assert_eq!(users, vec!["ana", "rui"]);

    let request = client.transport.last_request(HttpMethod::Get, "/list/all").unwrap();
    let token = client.store().get().unwrap().unwrap().token().to_string();
    assert_eq!(request.header("authorization"), Some(format!("Bearer {}", token).as_str()));
    assert_eq!(request.header("username"), Some("ana"));
}

#[tokio::test]
async fn test_configured_username_header() {
    let mut config = trailblaze_config::ClientConfig::default();
    config.api.username_header = "x-username".to_string();
    let client = TestClient::with_config(config);
    client.store().set(SessionFixtures::partner_operator()).unwrap();
    client.transport.respond_json("/events", json!([]));

    let _: serde_json::Value = client.guard().get_json("/events").await.unwrap();

    let request = client.transport.last_request(HttpMethod::Get, "/events").unwrap();
    assert_eq!(request.header("x-username"), Some("pedro"));
    assert_eq!(request.header("username"), None);
}

#[tokio::test]
async fn test_request_without_session_redirects() {
    let client = TestClient::new();

    let err = client.guard().send(HttpRequest::get("/list/all")).await.unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(client.navigator.redirects(), vec!["login.html"]);
    assert!(client.transport.requests().is_empty());
}

#[tokio::test]
async fn test_non_auth_errors_keep_session() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.respond("/list/all", 500, "boom");
    client.transport.fail("/list/logged", "timeout");

    let err = client.guard().get_json::<serde_json::Value>("/list/all").await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    let err = client.guard().get_json::<serde_json::Value>("/list/logged").await.unwrap_err();
    assert!(matches!(err, ClientError::Network { .. }));

    assert!(client.store().is_logged_in().unwrap());
    assert_eq!(client.navigator.count(), 0);
}

// =============================================================================
// Forced logout
// =============================================================================

#[tokio::test]
async fn test_single_rejection_ends_session() {
    init_test_logging();
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.respond("/list/all", 401, "");
    let mut events = client.store().subscribe();

    let err = client.guard().send(HttpRequest::get("/list/all")).await.unwrap_err();

    assert!(matches!(err, ClientError::AuthExpired));
    assert!(!client.store().is_logged_in().unwrap());
    assert_eq!(client.navigator.redirects(), vec!["login.html"]);
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Expired {
            username: "ana@trailblaze.pt".to_string()
        }
    );
}

#[tokio::test]
async fn test_concurrent_rejections_redirect_once() {
    init_test_logging();
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.respond("/list/all", 403, "");
    let gate = client.transport.hold("/list/all");
    let mut events = client.store().subscribe();

    let mut handles = Vec::new();
    for _ in 0..3 {
        let guard = client.guard();
        handles.push(tokio::spawn(async move {
            guard.send(HttpRequest::get("/list/all")).await
        }));
    }

    wait_for_in_flight(&client.transport, 3).await;
    gate.notify_waiters();

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ClientError::AuthExpired)));
    }

    assert_eq!(client.navigator.count(), 1);
    assert!(matches!(events.try_recv().unwrap(), SessionEvent::Expired { .. }));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_late_rejection_keeps_new_session() {
    let client = TestClient::logged_in(SessionFixtures::user_with_admin_secondary());
    client.transport.respond("/list/all", 403, "");
    let gate = client.transport.hold("/list/all");

    let guard = client.guard();
    let pending = tokio::spawn(async move { guard.send(HttpRequest::get("/list/all")).await });
    wait_for_in_flight(&client.transport, 1).await;

    // A fresh login lands while the old token's request is still out.
    client.store().set(SessionFixtures::sysadmin()).unwrap();
    gate.notify_one();

    assert!(matches!(pending.await.unwrap(), Err(ClientError::AuthExpired)));
    assert_eq!(client.navigator.count(), 0);
    let session = client.store().get().unwrap().unwrap();
    assert_eq!(session.short_username(), "ana");
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_file_session_survives_reopen() {
    let dir = temp_test_dir("trailblaze-session");
    let path = dir.path().join("nested").join("session.json");

    let store = SessionStore::new(Arc::new(FileStorage::open(&path).unwrap()));
    store.set(SessionFixtures::partner_back_office()).unwrap();
    assert!(path.exists());

    let reopened = SessionStore::new(Arc::new(FileStorage::open(&path).unwrap()));
    let session = reopened.get().unwrap().unwrap();
    assert_eq!(session.username(), "paula");
    assert_eq!(session.role_context().primary_role().as_str(), "PRBO");

    reopened.clear().unwrap();
    let emptied = SessionStore::new(Arc::new(FileStorage::open(&path).unwrap()));
    assert!(!emptied.is_logged_in().unwrap());
}

#[tokio::test]
async fn test_rejection_redirects_even_when_session_file_is_stuck() {
    let dir = temp_test_dir("trailblaze-session");
    let path = dir.path().join("session.json");
    let store = SessionStore::new(Arc::new(FileStorage::open(&path).unwrap()));
    store.set(SessionFixtures::sysadmin()).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();

    // Writes go through a sibling temp file; a directory there blocks them.
    std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

    let transport = Arc::new(MockTransport::new());
    transport.respond("/list/all", 403, "");
    let navigator = Arc::new(RecordingNavigator::new());
    let app = ClientApp::with_parts(
        trailblaze_config::ClientConfig::default(),
        transport.clone(),
        store.clone(),
        navigator.clone(),
    );

    let err = app.guard().send(HttpRequest::get("/list/all")).await.unwrap_err();
    assert!(matches!(err, ClientError::AuthExpired));
    assert_eq!(navigator.redirects(), vec!["login.html"]);

    // The failed removal left memory and disk agreeing with each other.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), saved);
    assert!(store.is_logged_in().unwrap());
}

#[test]
fn test_malformed_session_file_reads_as_logged_out() {
    let dir = temp_test_dir("trailblaze-session");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = SessionStore::new(Arc::new(FileStorage::open(&path).unwrap()));
    assert!(!store.is_logged_in().unwrap());

    store.set(Session::new(TokenFixtures::with_roles("rui", &["RU"]), "rui")).unwrap();
    let reopened = SessionStore::new(Arc::new(FileStorage::open(&path).unwrap()));
    assert!(reopened.is_logged_in().unwrap());
}

// =============================================================================
// Account operations
// =============================================================================

#[tokio::test]
async fn test_account_operation_denied_for_non_admin() {
    let client = TestClient::logged_in(SessionFixtures::user_with_admin_secondary());
    let ctx = client.store().get().unwrap().unwrap().role_context();

    let err = client
        .app
        .accounts()
        .execute(&ctx, AccountOperation::Suspend, "pedro")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::PermissionDenied { .. }));
    assert!(client.transport.requests().is_empty());
}

#[tokio::test]
async fn test_account_operation_posts_target() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    let ctx = client.store().get().unwrap().unwrap().role_context();
    client.transport.respond("/suspend", 200, "");
    client.transport.respond("/force-logout", 404, "User not found");

    let message = client
        .app
        .accounts()
        .execute(&ctx, AccountOperation::Suspend, " pedro ")
        .await
        .unwrap();
    assert_eq!(message, "Operation suspend completed!");

    let body = client
        .transport
        .last_request(HttpMethod::Post, "/suspend")
        .and_then(|r| r.body)
        .unwrap();
    assert_eq!(body, json!({ "targetUsername": "pedro" }));

    let err = client.app.accounts().force_logout(&ctx, "ghost").await.unwrap_err();
    assert_eq!(err.user_message(), "User not found");
    assert!(client.store().is_logged_in().unwrap());
}

#[tokio::test]
async fn test_removal_request_uses_patch() {
    let client = TestClient::logged_in(SessionFixtures::partner_operator());
    client.transport.respond("/account/remove-request", 200, "");

    let message = client.app.accounts().request_removal().await.unwrap();
    assert_eq!(message, "Account removal request submitted successfully!");
    assert!(
        client
            .transport
            .last_request(HttpMethod::Patch, "/account/remove-request")
            .is_some()
    );
}

#[tokio::test]
async fn test_force_logout_of_own_account_ends_session() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    let ctx = client.store().get().unwrap().unwrap().role_context();
    client.transport.respond("/force-logout", 200, "");

    let message = client.app.accounts().force_logout(&ctx, "ana").await.unwrap();
    assert_eq!(message, "User ana logged out successfully!");
    assert!(!client.store().is_logged_in().unwrap());
    assert_eq!(client.navigator.redirects(), vec!["login.html"]);
}
