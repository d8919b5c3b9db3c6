// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for token decoding, role policy and the auth API.

use serde_json::json;
use trailblaze_auth::{decode_payload, decode_roles, Capability, Role, RoleContext};
use trailblaze_client::{
    ClientError, HttpMethod, RegistrationForm, SessionEvent, CONNECTION_ERROR_MESSAGE,
};
use trailblaze_tests::prelude::*;

// =============================================================================
// Token decoding and role policy
// =============================================================================

#[test]
fn test_fixture_tokens_decode() {
    let token = TokenFixtures::with_roles("ana", &["SYSADMIN", "SMBO"]);
    let payload = decode_payload(&token).unwrap();

    assert_eq!(payload.sub.as_deref(), Some("ana"));
    assert_eq!(payload.exp, Some(TokenFixtures::EXPIRY));

    let roles = decode_roles(&token);
    assert_eq!(roles.primary(), &Role::SysAdmin);
    assert!(roles.contains(&Role::Smbo));
}

#[test]
fn test_legacy_role_claim_and_standard_alphabet() {
    let legacy = decode_roles(&TokenFixtures::with_single_role("pedro", "PO"));
    assert_eq!(legacy.primary(), &Role::Po);
    assert_eq!(legacy.len(), 1);

    let standard = decode_roles(&TokenFixtures::standard_alphabet("sara", &["SDVBO", "RU"]));
    assert_eq!(standard.primary(), &Role::Sdvbo);
    assert!(standard.contains(&Role::Ru));
}

#[test]
fn test_undecodable_tokens_fall_back_to_registered_user() {
    for token in [
        TokenFixtures::malformed(),
        TokenFixtures::with_payload(&json!({ "sub": "x", "roles": [] })),
        TokenFixtures::with_payload(&json!({ "sub": "x" })),
    ] {
        let ctx = RoleContext::from_token("x", &token);
        assert_eq!(ctx.primary_role(), &Role::Ru, "{token}");
        assert!(ctx.can(Capability::EventsNav));
        assert!(!ctx.can(Capability::AdminManagement));
    }
}

#[test]
fn test_fixture_sessions_capabilities() {
    init_test_logging();

    let admin = SessionFixtures::sysadmin().role_context();
    assert!(admin.can(Capability::AdminManagement));
    assert!(admin.can(Capability::CreateEvents));
    assert!(admin.can(Capability::DetailedSearch));
    assert!(!admin.can(Capability::Notifications));

    let secondary = SessionFixtures::user_with_admin_secondary().role_context();
    assert!(secondary.is_admin_any());
    assert!(!secondary.is_admin_primary());
    assert!(!secondary.can(Capability::AdminManagement));

    let prbo = SessionFixtures::partner_back_office().role_context();
    assert!(prbo.can(Capability::Notifications));
    assert!(prbo.can(Capability::WorksheetsNav));
    assert!(!prbo.can(Capability::EventsNav));

    let po = SessionFixtures::partner_operator().role_context();
    assert!(po.can(Capability::ExecutionSheetsNav));
    assert!(!po.can(Capability::WorksheetsNav));
    assert!(!po.can(Capability::DetailedSearch));

    let sdvbo = SessionFixtures::sheet_viewer().role_context();
    assert!(sdvbo.can(Capability::DetailedSearch));
    assert!(!sdvbo.can(Capability::EditWorksheet));
}

#[test]
fn test_denied_capability_carries_message() {
    let ctx = SessionFixtures::partner_operator().role_context();
    let err = ctx.require(Capability::DetailedSearch).unwrap_err();
    assert!(err.to_string().contains("Insufficient permissions for detailed search"));
}

// =============================================================================
// Login / logout
// =============================================================================

#[tokio::test]
async fn test_login_stores_session() {
    init_test_logging();
    let client = TestClient::new();
    let token = TokenFixtures::with_roles("ana", &["SYSADMIN"]);
    client
        .transport
        .respond_json("/login-jwt", json!({ "token": token }));

    let mut events = client.store().subscribe();
    let session = client.app.auth().login("ana@trailblaze.pt", "Abcdef1!").await.unwrap();

    assert_eq!(session.token(), token);
    assert_eq!(session.short_username(), "ana");
    assert!(client.store().is_logged_in().unwrap());
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::LoggedIn {
            username: "ana@trailblaze.pt".to_string()
        }
    );

    let request = client
        .transport
        .last_request(HttpMethod::Post, "/login-jwt")
        .unwrap();
    assert_eq!(
        request.body,
        Some(json!({ "username": "ana@trailblaze.pt", "password": "Abcdef1!" }))
    );
    assert_eq!(request.header("Authorization"), None);
}

#[tokio::test]
async fn test_login_rejected() {
    let client = TestClient::new();

    client.transport.respond("/login-jwt", 401, "");
    let err = client.app.auth().login("ana", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid credentials.");

    client.transport.respond("/login-jwt", 403, "Account suspended");
    let err = client.app.auth().login("ana", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.user_message(), "Account suspended");

    assert!(!client.store().is_logged_in().unwrap());
    assert_eq!(client.navigator.count(), 0);
}

#[tokio::test]
async fn test_login_network_failure() {
    let client = TestClient::new();
    client.transport.fail("/login-jwt", "connection refused");

    let err = client.app.auth().login("ana", "Abcdef1!").await.unwrap_err();
    assert!(matches!(err, ClientError::Network { .. }));
    assert_eq!(err.user_message(), CONNECTION_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let client = TestClient::new();

    assert!(matches!(
        client.app.auth().login("  ", "Abcdef1!").await,
        Err(ClientError::Validation { .. })
    ));
    assert!(matches!(
        client.app.auth().login("ana", "").await,
        Err(ClientError::Validation { .. })
    ));
    assert!(client.transport.requests().is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_when_server_fails() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.fail("/logout/jwt", "connection reset");

    let mut events = client.store().subscribe();
    let cleared = client.app.auth().logout().await.unwrap();

    assert_eq!(cleared.map(|s| s.short_username().to_string()).as_deref(), Some("ana"));
    assert!(!client.store().is_logged_in().unwrap());
    assert!(matches!(events.try_recv().unwrap(), SessionEvent::LoggedOut { .. }));
    assert_eq!(client.navigator.count(), 0);

    let request = client
        .transport
        .last_request(HttpMethod::Post, "/logout/jwt")
        .unwrap();
    assert!(request.header("Authorization").unwrap().starts_with("Bearer "));
    assert_eq!(request.header("username"), Some("ana"));
}

#[tokio::test]
async fn test_logout_without_session() {
    let client = TestClient::new();
    assert_eq!(client.app.auth().logout().await.unwrap(), None);
    assert!(client.transport.requests().is_empty());
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_checks_passwords_locally() {
    let client = TestClient::new();

    let weak = RegistrationForm::new("joana", "joana@trailblaze.pt", "Joana Silva", "abcdefgh");
    assert!(matches!(
        client.app.auth().register(&weak).await,
        Err(ClientError::Validation { .. })
    ));

    let mismatch = RegistrationForm::new("joana", "joana@trailblaze.pt", "Joana Silva", "Abcdef1!")
        .with_confirmation("Abcdef1?");
    let err = client.app.auth().register(&mismatch).await.unwrap_err();
    assert_eq!(err.user_message(), "Passwords do not match.");

    assert_eq!(client.transport.request_count("/register/civic"), 0);
}

#[tokio::test]
async fn test_register_sends_form() {
    let client = TestClient::new();
    client.transport.respond("/register/civic", 201, "");

    let form = RegistrationForm::new("joana", "joana@trailblaze.pt", "Joana Silva", "Abcdef1!");
    let message = client.app.auth().register(&form).await.unwrap();
    assert_eq!(message, "Account created successfully!");

    let body = client
        .transport
        .last_request(HttpMethod::Post, "/register/civic")
        .and_then(|r| r.body)
        .unwrap();
    assert_eq!(body["username"], "joana");
    assert_eq!(body["fullName"], "Joana Silva");
    assert!(body.get("confirmPassword").is_none());
    assert!(!client.store().is_logged_in().unwrap());
}

#[tokio::test]
async fn test_register_conflict_uses_server_text() {
    let client = TestClient::new();
    client.transport.respond("/register/civic", 409, "Username already taken");

    let form = RegistrationForm::new("joana", "joana@trailblaze.pt", "Joana Silva", "Abcdef1!");
    let err = client.app.auth().register(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "Username already taken");
}
