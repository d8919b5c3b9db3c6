// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration tests for pages, section routing and page reports.

use serde_json::json;
use trailblaze_bin::cli::{OpenArgs, OutputFormat};
use trailblaze_bin::commands::load_page;
use trailblaze_client::ClientError;
use trailblaze_view::{LoadOutcome, PageController, PageKind, ViewError, WorksheetView};
use trailblaze_tests::prelude::*;

fn open_args(page: PageKind, section: Option<&str>) -> OpenArgs {
    OpenArgs {
        page,
        section: section.map(str::to_string),
        worksheet: None,
        detailed: false,
        format: OutputFormat::Text,
    }
}

// =============================================================================
// Opening pages
// =============================================================================

#[tokio::test]
async fn test_open_without_session_redirects() {
    let client = TestClient::new();

    let err = PageController::open(PageKind::Dashboard, client.guard()).err().unwrap();
    assert!(err.is_auth_failure());
    assert_eq!(client.navigator.redirects(), vec!["login.html"]);
}

#[tokio::test]
async fn test_dashboard_overview_for_admin() {
    init_test_logging();
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client
        .transport
        .respond_json("/account/profile/ana", json!({ "profile": "PUBLICO" }))
        .respond_json("/list/all", json!(["ana", "rui", "paula"]));

    let controller = PageController::open(PageKind::Dashboard, client.guard()).unwrap();
    assert_eq!(controller.start().await.unwrap(), LoadOutcome::Applied);

    assert_eq!(controller.current_section(), "overview");
    assert_eq!(controller.header().initial.as_deref(), Some("A"));

    let overview = controller.displayed().unwrap().payload;
    assert_eq!(overview["username"], "ana");
    assert_eq!(overview["role"], "SYSADMIN");
    assert_eq!(overview["profile"], "PUBLICO");
    assert_eq!(overview["state"], "Active");
    assert_eq!(overview["totalUsers"], 3);
}

#[tokio::test]
async fn test_userpage_overview_skips_admin_stats() {
    let client = TestClient::logged_in(SessionFixtures::user_with_admin_secondary());
    client
        .transport
        .respond_json("/account/state/rui", json!({ "estado": "SUSPENSA" }));

    let controller = PageController::open(PageKind::UserPage, client.guard()).unwrap();
    controller.start().await.unwrap();

    let overview = controller.displayed().unwrap().payload;
    assert_eq!(overview["profile"], "Private");
    assert_eq!(overview["state"], "SUSPENSA");
    assert!(overview.get("totalUsers").is_none());
    assert_eq!(client.transport.request_count("/list/all"), 0);
}

#[tokio::test]
async fn test_unknown_section_rejected() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    let controller = PageController::open(PageKind::Dashboard, client.guard()).unwrap();

    let err = controller.open_section("billing").await.unwrap_err();
    assert!(matches!(err, ViewError::UnknownSection { .. }));
    assert_eq!(controller.current_section(), "overview");
}

// =============================================================================
// Section gates
// =============================================================================

#[tokio::test]
async fn test_reports_skipped_for_registered_user() {
    let client = TestClient::logged_in(SessionFixtures::with_roles("joana", &["RU"]));
    let controller = PageController::open(PageKind::Dashboard, client.guard()).unwrap();

    assert_eq!(controller.open_section("reports").await.unwrap(), LoadOutcome::Skipped);
    assert_eq!(controller.current_section(), "reports");
    assert_eq!(controller.title(), "Reports & Analytics");
    assert!(controller.displayed().is_none());
    assert!(client.transport.requests().is_empty());
}

#[tokio::test]
async fn test_reports_load_for_admin_secondary_role() {
    let client = TestClient::logged_in(SessionFixtures::user_with_admin_secondary());
    client
        .transport
        .respond_json("/list/state/ATIVADA", json!(["a", "b", "c"]))
        .respond_json("/list/state/SUSPENSA", json!(["d"]))
        .respond_json("/list/logged", json!(["a", "b"]))
        .respond("/list/role/PO", 500, "");

    let controller = PageController::open(PageKind::Dashboard, client.guard()).unwrap();
    assert_eq!(controller.open_section("reports").await.unwrap(), LoadOutcome::Applied);

    let reports = controller.displayed().unwrap().payload;
    assert_eq!(reports["states"]["ATIVADA"], 3);
    assert_eq!(reports["states"]["INATIVO"], 0);
    assert_eq!(reports["states"]["SUSPENSA"], 1);
    assert_eq!(reports["activeSessions"], 2);
    assert_eq!(reports["roles"]["PO"], 0);
    assert!(reports["roles"].get("SDVBO").is_none());
    assert_eq!(client.transport.request_count("/list/role/SDVBO"), 0);
}

// =============================================================================
// Stale loads
// =============================================================================

#[tokio::test]
async fn test_switch_during_load_drops_stale_result() {
    init_test_logging();
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.respond_json("/list/all", json!(["ana", "rui"]));
    let gate = client.transport.hold("/list/all");

    let controller = PageController::open(PageKind::Dashboard, client.guard()).unwrap();
    let users = tokio::spawn(controller.switch_section("users").unwrap().load());
    while client.transport.in_flight() < 1 {
        tokio::task::yield_now().await;
    }

    let profile = controller.switch_section("profile").unwrap().load().await.unwrap();
    assert_eq!(profile, LoadOutcome::NoLoader);

    gate.notify_one();
    assert_eq!(users.await.unwrap().unwrap(), LoadOutcome::Superseded);

    assert_eq!(controller.current_section(), "profile");
    assert_eq!(controller.title(), "My Profile");
    assert!(controller.displayed().is_none());
    assert!(controller.router().content("users").is_none());
}

#[tokio::test]
async fn test_stale_failure_is_dropped() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.fail("/list/logged", "connection reset");
    let gate = client.transport.hold("/list/logged");

    let controller = PageController::open(PageKind::Dashboard, client.guard()).unwrap();
    let sessions = tokio::spawn(controller.switch_section("sessions").unwrap().load());
    while client.transport.in_flight() < 1 {
        tokio::task::yield_now().await;
    }

    let _ = controller.switch_section("accounts").unwrap();
    gate.notify_one();

    assert_eq!(sessions.await.unwrap().unwrap(), LoadOutcome::Superseded);
    assert_eq!(controller.current_section(), "accounts");
}

#[tokio::test]
async fn test_current_failure_is_reported() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.respond("/list/all", 500, "Database unavailable");

    let controller = PageController::open(PageKind::Dashboard, client.guard()).unwrap();
    let err = controller.open_section("users").await.unwrap_err();

    assert!(matches!(err, ViewError::Load { .. }));
    assert_eq!(err.user_message(), "Database unavailable");
    assert!(client.store().is_logged_in().unwrap());
}

#[tokio::test]
async fn test_rejected_load_ends_session() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.respond("/list/logged", 403, "");

    let controller = PageController::open(PageKind::Dashboard, client.guard()).unwrap();
    let err = controller.open_section("sessions").await.unwrap_err();

    assert!(err.is_auth_failure());
    assert!(!client.store().is_logged_in().unwrap());
    assert_eq!(client.navigator.count(), 1);
}

// =============================================================================
// Worksheets and notifications
// =============================================================================

#[tokio::test]
async fn test_detailed_worksheet_requires_capability() {
    for session in [
        SessionFixtures::partner_operator(),
        SessionFixtures::with_roles("joana", &["RU"]),
    ] {
        let client = TestClient::logged_in(session);
        let controller = PageController::open(PageKind::Worksheets, client.guard()).unwrap();

        let err = controller
            .open_worksheet("42", WorksheetView::Detailed)
            .await
            .unwrap_err();
        assert!(matches!(
            err.client_error(),
            Some(ClientError::PermissionDenied { .. })
        ));
        assert_eq!(err.user_message(), "Insufficient permissions for detailed search");
        assert_eq!(client.transport.request_count("/fo/42/detail"), 0);
    }
}

#[tokio::test]
async fn test_worksheet_views() {
    let client = TestClient::logged_in(SessionFixtures::sheet_viewer());
    client
        .transport
        .respond_json("/fo/42/detail", json!({ "id": "42", "parcels": 7 }))
        .respond_json("/fo/42/generic", json!({ "id": "42" }));

    let controller = PageController::open(PageKind::Worksheets, client.guard()).unwrap();

    let outcome = controller
        .open_worksheet("42", WorksheetView::Detailed)
        .await
        .unwrap();
    assert_eq!(outcome, LoadOutcome::Applied);
    assert_eq!(controller.current_section(), "details");
    assert_eq!(controller.displayed().unwrap().payload["parcels"], 7);

    controller
        .open_worksheet("42", WorksheetView::Generic)
        .await
        .unwrap();
    assert!(controller.displayed().unwrap().payload.get("parcels").is_none());
}

#[tokio::test]
async fn test_worksheet_outside_worksheets_page() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    let controller = PageController::open(PageKind::Events, client.guard()).unwrap();

    let err = controller
        .open_worksheet("42", WorksheetView::Generic)
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::UnknownSection { .. }));
}

#[tokio::test]
async fn test_notifications_for_partner_back_office_only() {
    let client = TestClient::logged_in(SessionFixtures::partner_back_office());
    client
        .transport
        .respond_json("/notify-out/notifications", json!([{ "message": "Sheet 42 approved" }]));

    let controller = PageController::open(PageKind::UserPage, client.guard()).unwrap();
    let list = controller.notifications().await.unwrap();
    assert_eq!(list[0]["message"], "Sheet 42 approved");

    let admin = TestClient::logged_in(SessionFixtures::sysadmin());
    let controller = PageController::open(PageKind::UserPage, admin.guard()).unwrap();
    let err = controller.notifications().await.unwrap_err();
    assert_eq!(err.user_message(), "Only PRBO users can view notifications");
    assert!(admin.transport.requests().is_empty());
}

// =============================================================================
// Page reports
// =============================================================================

#[tokio::test]
async fn test_page_report_for_admin() {
    let client = TestClient::logged_in(SessionFixtures::sysadmin());
    client.transport.respond_json("/list/all", json!(["ana", "rui"]));

    let report = load_page(&client.app, &open_args(PageKind::Dashboard, Some("users")))
        .await
        .unwrap();

    assert_eq!(report.outcome, LoadOutcome::Applied);
    assert_eq!(report.section, "users");
    assert_eq!(report.content, Some(json!(["ana", "rui"])));
    assert_eq!(report.navigation.get("admin-mgmt"), Some(&true));
    assert_eq!(report.navigation.get("notifications"), Some(&false));
    assert!(report.sections.iter().all(|s| s.available));

    let text = report.render_text();
    assert!(text.starts_with("dashboard | User Management\n"));
    assert!(text.contains("User: ana (SYSADMIN)"));
    assert!(text.contains("  > users"));
}

#[tokio::test]
async fn test_page_report_marks_gated_sections() {
    let client = TestClient::logged_in(SessionFixtures::partner_operator());

    let report = load_page(&client.app, &open_args(PageKind::Dashboard, Some("sessions")))
        .await
        .unwrap();

    assert_eq!(report.outcome, LoadOutcome::Skipped);
    let gated: Vec<&str> = report
        .sections
        .iter()
        .filter(|s| !s.available)
        .map(|s| s.name)
        .collect();
    assert_eq!(gated, vec!["users", "sessions", "reports"]);

    let text = report.render_text();
    assert!(text.contains("  - users"));
    assert!(text.contains("(no access to this section's data)"));
    assert!(text.contains("Navigation: exec-sheets-nav"));
}
