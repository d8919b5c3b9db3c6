// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Section data loaders.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use trailblaze_auth::{Role, RoleContext};
use trailblaze_client::events::{EVENTS_PATH, REGISTERED_EVENTS_PATH};
use trailblaze_client::{ClientError, ClientResult, HttpRequest, HttpTransport, SessionGuard};

use crate::page::PageKind;

/// Account states counted on the reports section.
pub const ACCOUNT_STATES: [&str; 3] = ["ATIVADA", "INATIVO", "SUSPENSA"];

// =============================================================================
// SectionLoader
// =============================================================================

/// Fetches the data shown in a section.
#[async_trait]
pub trait SectionLoader: Send + Sync {
    /// Loads `section` for the given user.
    async fn load(&self, section: &str, ctx: &RoleContext) -> ClientResult<Value>;
}

// =============================================================================
// RestSectionLoader
// =============================================================================

/// Returns the sections [`RestSectionLoader`] serves on a page.
pub fn rest_sections(page: PageKind) -> &'static [&'static str] {
    match page {
        PageKind::Dashboard => &["overview", "users", "sessions", "reports"],
        PageKind::UserPage => &["overview"],
        PageKind::Events => &["overview", "registered"],
        PageKind::Worksheets => &["search"],
    }
}

/// Loads the built-in sections from the REST backend.
///
/// | Page       | Section    | Requests                                        |
/// |------------|------------|-------------------------------------------------|
/// | dashboard  | overview   | profile, state, user total for admins           |
/// | dashboard  | users      | `/list/all`                                     |
/// | dashboard  | sessions   | `/list/logged`                                  |
/// | dashboard  | reports    | per-state and per-role counts, active sessions  |
/// | userpage   | overview   | profile, state                                  |
/// | events     | overview   | `/events`                                       |
/// | events     | registered | `/events/registered`                            |
/// | worksheets | search     | `/fo/search/generic`                            |
pub struct RestSectionLoader<T> {
    page: PageKind,
    guard: Arc<SessionGuard<T>>,
}

impl<T: HttpTransport> RestSectionLoader<T> {
    /// Creates a loader for a page.
    pub fn new(page: PageKind, guard: Arc<SessionGuard<T>>) -> Self {
        Self { page, guard }
    }

    async fn account_overview(&self, ctx: &RoleContext, with_admin_stats: bool) -> ClientResult<Value> {
        let session = self.guard.require_session()?;
        let user = session.short_username();

        let profile = match self.optional_json(&format!("/account/profile/{}", user)).await? {
            Some(body) => text_field(&body, "profile").unwrap_or("Unknown").to_string(),
            None => "Private".to_string(),
        };
        let state = match self.optional_json(&format!("/account/state/{}", user)).await? {
            Some(body) => text_field(&body, "estado").unwrap_or("Active").to_string(),
            None => "Active".to_string(),
        };

        let mut overview = Map::new();
        overview.insert("username".into(), json!(user));
        overview.insert("initial".into(), json!(session.display_initial()));
        overview.insert("role".into(), json!(ctx.primary_role().as_str()));
        overview.insert("profile".into(), json!(profile));
        overview.insert("state".into(), json!(state));

        if with_admin_stats && ctx.is_admin_any() {
            let total = self.count("/list/all").await?;
            overview.insert("totalUsers".into(), json!(total));
        }

        Ok(Value::Object(overview))
    }

    async fn reports(&self) -> ClientResult<Value> {
        let mut states = Map::new();
        for state in ACCOUNT_STATES {
            let count = self.count(&format!("/list/state/{}", state)).await?;
            states.insert(state.to_string(), json!(count));
        }

        let active_sessions = self.count("/list/logged").await?;

        let mut roles = Map::new();
        for role in Role::known().iter().filter(|r| **r != Role::Sdvbo) {
            let count = self.count(&format!("/list/role/{}", role)).await?;
            roles.insert(role.as_str().to_string(), json!(count));
        }

        Ok(json!({
            "states": states,
            "activeSessions": active_sessions,
            "roles": roles,
        }))
    }

    /// GETs a JSON body; non-2xx answers read as `None`.
    async fn optional_json(&self, path: &str) -> ClientResult<Option<Value>> {
        let response = self.guard.send(HttpRequest::get(path)).await?;
        if response.is_success() {
            response.json().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Counts the entries of a list endpoint.
    ///
    /// Anything short of an expired session counts as zero.
    async fn count(&self, path: &str) -> ClientResult<usize> {
        match self.optional_json(path).await {
            Ok(Some(Value::Array(items))) => Ok(items.len()),
            Ok(_) => Ok(0),
            Err(ClientError::AuthExpired) => Err(ClientError::AuthExpired),
            Err(e) => {
                tracing::debug!(path, error = %e, "Count request failed, reporting zero");
                Ok(0)
            }
        }
    }
}

#[async_trait]
impl<T: HttpTransport> SectionLoader for RestSectionLoader<T> {
    async fn load(&self, section: &str, ctx: &RoleContext) -> ClientResult<Value> {
        match (self.page, section) {
            (PageKind::Dashboard, "overview") => self.account_overview(ctx, true).await,
            (PageKind::UserPage, "overview") => self.account_overview(ctx, false).await,
            (PageKind::Dashboard, "users") => self.guard.get_json("/list/all").await,
            (PageKind::Dashboard, "sessions") => self.guard.get_json("/list/logged").await,
            (PageKind::Dashboard, "reports") => self.reports().await,
            (PageKind::Events, "overview") => self.guard.get_json(EVENTS_PATH).await,
            (PageKind::Events, "registered") => self.guard.get_json(REGISTERED_EVENTS_PATH).await,
            (PageKind::Worksheets, "search") => self.guard.get_json("/fo/search/generic").await,
            (page, section) => {
                tracing::debug!(%page, section, "No REST loader for section");
                Ok(Value::Null)
            }
        }
    }
}

fn text_field<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_declared() {
        for page in PageKind::all() {
            let layout = page.layout();
            for section in rest_sections(*page) {
                assert!(layout.contains(section), "{page}/{section}");
            }
        }
    }

    #[test]
    fn test_text_field() {
        let body = json!({"profile": "PUBLICO", "estado": ""});
        assert_eq!(text_field(&body, "profile"), Some("PUBLICO"));
        assert_eq!(text_field(&body, "estado"), None);
        assert_eq!(text_field(&body, "missing"), None);
    }
}
