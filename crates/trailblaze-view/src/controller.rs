// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Page controller: one page load, from session check to section data.
//!
//! Page actions (imports, event changes, account operations) run through
//! the client APIs and, once the server accepts them, reload the section
//! whose data they changed. A rejected action reloads nothing.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use trailblaze_auth::{Capability, CapabilitySet, RoleContext};
use trailblaze_client::{
    AccountApi, AccountOperation, EventApi, EventForm, HttpTransport, InstitutionalForm,
    ProfileUpdate, Session, SessionGuard, UserDetails, UserFilter, WorksheetApi,
};

use crate::error::{ViewError, ViewResult};
use crate::loader::{rest_sections, RestSectionLoader, SectionLoader};
use crate::page::{PageKind, PageLayout};
use crate::router::{LoadOutcome, Navigation, SectionContent, SectionRouter};

/// Notifications endpoint.
pub const NOTIFICATIONS_PATH: &str = "/notify-out/notifications";

/// How a worksheet is opened in the details section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorksheetView {
    /// Summary view, open to every user of the page.
    Generic,
    /// Full view, needs [`Capability::DetailedSearch`].
    Detailed,
}

impl WorksheetView {
    fn path(&self, id: &str) -> String {
        match self {
            WorksheetView::Generic => format!("/fo/{}/generic", id),
            WorksheetView::Detailed => format!("/fo/{}/detail", id),
        }
    }
}

/// What a page action produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// Message to show the user.
    pub message: String,
    /// Reload of the affected section. `None` when nothing was reloaded,
    /// either because the action needs no reload or because the reload
    /// failed after the action itself succeeded.
    pub refreshed: Option<LoadOutcome>,
}

impl ActionOutcome {
    fn message_only(message: String) -> Self {
        Self {
            message,
            refreshed: None,
        }
    }
}

/// The user strip shown in every page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    /// Short username.
    pub display_name: String,
    /// Avatar initial.
    pub initial: Option<String>,
    /// Primary role wire value.
    pub primary_role: String,
    /// All decoded role wire values.
    pub roles: Vec<String>,
}

// =============================================================================
// PageController
// =============================================================================

/// Owns the role context and section router for one page load.
pub struct PageController<T> {
    kind: PageKind,
    session: Session,
    ctx: Arc<RoleContext>,
    router: SectionRouter,
    guard: Arc<SessionGuard<T>>,
}

impl<T: HttpTransport + 'static> PageController<T> {
    /// Opens a page.
    ///
    /// Without a session the guard redirects to login and this returns
    /// [`ClientError::AuthExpired`](trailblaze_client::ClientError::AuthExpired).
    /// Roles are decoded once here and fixed for the page's lifetime.
    pub fn open(kind: PageKind, guard: Arc<SessionGuard<T>>) -> ViewResult<Self> {
        let session = guard.require_session()?;
        let ctx = Arc::new(session.role_context());
        let router = SectionRouter::new(kind.layout(), ctx.clone());

        let loader: Arc<dyn SectionLoader> = Arc::new(RestSectionLoader::new(kind, guard.clone()));
        for section in rest_sections(kind) {
            router.register(section, loader.clone())?;
        }

        tracing::debug!(
            page = %kind,
            user = %session.short_username(),
            role = %ctx.primary_role(),
            "Page opened"
        );

        Ok(Self {
            kind,
            session,
            ctx,
            router,
            guard,
        })
    }

    /// Replaces the loader of a section.
    pub fn with_loader(self, section: &str, loader: Arc<dyn SectionLoader>) -> ViewResult<Self> {
        self.router.register(section, loader)?;
        Ok(self)
    }

    /// Shows the initial section and loads it.
    pub async fn start(&self) -> ViewResult<LoadOutcome> {
        self.open_section(self.router.layout().initial()).await
    }

    /// Switches section without loading.
    pub fn switch_section(&self, section: &str) -> ViewResult<Navigation> {
        self.router.switch_section(section)
    }

    /// Switches section and loads it.
    pub async fn open_section(&self, section: &str) -> ViewResult<LoadOutcome> {
        self.router.switch_section(section)?.load().await
    }

    /// Opens a worksheet in the details section.
    pub async fn open_worksheet(&self, id: &str, view: WorksheetView) -> ViewResult<LoadOutcome> {
        self.require_page(PageKind::Worksheets, "details")?;
        if view == WorksheetView::Detailed {
            self.ctx.require(Capability::DetailedSearch)?;
        }

        let navigation = self.router.switch_section("details")?;
        let result = self.guard.get_json::<Value>(&view.path(id)).await;
        navigation.commit(result)
    }

    /// Shows the users section with a filtered list.
    ///
    /// Like the section's own loader, nothing is fetched unless some role
    /// is an admin role.
    pub async fn open_users(&self, filter: &UserFilter) -> ViewResult<LoadOutcome> {
        self.require_page(PageKind::Dashboard, "users")?;
        let navigation = self.router.switch_section("users")?;
        if !self.ctx.is_admin_any() {
            return Ok(LoadOutcome::Skipped);
        }
        let result = self.guard.get_json::<Value>(&filter.path()).await;
        navigation.commit(result)
    }

    // =========================================================================
    // Worksheet actions
    // =========================================================================

    /// Imports a GeoJSON worksheet, then reloads the search list.
    pub async fn import_worksheets(&self, geojson: &Value) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Worksheets, "search")?;
        let message = self.worksheets().import(&self.ctx, geojson).await?;
        settle(message, self.open_section("search").await)
    }

    /// Edits a worksheet, then reopens it in the detailed view.
    pub async fn update_worksheet(&self, id: &str, fields: &Value) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Worksheets, "details")?;
        let message = self.worksheets().update(&self.ctx, id, fields).await?;
        settle(message, self.open_worksheet(id, WorksheetView::Detailed).await)
    }

    /// Deletes a worksheet, then goes back to the search list.
    pub async fn delete_worksheet(&self, id: &str) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Worksheets, "search")?;
        let message = self.worksheets().delete(&self.ctx, id).await?;
        settle(message, self.open_section("search").await)
    }

    // =========================================================================
    // Event actions
    // =========================================================================

    /// Creates an event, then reloads the visible event list.
    pub async fn create_event(&self, form: &EventForm) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Events, "overview")?;
        let message = self.events().create(&self.ctx, form).await?;
        self.reload_events(message).await
    }

    /// Edits an event, then reloads the visible event list.
    pub async fn update_event(&self, id: &str, form: &EventForm) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Events, "overview")?;
        let message = self.events().update(&self.ctx, id, form).await?;
        self.reload_events(message).await
    }

    /// Deletes an event, then reloads the visible event list.
    pub async fn delete_event(&self, id: &str) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Events, "overview")?;
        let message = self.events().delete(&self.ctx, id).await?;
        self.reload_events(message).await
    }

    /// Signs up for an event, then reloads the visible event list.
    pub async fn register_for_event(&self, id: &str) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Events, "overview")?;
        let message = self.events().register(id).await?;
        self.reload_events(message).await
    }

    /// Withdraws from an event, then reloads the visible event list.
    pub async fn unregister_from_event(&self, id: &str) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Events, "overview")?;
        let message = self.events().unregister(id).await?;
        self.reload_events(message).await
    }

    /// Lists who signed up for an event.
    pub async fn event_registrations(&self, id: &str) -> ViewResult<Vec<String>> {
        self.require_page(PageKind::Events, "overview")?;
        Ok(self.events().registrations(&self.ctx, id).await?)
    }

    // =========================================================================
    // Account actions
    // =========================================================================

    /// Runs an account operation, then reloads the user list.
    pub async fn account_operation(
        &self,
        operation: AccountOperation,
        target: &str,
    ) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Dashboard, "accounts")?;
        let message = self.accounts().execute(&self.ctx, operation, target).await?;
        settle(message, self.open_section("users").await)
    }

    /// Ends a user's session, then reloads the session list.
    ///
    /// Ending one's own session leaves the page, so nothing is reloaded.
    pub async fn force_logout(&self, target: &str) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Dashboard, "sessions")?;
        let message = self.accounts().force_logout(&self.ctx, target).await?;
        if target.trim() == self.session.short_username() {
            return Ok(ActionOutcome::message_only(message));
        }
        settle(message, self.open_section("sessions").await)
    }

    /// Creates an institutional account, then reloads the user list.
    pub async fn register_institutional(&self, form: &InstitutionalForm) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Dashboard, "users")?;
        let message = self.accounts().register_institutional(&self.ctx, form).await?;
        settle(message, self.open_section("users").await)
    }

    /// Fetches a user's state and profile visibility.
    pub async fn user_details(&self, user: &str) -> ViewResult<UserDetails> {
        Ok(self.accounts().user_details(&self.ctx, user).await?)
    }

    /// Updates the user's own profile.
    pub async fn update_profile(&self, form: &ProfileUpdate) -> ViewResult<ActionOutcome> {
        let message = self.accounts().update_profile(form).await?;
        Ok(ActionOutcome::message_only(message))
    }

    /// Flips profile visibility, then reloads the overview.
    pub async fn toggle_profile_visibility(&self) -> ViewResult<ActionOutcome> {
        self.require_page(PageKind::Dashboard, "overview")?;
        let message = self.accounts().toggle_profile_visibility().await?;
        settle(message, self.open_section("overview").await)
    }

    /// Asks for the user's account to be removed.
    pub async fn request_removal(&self) -> ViewResult<ActionOutcome> {
        let message = self.accounts().request_removal().await?;
        Ok(ActionOutcome::message_only(message))
    }

    /// Fetches the notification list.
    pub async fn notifications(&self) -> ViewResult<Value> {
        self.ctx.require(Capability::Notifications)?;
        Ok(self.guard.get_json(NOTIFICATIONS_PATH).await?)
    }

    /// Returns the header strip.
    pub fn header(&self) -> PageHeader {
        PageHeader {
            display_name: self.session.short_username().to_string(),
            initial: self.session.display_initial(),
            primary_role: self.ctx.primary_role().to_string(),
            roles: self.ctx.roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Returns the page kind.
    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// Returns the page layout.
    pub fn layout(&self) -> &PageLayout {
        self.router.layout()
    }

    /// Returns the role context.
    pub fn context(&self) -> &RoleContext {
        &self.ctx
    }

    /// Returns the capabilities of the primary role.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.ctx.capabilities
    }

    /// Returns the router.
    pub fn router(&self) -> &SectionRouter {
        &self.router
    }

    /// Returns the visible section.
    pub fn current_section(&self) -> &'static str {
        self.router.current_section()
    }

    /// Returns the title of the visible section.
    pub fn title(&self) -> &'static str {
        self.router.title()
    }

    /// Returns the content of the visible section, if loaded.
    pub fn displayed(&self) -> Option<SectionContent> {
        self.router.displayed()
    }

    fn require_page(&self, kind: PageKind, section: &str) -> ViewResult<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(ViewError::unknown_section(self.kind.as_str(), section))
        }
    }

    async fn reload_events(&self, message: String) -> ViewResult<ActionOutcome> {
        let section = match self.current_section() {
            "registered" => "registered",
            _ => "overview",
        };
        settle(message, self.open_section(section).await)
    }

    fn worksheets(&self) -> WorksheetApi<T> {
        WorksheetApi::new(self.guard.clone())
    }

    fn events(&self) -> EventApi<T> {
        EventApi::new(self.guard.clone())
    }

    fn accounts(&self) -> AccountApi<T> {
        AccountApi::new(self.guard.clone())
    }
}

/// Pairs an accepted action with its reload.
///
/// The action already happened, so only an ended session is passed on;
/// any other reload failure is logged and reported as no reload.
fn settle(message: String, refresh: ViewResult<LoadOutcome>) -> ViewResult<ActionOutcome> {
    match refresh {
        Ok(outcome) => Ok(ActionOutcome {
            message,
            refreshed: Some(outcome),
        }),
        Err(e) if e.is_auth_failure() => Err(e),
        Err(e) => {
            tracing::warn!(error = %e, "Reload after action failed");
            Ok(ActionOutcome::message_only(message))
        }
    }
}
