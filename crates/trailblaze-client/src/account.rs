// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account administration calls.
//!
//! Administrative operations check the caller's capabilities locally before
//! any request is made; the server still has the final say. Profile edits,
//! the visibility toggle and removal requests act on the caller's own
//! account and need no capability.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trailblaze_auth::{AuthError, Capability, Role, RoleContext};

use crate::api::{non_empty_or, response_message};
use crate::error::{ClientError, ClientResult};
use crate::guard::SessionGuard;
use crate::transport::{HttpRequest, HttpTransport};

/// Force-logout endpoint.
pub const FORCE_LOGOUT_PATH: &str = "/force-logout";
/// Self-service removal request endpoint.
pub const REMOVAL_REQUEST_PATH: &str = "/account/remove-request";
/// Institutional account creation endpoint.
pub const INSTITUTIONAL_REGISTER_PATH: &str = "/register/institutional";
/// Own profile update endpoint.
pub const PROFILE_UPDATE_PATH: &str = "/account/update";
/// Own profile visibility toggle endpoint.
pub const PROFILE_VISIBILITY_PATH: &str = "/profile";

const MISSING_FIELDS_MESSAGE: &str = "Please fill all required fields";
const UNKNOWN: &str = "Unknown";

// =============================================================================
// AccountOperation
// =============================================================================

/// An administrative state change on another user's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountOperation {
    /// Activate the account.
    Activate,
    /// Deactivate the account.
    Deactivate,
    /// Suspend the account.
    Suspend,
    /// Remove the account.
    Remove,
}

impl AccountOperation {
    /// Returns the operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountOperation::Activate => "activate",
            AccountOperation::Deactivate => "deactivate",
            AccountOperation::Suspend => "suspend",
            AccountOperation::Remove => "remove",
        }
    }

    /// Parses an operation name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.as_str() == s)
    }

    /// Returns all operations.
    pub fn all() -> &'static [AccountOperation] {
        &[
            AccountOperation::Activate,
            AccountOperation::Deactivate,
            AccountOperation::Suspend,
            AccountOperation::Remove,
        ]
    }

    /// Returns the endpoint path.
    pub fn endpoint(&self) -> &'static str {
        match self {
            AccountOperation::Activate => "/activate",
            AccountOperation::Deactivate => "/deactivate",
            AccountOperation::Suspend => "/suspend",
            AccountOperation::Remove => "/account/remove",
        }
    }
}

impl fmt::Display for AccountOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetRequest<'a> {
    target_username: &'a str,
}

// =============================================================================
// UserFilter
// =============================================================================

/// Which user list to fetch. The server takes one filter at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserFilter {
    /// Every user.
    #[default]
    All,
    /// Users holding a role.
    Role(String),
    /// Users in an account state, such as `ATIVADA`.
    State(String),
    /// Users with a profile visibility, such as `PUBLICO`.
    Profile(String),
}

impl UserFilter {
    /// Returns the list endpoint.
    pub fn path(&self) -> String {
        match self {
            UserFilter::All => "/list/all".to_string(),
            UserFilter::Role(role) => format!("/list/role/{}", role),
            UserFilter::State(state) => format!("/list/state/{}", state),
            UserFilter::Profile(profile) => format!("/list/profile/{}", profile),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Institutional account creation form, filled in by an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalForm {
    /// Login name.
    pub username: String,
    /// E-mail address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Full name.
    pub full_name: String,
    /// Role wire value.
    pub role: String,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Tax identification number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nif: Option<String>,
    /// Citizen card number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// Whether the profile is public.
    pub public_profile: bool,
}

impl InstitutionalForm {
    /// Creates a form with the required fields.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    /// Checks the required fields and the role.
    pub fn validate(&self) -> ClientResult<()> {
        let blank = [&self.username, &self.email, &self.password, &self.full_name, &self.role]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            return Err(ClientError::validation(MISSING_FIELDS_MESSAGE));
        }
        if !Role::parse(self.role.trim()).is_known() {
            return Err(ClientError::validation(format!("Unknown role: {}", self.role.trim())));
        }
        Ok(())
    }
}

/// Own profile update form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Full name.
    pub full_name: String,
    /// Phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Nationality.
    pub nationality: String,
    /// Country of residence.
    pub residence_country: String,
    /// Tax identification number.
    pub nif: String,
    /// Citizen card number.
    pub cc: String,
    /// Always sent as `false`; visibility has its own toggle.
    pub is_public: bool,
}

/// State and visibility of one account, as shown to an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetails {
    /// Short username.
    pub username: String,
    /// Account state, or `Unknown`.
    pub state: String,
    /// Profile visibility, or `Unknown`.
    pub profile: String,
}

// =============================================================================
// AccountApi
// =============================================================================

/// Account calls made through the session guard.
pub struct AccountApi<T> {
    guard: Arc<SessionGuard<T>>,
}

impl<T: HttpTransport> AccountApi<T> {
    /// Creates the API over a shared guard.
    pub fn new(guard: Arc<SessionGuard<T>>) -> Self {
        Self { guard }
    }

    /// Runs an administrative operation on `target`.
    ///
    /// Returns the message to show on success.
    pub async fn execute(
        &self,
        ctx: &RoleContext,
        operation: AccountOperation,
        target: &str,
    ) -> ClientResult<String> {
        ctx.require(Capability::AdminManagement)?;
        let target = require_target(target)?;

        self.post_target(operation.endpoint(), target, &format!("Error in {}", operation))
            .await?;
        tracing::info!(operation = %operation, target = %target, "Account operation completed");
        Ok(format!("Operation {} completed!", operation))
    }

    /// Ends a user's session.
    ///
    /// When the target is the caller, the local session is ended too and
    /// the user is sent to the login page.
    pub async fn force_logout(&self, ctx: &RoleContext, target: &str) -> ClientResult<String> {
        ctx.require(Capability::AdminManagement)?;
        let target = require_target(target)?;
        let own = self.guard.require_session()?.short_username() == target;

        self.post_target(FORCE_LOGOUT_PATH, target, "Error forcing logout.")
            .await?;
        tracing::info!(target = %target, "Forced logout");
        if own {
            self.guard.end_session();
        }
        Ok(format!("User {} logged out successfully!", target))
    }

    /// Creates an institutional account.
    pub async fn register_institutional(
        &self,
        ctx: &RoleContext,
        form: &InstitutionalForm,
    ) -> ClientResult<String> {
        ctx.require(Capability::AdminManagement)?;
        form.validate()?;

        let request = HttpRequest::post(INSTITUTIONAL_REGISTER_PATH).with_json(form)?;
        let response = self.guard.send(request).await?;
        response_message(response, "", "Error creating user.")?;
        tracing::info!(user = %form.username, role = %form.role, "Institutional account created");
        Ok("Institutional user created successfully!".to_string())
    }

    /// Fetches a user list. Needs an admin role in any position.
    pub async fn list_users(&self, ctx: &RoleContext, filter: &UserFilter) -> ClientResult<Vec<String>> {
        require_admin_any(ctx)?;
        self.guard.get_json(&filter.path()).await
    }

    /// Fetches a user's state and profile visibility.
    ///
    /// Either half falls back to `Unknown` when the server will not say.
    pub async fn user_details(&self, ctx: &RoleContext, user: &str) -> ClientResult<UserDetails> {
        require_admin_any(ctx)?;
        let user = require_target(user)?;

        let state = self.optional_field(&format!("/account/state/{}", user), "estado").await?;
        let profile = self.optional_field(&format!("/account/profile/{}", user), "profile").await?;
        Ok(UserDetails {
            username: user.to_string(),
            state: state.unwrap_or_else(|| UNKNOWN.to_string()),
            profile: profile.unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }

    /// Updates the caller's own profile.
    pub async fn update_profile(&self, form: &ProfileUpdate) -> ClientResult<String> {
        let request = HttpRequest::put(PROFILE_UPDATE_PATH).with_json(form)?;
        let response = self.guard.send(request).await?;
        response_message(response, "", "Error updating profile.")?;
        Ok("Profile updated successfully!".to_string())
    }

    /// Flips the caller's profile between public and private.
    ///
    /// Returns the server's confirmation text.
    pub async fn toggle_profile_visibility(&self) -> ClientResult<String> {
        let response = self.guard.send(HttpRequest::post(PROFILE_VISIBILITY_PATH)).await?;
        response_message(response, "Profile visibility updated.", "Error toggling profile visibility.")
    }

    /// Asks for the current user's account to be removed.
    pub async fn request_removal(&self) -> ClientResult<String> {
        let response = self.guard.send(HttpRequest::patch(REMOVAL_REQUEST_PATH)).await?;
        if response.is_success() {
            Ok("Account removal request submitted successfully!".to_string())
        } else {
            let body = non_empty_or(response.body, "Error requesting account removal.");
            Err(ClientError::http(response.status, body))
        }
    }

    async fn optional_field(&self, path: &str, field: &str) -> ClientResult<Option<String>> {
        let response = self.guard.send(HttpRequest::get(path)).await?;
        if !response.is_success() {
            return Ok(None);
        }
        let body: Value = match response.json() {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(path, error = %e, "Ignoring unreadable account detail");
                return Ok(None);
            }
        };
        Ok(body.get(field).and_then(Value::as_str).map(str::to_string))
    }

    async fn post_target(&self, path: &str, target: &str, fallback: &str) -> ClientResult<()> {
        let request = HttpRequest::post(path).with_json(&TargetRequest {
            target_username: target,
        })?;
        let response = self.guard.send(request).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(ClientError::http(response.status, non_empty_or(response.body, fallback)))
        }
    }
}

fn require_admin_any(ctx: &RoleContext) -> ClientResult<()> {
    if ctx.is_admin_any() {
        Ok(())
    } else {
        Err(AuthError::permission_denied(Capability::AdminManagement.denied_message()).into())
    }
}

fn require_target(target: &str) -> ClientResult<&str> {
    let target = target.trim();
    if target.is_empty() {
        Err(ClientError::validation("Please choose a user."))
    } else {
        Ok(target)
    }
}
