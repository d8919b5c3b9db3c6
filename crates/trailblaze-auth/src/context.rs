// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Decoded roles and the per-page role context.

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, CapabilitySet};
use crate::error::{AuthError, AuthResult};
use crate::policy;
use crate::role::Role;
use crate::token;

// =============================================================================
// RoleSet
// =============================================================================

/// Ordered, non-empty list of roles decoded from a token.
///
/// The first entry is the primary role and drives single-role UI decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates a role set. Returns `None` for an empty list.
    pub fn new(roles: Vec<Role>) -> Option<Self> {
        if roles.is_empty() {
            None
        } else {
            Some(Self { roles })
        }
    }

    /// Creates a role set from wire values, falling back to `[RU]` when empty.
    pub fn from_wire<S: AsRef<str>>(values: &[S]) -> Self {
        let roles = values.iter().map(|v| Role::parse(v.as_ref())).collect();
        Self::new(roles).unwrap_or_default()
    }

    /// The default role set, `[RU]`.
    pub fn fallback() -> Self {
        Self {
            roles: vec![Role::DEFAULT],
        }
    }

    /// Returns the primary role.
    pub fn primary(&self) -> &Role {
        // Non-empty by construction.
        &self.roles[0]
    }

    /// Returns `true` if the set contains the given role.
    pub fn contains(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Returns `true` if the set contains any of the given roles.
    pub fn contains_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.contains(r))
    }

    /// Returns an iterator over the roles in token order.
    pub fn iter(&self) -> std::slice::Iter<'_, Role> {
        self.roles.iter()
    }

    /// Returns the number of roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the roles as a slice.
    pub fn as_slice(&self) -> &[Role] {
        &self.roles
    }

    /// Evaluates the policy table for the primary role.
    pub fn capabilities(&self) -> CapabilitySet {
        policy::capabilities_for(self.primary())
    }

    /// Returns `true` if any role is an admin role.
    pub fn is_admin_any(&self) -> bool {
        policy::is_admin_any(self)
    }

    /// Returns `true` if the primary role is an admin role.
    pub fn is_admin_primary(&self) -> bool {
        policy::is_admin_primary(self.primary())
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::fallback()
    }
}

impl TryFrom<Vec<Role>> for RoleSet {
    type Error = AuthError;

    fn try_from(roles: Vec<Role>) -> Result<Self, Self::Error> {
        Self::new(roles).ok_or_else(|| AuthError::decode("role list is empty"))
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.roles
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a Role;
    type IntoIter = std::slice::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.roles.iter()
    }
}

// =============================================================================
// RoleContext
// =============================================================================

/// Who the current page is rendering for.
///
/// Built once per page load from the persisted session; capabilities are
/// evaluated at construction and whenever [`RoleContext::refresh`] is called.
#[derive(Debug, Clone, Serialize)]
pub struct RoleContext {
    /// Username as stored in the session.
    pub username: String,
    /// Decoded roles.
    pub roles: RoleSet,
    /// Capabilities of the primary role.
    pub capabilities: CapabilitySet,
}

impl RoleContext {
    /// Builds the context for a user and their bearer token.
    pub fn from_token(username: impl Into<String>, bearer_token: &str) -> Self {
        Self::new(username, token::decode_roles(bearer_token))
    }

    /// Builds the context from already-decoded roles.
    pub fn new(username: impl Into<String>, roles: RoleSet) -> Self {
        let capabilities = roles.capabilities();
        Self {
            username: username.into(),
            roles,
            capabilities,
        }
    }

    /// Re-evaluates the policy table.
    pub fn refresh(&mut self) {
        self.capabilities = self.roles.capabilities();
    }

    /// Returns the primary role.
    pub fn primary_role(&self) -> &Role {
        self.roles.primary()
    }

    /// Returns `true` if the user holds the role, primary or not.
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Returns `true` if the capability is granted.
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Fails with a user-visible [`AuthError::PermissionDenied`] when the
    /// capability is missing.
    pub fn require(&self, capability: Capability) -> AuthResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            tracing::debug!(
                user = %self.username,
                role = %self.primary_role(),
                capability = %capability,
                "Capability check failed"
            );
            Err(AuthError::permission_denied(capability.denied_message()))
        }
    }

    /// Returns `true` if any role is an admin role.
    pub fn is_admin_any(&self) -> bool {
        self.roles.is_admin_any()
    }

    /// Returns `true` if the primary role is an admin role.
    pub fn is_admin_primary(&self) -> bool {
        self.roles.is_admin_primary()
    }
}

// =============================================================================
// Tests
// =============================================================================
