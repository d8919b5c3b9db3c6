// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Roles issued by the backend token issuer.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

const KNOWN_ROLES: &[Role] = &[
    Role::Ru,
    Role::SysAdmin,
    Role::SysBo,
    Role::Smbo,
    Role::Sdvbo,
    Role::Prbo,
    Role::Po,
    Role::Adlu,
];

/// A role carried in the token payload.
///
/// The set is closed on the backend; anything else is kept verbatim in
/// [`Role::Other`] and handled like [`Role::Ru`] by the policy table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// System administrator.
    SysAdmin,
    /// System back-office.
    SysBo,
    /// Sheet management back-office.
    Smbo,
    /// Sheet detail viewer back-office.
    Sdvbo,
    /// Partner back-office.
    Prbo,
    /// Partner operator.
    Po,
    /// Registered user.
    Ru,
    /// Adherent landowner user.
    Adlu,
    /// Unrecognized wire value.
    Other(String),
}

impl Role {
    /// The role used when nothing usable can be decoded.
    pub const DEFAULT: Role = Role::Ru;

    /// Returns the wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Role::SysAdmin => "SYSADMIN",
            Role::SysBo => "SYSBO",
            Role::Smbo => "SMBO",
            Role::Sdvbo => "SDVBO",
            Role::Prbo => "PRBO",
            Role::Po => "PO",
            Role::Ru => "RU",
            Role::Adlu => "ADLU",
            Role::Other(value) => value,
        }
    }

    /// Parses a wire value. Matching is exact; unknown values never fail.
    pub fn parse(s: &str) -> Self {
        match s {
            "SYSADMIN" => Role::SysAdmin,
            "SYSBO" => Role::SysBo,
            "SMBO" => Role::Smbo,
            "SDVBO" => Role::Sdvbo,
            "PRBO" => Role::Prbo,
            "PO" => Role::Po,
            "RU" => Role::Ru,
            "ADLU" => Role::Adlu,
            other => Role::Other(other.to_string()),
        }
    }

    /// Returns every role of the closed set, in backend listing order.
    pub fn known() -> &'static [Role] {
        KNOWN_ROLES
    }

    /// Returns `true` if the backend issues this role.
    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Other(_))
    }

    /// Returns `true` for the two system-level administrative roles.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SysAdmin | Role::SysBo)
    }

    /// Returns `true` for roles that manage worksheets (import, edit, delete).
    pub fn is_worksheet_manager(&self) -> bool {
        matches!(self, Role::SysAdmin | Role::SysBo | Role::Smbo)
    }

    /// Human-readable description, used by `whoami`.
    pub fn description(&self) -> &'static str {
        match self {
            Role::SysAdmin => "System administrator",
            Role::SysBo => "System back-office",
            Role::Smbo => "Sheet management back-office",
            Role::Sdvbo => "Sheet detail viewer back-office",
            Role::Prbo => "Partner back-office",
            Role::Po => "Partner operator",
            Role::Ru => "Registered user",
            Role::Adlu => "Adherent landowner user",
            Role::Other(_) => "Unrecognized role (registered user access)",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match Role::parse(&value) {
            Role::Other(_) => Role::Other(value),
            known => known,
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::parse(value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
