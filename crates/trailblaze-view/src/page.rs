// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Page kinds and their declared sections.

use std::fmt;

use serde::Serialize;
use trailblaze_auth::{Capability, RoleContext};

// =============================================================================
// SectionGate
// =============================================================================

/// Condition a user must meet for a section's data to be loaded.
///
/// A gated section is still shown when selected; only its loader is
/// skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionGate {
    /// Any decoded role is `SYSADMIN` or `SYSBO`.
    AdminAny,
    /// The primary role grants the capability.
    Capability(Capability),
}

impl SectionGate {
    /// Returns `true` if the context passes the gate.
    pub fn allows(&self, ctx: &RoleContext) -> bool {
        match self {
            SectionGate::AdminAny => ctx.is_admin_any(),
            SectionGate::Capability(capability) => ctx.can(*capability),
        }
    }
}

// =============================================================================
// SectionSpec
// =============================================================================

/// A section declared by a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionSpec {
    /// Identifier used for switching.
    pub name: &'static str,
    /// Page title shown while the section is visible.
    pub title: &'static str,
    /// Loader gate.
    pub gate: Option<SectionGate>,
}

impl SectionSpec {
    const fn open(name: &'static str, title: &'static str) -> Self {
        Self {
            name,
            title,
            gate: None,
        }
    }

    const fn gated(name: &'static str, title: &'static str, gate: SectionGate) -> Self {
        Self {
            name,
            title,
            gate: Some(gate),
        }
    }
}

const DASHBOARD_SECTIONS: &[SectionSpec] = &[
    SectionSpec::open("overview", "Overview"),
    SectionSpec::open("profile", "My Profile"),
    SectionSpec::gated("users", "User Management", SectionGate::AdminAny),
    SectionSpec::open("accounts", "Account Operations"),
    SectionSpec::gated("sessions", "Session Management", SectionGate::AdminAny),
    SectionSpec::gated("reports", "Reports & Analytics", SectionGate::AdminAny),
    SectionSpec::open("request-removal", "Request Account Removal"),
];

const USER_PAGE_SECTIONS: &[SectionSpec] = &[
    SectionSpec::open("overview", "Overview"),
    SectionSpec::gated(
        "advanced-settings",
        "Advanced Settings",
        SectionGate::Capability(Capability::AdvancedSettings),
    ),
];

const EVENTS_SECTIONS: &[SectionSpec] = &[
    SectionSpec::open("overview", "Events"),
    SectionSpec::open("registered", "My Events"),
];

const WORKSHEETS_SECTIONS: &[SectionSpec] = &[
    SectionSpec::open("search", "Worksheets"),
    SectionSpec::open("details", "Worksheet Details"),
];

// =============================================================================
// PageKind
// =============================================================================

/// The pages that carry role-dependent sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Back-office dashboard.
    Dashboard,
    /// Landing page after login.
    UserPage,
    /// Events listing.
    Events,
    /// Worksheet search and details.
    Worksheets,
}

impl PageKind {
    /// Returns the page name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Dashboard => "dashboard",
            PageKind::UserPage => "userpage",
            PageKind::Events => "events",
            PageKind::Worksheets => "worksheets",
        }
    }

    /// Parses a page name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == s)
    }

    /// Returns all pages.
    pub fn all() -> &'static [PageKind] {
        &[
            PageKind::Dashboard,
            PageKind::UserPage,
            PageKind::Events,
            PageKind::Worksheets,
        ]
    }

    /// Returns the page's section layout.
    pub fn layout(&self) -> PageLayout {
        let (sections, initial) = match self {
            PageKind::Dashboard => (DASHBOARD_SECTIONS, "overview"),
            PageKind::UserPage => (USER_PAGE_SECTIONS, "overview"),
            PageKind::Events => (EVENTS_SECTIONS, "overview"),
            PageKind::Worksheets => (WORKSHEETS_SECTIONS, "search"),
        };
        PageLayout {
            kind: *self,
            sections,
            initial,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PageLayout
// =============================================================================

/// The sections a page declares, with its initial section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    kind: PageKind,
    sections: &'static [SectionSpec],
    initial: &'static str,
}

impl PageLayout {
    /// Returns the page kind.
    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// Returns the declared sections, in navigation order.
    pub fn sections(&self) -> &'static [SectionSpec] {
        self.sections
    }

    /// Returns the section shown on page load.
    pub fn initial(&self) -> &'static str {
        self.initial
    }

    /// Looks up a declared section.
    pub fn section(&self, name: &str) -> Option<&'static SectionSpec> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Returns `true` if the page declares the section.
    pub fn contains(&self, name: &str) -> bool {
        self.section(name).is_some()
    }
}
