// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! UI capability definitions.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named UI visibility or action flag derived from a role.
///
/// Capabilities are recomputed every time the policy is evaluated and
/// are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    // =========================================================================
    // Navigation and sections
    // =========================================================================
    /// Account management: admin section, admin stats, user management.
    AdminManagement,
    /// Worksheets navigation entry and actions.
    WorksheetsNav,
    /// Execution sheets navigation entry and actions.
    ExecutionSheetsNav,
    /// Notification button.
    Notifications,
    /// Advanced settings card.
    AdvancedSettings,
    /// Events navigation entry.
    EventsNav,

    // =========================================================================
    // Actions
    // =========================================================================
    /// Create new events.
    CreateEvents,
    /// Import worksheets.
    ImportWorksheets,
    /// Detailed worksheet search and detailed views.
    DetailedSearch,
    /// Edit a worksheet.
    EditWorksheet,
    /// Delete a worksheet.
    DeleteWorksheet,
}

impl Capability {
    /// Returns the capability name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AdminManagement => "admin-mgmt",
            Capability::WorksheetsNav => "worksheets-nav",
            Capability::ExecutionSheetsNav => "exec-sheets-nav",
            Capability::Notifications => "notifications",
            Capability::AdvancedSettings => "advanced-settings",
            Capability::EventsNav => "events-nav",
            Capability::CreateEvents => "create-events",
            Capability::ImportWorksheets => "import-worksheets",
            Capability::DetailedSearch => "detailed-search",
            Capability::EditWorksheet => "edit-worksheet",
            Capability::DeleteWorksheet => "delete-worksheet",
        }
    }

    /// Parses a capability from its name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == s)
    }

    /// Returns all capabilities.
    pub fn all() -> &'static [Capability] {
        &[
            Capability::AdminManagement,
            Capability::WorksheetsNav,
            Capability::ExecutionSheetsNav,
            Capability::Notifications,
            Capability::AdvancedSettings,
            Capability::EventsNav,
            Capability::CreateEvents,
            Capability::ImportWorksheets,
            Capability::DetailedSearch,
            Capability::EditWorksheet,
            Capability::DeleteWorksheet,
        ]
    }

    /// Returns the capabilities that make up the navigation table.
    pub fn navigation() -> &'static [Capability] {
        &[
            Capability::AdminManagement,
            Capability::WorksheetsNav,
            Capability::ExecutionSheetsNav,
            Capability::Notifications,
            Capability::AdvancedSettings,
        ]
    }

    /// Message shown when a user tries an action without this capability.
    pub fn denied_message(&self) -> &'static str {
        match self {
            Capability::ImportWorksheets => "Only managers can import",
            Capability::DetailedSearch => "Insufficient permissions for detailed search",
            Capability::EditWorksheet => "Only managers can edit worksheets",
            Capability::DeleteWorksheet => "Only managers can delete worksheets",
            Capability::CreateEvents => "Only administrators can create events",
            Capability::Notifications => "Only PRBO users can view notifications",
            Capability::AdminManagement => "Administrator access required",
            _ => "You do not have access to this section",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Capability Set
// =============================================================================

/// An ordered set of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    capabilities: BTreeSet<Capability>,
}

impl CapabilitySet {
    /// Creates an empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from a list of capabilities.
    pub fn from_capabilities(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Adds a capability.
    pub fn add(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    /// Adds the capability when `granted` is true.
    pub fn grant_if(&mut self, capability: Capability, granted: bool) {
        if granted {
            self.add(capability);
        }
    }

    /// Returns `true` if the set contains the capability.
    pub fn contains(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns `true` if the set contains all of the given capabilities.
    pub fn contains_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.capabilities.contains(c))
    }

    /// Returns the number of capabilities in the set.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Returns an iterator over the capabilities, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    /// Returns the `(name, granted)` pairs for every known capability.
    pub fn flags(&self) -> Vec<(&'static str, bool)> {
        Capability::all()
            .iter()
            .map(|c| (c.as_str(), self.contains(*c)))
            .collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self::from_capabilities(iter)
    }
}

// =============================================================================
// Tests
// =============================================================================
