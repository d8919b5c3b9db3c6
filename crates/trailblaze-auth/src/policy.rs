// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role policy: the single role-to-capability table shared by all pages.
//!
//! The navigation table (one row per role, unrecognized roles get the `RU`
//! row):
//!
//! ```text
//! Role      admin-mgmt  worksheets-nav  exec-sheets-nav  notifications  advanced-settings
//! SYSADMIN  yes         yes             yes              no             yes
//! SYSBO     yes         yes             yes              no             yes
//! SMBO      no          yes             yes              no             no
//! SDVBO     no          no              yes              no             no
//! PRBO      no          yes             yes              yes            no
//! PO        no          no              yes              no             no
//! RU        no          yes             no               no             no
//! ADLU      no          yes             no               no             yes
//! other     no          yes             no               no             no
//! ```
//!
//! Action capabilities are layered on top: events navigation is hidden for
//! `ADLU`, `SMBO`, `PRBO` and `PO`; event creation needs an admin primary
//! role; worksheet import/edit/delete needs a worksheet manager
//! (`SYSADMIN`, `SYSBO`, `SMBO`); detailed search additionally allows `SDVBO`.

use crate::capability::{Capability, CapabilitySet};
use crate::context::RoleSet;
use crate::role::Role;

/// One row of the navigation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NavigationRow {
    admin_management: bool,
    worksheets_nav: bool,
    execution_sheets_nav: bool,
    notifications: bool,
    advanced_settings: bool,
}

impl NavigationRow {
    const fn new(
        admin_management: bool,
        worksheets_nav: bool,
        execution_sheets_nav: bool,
        notifications: bool,
        advanced_settings: bool,
    ) -> Self {
        Self {
            admin_management,
            worksheets_nav,
            execution_sheets_nav,
            notifications,
            advanced_settings,
        }
    }
}

const DEFAULT_ROW: NavigationRow = NavigationRow::new(false, true, false, false, false);

fn navigation_row(role: &Role) -> NavigationRow {
    match role {
        Role::SysAdmin | Role::SysBo => NavigationRow::new(true, true, true, false, true),
        Role::Smbo => NavigationRow::new(false, true, true, false, false),
        Role::Sdvbo => NavigationRow::new(false, false, true, false, false),
        Role::Prbo => NavigationRow::new(false, true, true, true, false),
        Role::Po => NavigationRow::new(false, false, true, false, false),
        Role::Adlu => NavigationRow::new(false, true, false, false, true),
        Role::Ru | Role::Other(_) => DEFAULT_ROW,
    }
}

/// Returns the capabilities granted to a primary role.
///
/// Total over every [`Role`], including unrecognized values.
pub fn capabilities_for(role: &Role) -> CapabilitySet {
    let row = navigation_row(role);
    let mut set = CapabilitySet::new();

    set.grant_if(Capability::AdminManagement, row.admin_management);
    set.grant_if(Capability::WorksheetsNav, row.worksheets_nav);
    set.grant_if(Capability::ExecutionSheetsNav, row.execution_sheets_nav);
    set.grant_if(Capability::Notifications, row.notifications);
    set.grant_if(Capability::AdvancedSettings, row.advanced_settings);

    set.grant_if(
        Capability::EventsNav,
        !matches!(role, Role::Adlu | Role::Smbo | Role::Prbo | Role::Po),
    );
    set.grant_if(Capability::CreateEvents, is_admin_primary(role));

    let manager = role.is_worksheet_manager();
    set.grant_if(Capability::ImportWorksheets, manager);
    set.grant_if(Capability::EditWorksheet, manager);
    set.grant_if(Capability::DeleteWorksheet, manager);
    set.grant_if(Capability::DetailedSearch, manager || *role == Role::Sdvbo);

    set
}

/// Returns `true` if any decoded role is `SYSADMIN` or `SYSBO`.
pub fn is_admin_any(roles: &RoleSet) -> bool {
    roles.iter().any(Role::is_admin)
}

/// Returns `true` if the given (primary) role is `SYSADMIN` or `SYSBO`.
pub fn is_admin_primary(role: &Role) -> bool {
    role.is_admin()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row_of(role: &Role) -> [bool; 5] {
        let caps = capabilities_for(role);
        [
            caps.contains(Capability::AdminManagement),
            caps.contains(Capability::WorksheetsNav),
            caps.contains(Capability::ExecutionSheetsNav),
            caps.contains(Capability::Notifications),
            caps.contains(Capability::AdvancedSettings),
        ]
    }

    #[test]
    fn test_navigation_table() {
        let expected = [
            (Role::SysAdmin, [true, true, true, false, true]),
            (Role::SysBo, [true, true, true, false, true]),
            (Role::Smbo, [false, true, true, false, false]),
            (Role::Sdvbo, [false, false, true, false, false]),
            (Role::Prbo, [false, true, true, true, false]),
            (Role::Po, [false, false, true, false, false]),
            (Role::Ru, [false, true, false, false, false]),
            (Role::Adlu, [false, true, false, false, true]),
        ];

        for (role, row) in expected {
            assert_eq!(row_of(&role), row, "row for {role}");
        }
    }

    #[test]
    fn test_unrecognized_role_gets_default_row() {
        for raw in ["ADMIN", "", "sysadmin", "GUEST"] {
            let role = Role::parse(raw);
            assert_eq!(row_of(&role), [false, true, false, false, false]);
            assert_eq!(capabilities_for(&role), capabilities_for(&Role::Ru));
        }
    }

    #[test]
    fn test_events_navigation() {
        for role in [Role::Adlu, Role::Smbo, Role::Prbo, Role::Po] {
            assert!(!capabilities_for(&role).contains(Capability::EventsNav));
        }
        for role in [Role::SysAdmin, Role::SysBo, Role::Sdvbo, Role::Ru] {
            assert!(capabilities_for(&role).contains(Capability::EventsNav));
        }
        assert!(capabilities_for(&Role::SysBo).contains(Capability::CreateEvents));
        assert!(!capabilities_for(&Role::Smbo).contains(Capability::CreateEvents));
    }

    #[test]
    fn test_worksheet_actions() {
        let smbo = capabilities_for(&Role::Smbo);
        assert!(smbo.contains_all(&[
            Capability::ImportWorksheets,
            Capability::EditWorksheet,
            Capability::DeleteWorksheet,
            Capability::DetailedSearch,
        ]));

        let sdvbo = capabilities_for(&Role::Sdvbo);
        assert!(sdvbo.contains(Capability::DetailedSearch));
        assert!(!sdvbo.contains(Capability::ImportWorksheets));
        assert!(!sdvbo.contains(Capability::DeleteWorksheet));

        let ru = capabilities_for(&Role::Ru);
        assert!(!ru.contains(Capability::DetailedSearch));
        assert!(!ru.contains(Capability::EditWorksheet));
    }

    #[test]
    fn test_admin_predicates_differ_when_admin_not_primary() {
        let roles = RoleSet::new(vec![Role::Ru, Role::SysAdmin]).unwrap();

        assert!(is_admin_any(&roles));
        assert!(!is_admin_primary(roles.primary()));

        let admin_first = RoleSet::new(vec![Role::SysBo, Role::Ru]).unwrap();
        assert!(is_admin_any(&admin_first));
        assert!(is_admin_primary(admin_first.primary()));

        let plain = RoleSet::default();
        assert!(!is_admin_any(&plain));
        assert!(!is_admin_primary(plain.primary()));
    }
}
