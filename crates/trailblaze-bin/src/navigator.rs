// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Terminal stand-in for a page redirect.

use trailblaze_client::Navigator;

/// Tells the user to log in again instead of navigating.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl TerminalNavigator {
    /// Returns the line printed for a redirect to `login_path`.
    pub fn message(login_path: &str) -> String {
        format!("Session expired, please log in again ({})", login_path)
    }
}

impl Navigator for TerminalNavigator {
    fn redirect(&self, path: &str) {
        tracing::warn!(login_path = %path, "Session ended");
        eprintln!("{}", Self::message(path));
    }
}
