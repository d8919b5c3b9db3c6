// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Trailblaze Integration Tests
//!
//! Cross-crate tests for the Trailblaze client, with the shared utilities
//! they run on.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: tokens, sessions and configuration files
//!   - `mocks`: a scripted [`HttpTransport`](trailblaze_client::HttpTransport)
//!     and a recording navigator
//!   - `harness`: a fully wired client over the mocks
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p trailblaze-tests
//! cargo test -p trailblaze-tests --test integration_session
//! cargo test -p trailblaze-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! - `integration_auth.rs`: token decoding, role policy, login, logout, registration
//! - `integration_session.rs`: guarded requests, forced logout, persistence
//! - `integration_view.rs`: pages, section routing, stale loads, CLI page reports
//! - `integration_actions.rs`: page actions and the reloads that follow them
//! - `integration_config.rs`: configuration files, placeholders, overrides

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use crate::common::init_test_logging;
}
