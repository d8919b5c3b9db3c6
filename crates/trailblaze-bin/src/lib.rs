// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trailblaze-bin
//!
//! The `trailblaze` command-line client.
//!
//! ```text
//!                 main.rs
//!                    │
//!             ┌──────▼──────┐
//!             │   cli.rs    │
//!             └──────┬──────┘
//!        ┌───────────┼───────────┐
//!        ▼           ▼           ▼
//!   ┌──────────┐ ┌────────┐ ┌──────────┐
//!   │ commands │ │  app   │ │ logging  │
//!   └────┬─────┘ └───┬────┘ └──────────┘
//!        └─────┬─────┘
//!       ┌──────▼──────────────┐
//!       │ trailblaze-{client, │
//!       │  view, config}      │
//!       └─────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! trailblaze login -u ana --password-stdin
//! trailblaze whoami --format json
//! trailblaze open dashboard reports
//! trailblaze account suspend rui
//! trailblaze logout
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod navigator;

pub use app::ClientApp;
pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use navigator::TerminalNavigator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
