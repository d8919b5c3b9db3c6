// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! Commands that talk to the backend take a [`ClientApp`] so they run the
//! same over any [`HttpTransport`](trailblaze_client::HttpTransport).

mod account;
mod event;
mod open;
mod password;
mod session;
mod validate;
mod version;
mod worksheet;

pub use account::{account, notifications};
pub use event::event;
pub use open::{load_page, open, PageReport, SectionEntry};
pub use password::check_password;
pub use session::{login, logout, register, whoami, WhoAmI};
pub use validate::{collect_warnings, validate};
pub use version::version;
pub use worksheet::worksheet;

use serde::Serialize;
use trailblaze_client::ReqwestTransport;
use trailblaze_config::{ClientConfig, ConfigResult};

use crate::app::ClientApp;
use crate::cli::{Cli, Commands};
use crate::error::{BinError, BinResult};

/// Executes the appropriate command based on CLI arguments.
///
/// `config` is only needed by commands that reach the backend.
pub async fn execute(cli: Cli, config: ConfigResult<ClientConfig>) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Login(args) => session::login(&connect(config)?, args).await,
        Commands::Logout => session::logout(&connect(config)?).await,
        Commands::Register(args) => session::register(&connect(config)?, args).await,
        Commands::Whoami(args) => session::whoami(&connect(config)?, args),
        Commands::CheckPassword(args) => password::check_password(args),
        Commands::Open(args) => open::open(&connect(config)?, args).await,
        Commands::Account(args) => account::account(&connect(config)?, args).await,
        Commands::Worksheet(args) => worksheet::worksheet(&connect(config)?, args).await,
        Commands::Event(args) => event::event(&connect(config)?, args).await,
        Commands::Notifications(args) => account::notifications(&connect(config)?, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Version => version::version(),
    }
}

fn connect(config: ConfigResult<ClientConfig>) -> BinResult<ClientApp<ReqwestTransport>> {
    let config = config.map_err(|e| BinError::from(e).with_context("Failed to load configuration"))?;
    ClientApp::from_config(config)
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> BinResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| BinError::runtime(format!("failed to render JSON: {}", e)))
}
