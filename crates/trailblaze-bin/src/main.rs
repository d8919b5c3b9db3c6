// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Trailblaze command-line client.

use trailblaze_bin::cli::Cli;
use trailblaze_bin::error::report_error_and_exit;
use trailblaze_bin::{commands, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let config = cli.load_config();
    let logging = config.as_ref().map(|c| c.logging).unwrap_or_default();
    init_logging(
        &cli.effective_log_level(logging.level),
        cli.effective_log_format(logging.format),
    );

    if let Err(e) = commands::execute(cli, config).await {
        report_error_and_exit(e);
    }
}
