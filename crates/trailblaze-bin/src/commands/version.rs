// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::error::BinResult;

/// Prints version information for every crate.
pub fn version() -> BinResult<()> {
    println!("Trailblaze command-line client");
    println!();
    println!("Version Information:");
    println!("  trailblaze-bin:    {}", crate::VERSION);
    println!("  trailblaze-auth:   {}", trailblaze_auth::VERSION);
    println!("  trailblaze-client: {}", trailblaze_client::VERSION);
    println!("  trailblaze-view:   {}", trailblaze_view::VERSION);
    println!("  trailblaze-config: {}", trailblaze_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2024");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
