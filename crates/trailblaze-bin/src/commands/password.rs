// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check-password` command.

use trailblaze_auth::{validate_password, validate_registration_passwords};

use crate::cli::CheckPasswordArgs;
use crate::error::BinResult;

/// Checks a password locally; nothing is sent to the backend.
pub fn check_password(args: CheckPasswordArgs) -> BinResult<()> {
    match &args.confirm {
        Some(confirm) => validate_registration_passwords(&args.password, confirm)?,
        None => validate_password(&args.password)?,
    }
    println!("Password meets the strength rules.");
    Ok(())
}
