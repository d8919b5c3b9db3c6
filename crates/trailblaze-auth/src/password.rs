// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Registration password rules.
//!
//! A password is accepted when it is at least [`MIN_PASSWORD_LENGTH`]
//! characters long, contains no line breaks, and has at least one ASCII
//! lowercase letter, one ASCII uppercase letter, one ASCII digit and one
//! character that is none of those.

use crate::error::{AuthError, AuthResult};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Shown when the password and its confirmation differ.
pub const MISMATCH_MESSAGE: &str = "Passwords do not match.";

/// Shown when the password fails the strength rules.
pub const WEAK_PASSWORD_MESSAGE: &str = "Password is not strong enough. It must contain at least 8 characters, including at least one uppercase letter, one lowercase letter, one number and one special character.";

/// Checks the strength rules.
pub fn validate_password(password: &str) -> AuthResult<()> {
    if is_strong(password) {
        Ok(())
    } else {
        Err(AuthError::validation(WEAK_PASSWORD_MESSAGE))
    }
}

/// Checks the confirmation first, then the strength rules.
pub fn validate_registration_passwords(password: &str, confirmation: &str) -> AuthResult<()> {
    if password != confirmation {
        return Err(AuthError::validation(MISMATCH_MESSAGE));
    }
    validate_password(password)
}

fn is_strong(password: &str) -> bool {
    if password.chars().any(is_line_break) {
        return false;
    }

    let mut length = 0;
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut symbol = false;

    for c in password.chars() {
        length += 1;
        match c {
            'a'..='z' => lower = true,
            'A'..='Z' => upper = true,
            '0'..='9' => digit = true,
            _ => symbol = true,
        }
    }

    length >= MIN_PASSWORD_LENGTH && lower && upper && digit && symbol
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
