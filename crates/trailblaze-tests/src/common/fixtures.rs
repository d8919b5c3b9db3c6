// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Bearer tokens are built the way the backend issues them: three
//! base64url segments with an unsigned payload in the middle.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use serde_json::{json, Value};

use trailblaze_client::Session;

// =============================================================================
// Tokens
// =============================================================================

/// Pre-built bearer tokens.
pub struct TokenFixtures;

impl TokenFixtures {
    /// Expiry used by every fixture token: 2030-01-01T00:00:00Z.
    pub const EXPIRY: i64 = 1_893_456_000;

    /// Builds a token around an arbitrary payload.
    pub fn with_payload(payload: &Value) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload.to_string()),
            URL_SAFE_NO_PAD.encode("signature"),
        )
    }

    /// Builds a token for `sub` carrying `roles`, primary role first.
    pub fn with_roles(sub: &str, roles: &[&str]) -> String {
        Self::with_payload(&json!({
            "sub": sub,
            "roles": roles,
            "iat": Self::EXPIRY - 3600,
            "exp": Self::EXPIRY,
            "iss": "trailblaze",
        }))
    }

    /// Builds a token with only the legacy single `role` claim.
    pub fn with_single_role(sub: &str, role: &str) -> String {
        Self::with_payload(&json!({ "sub": sub, "role": role, "exp": Self::EXPIRY }))
    }

    /// Builds a token whose payload uses the padded standard alphabet.
    pub fn standard_alphabet(sub: &str, roles: &[&str]) -> String {
        let payload = json!({ "sub": sub, "roles": roles }).to_string();
        format!("e30.{}.sig", STANDARD.encode(payload))
    }

    /// A token that cannot be decoded.
    pub fn malformed() -> String {
        "not-a-token".to_string()
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// Pre-built sessions.
pub struct SessionFixtures;

impl SessionFixtures {
    /// A session for `username` whose token carries `roles`.
    pub fn with_roles(username: &str, roles: &[&str]) -> Session {
        let sub = username.split('@').next().unwrap_or(username);
        Session::new(TokenFixtures::with_roles(sub, roles), username)
    }

    /// A system administrator.
    pub fn sysadmin() -> Session {
        Self::with_roles("ana@trailblaze.pt", &["SYSADMIN"])
    }

    /// A registered user who also holds `SYSBO`.
    pub fn user_with_admin_secondary() -> Session {
        Self::with_roles("rui", &["RU", "SYSBO"])
    }

    /// A partner back-office user.
    pub fn partner_back_office() -> Session {
        Self::with_roles("paula", &["PRBO"])
    }

    /// A partner operator.
    pub fn partner_operator() -> Session {
        Self::with_roles("pedro", &["PO"])
    }

    /// A sheet detail viewer.
    pub fn sheet_viewer() -> Session {
        Self::with_roles("sara", &["SDVBO"])
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file contents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A YAML file using placeholders.
    pub fn yaml_with_placeholders() -> &'static str {
        r#"
api:
  base_url: https://${TB_API_HOST:localhost}/rest
  timeout_secs: 15
  username_header: x-username
session:
  login_path: ${TB_LOGIN_PAGE:login.html}
  storage_path: state/session.json
logging:
  level: debug
  format: compact
"#
    }

    /// The same settings as TOML.
    pub fn toml() -> &'static str {
        r#"
[api]
base_url = "https://trailblaze.example.com/rest"
timeout_secs = 15
username_header = "x-username"

[session]
login_path = "login.html"
storage_path = "state/session.json"

[logging]
level = "debug"
format = "compact"
"#
    }
}
