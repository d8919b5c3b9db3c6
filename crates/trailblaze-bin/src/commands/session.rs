// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `login`, `logout`, `register` and `whoami` commands.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Context;
use serde::Serialize;
use trailblaze_auth::decode_payload;
use trailblaze_client::{HttpTransport, RegistrationForm, Session};

use super::to_json;
use crate::app::ClientApp;
use crate::cli::{LoginArgs, OutputArgs, OutputFormat, RegisterArgs};
use crate::error::{BinError, BinResult};

/// Logs in and stores the session.
pub async fn login<T: HttpTransport + 'static>(app: &ClientApp<T>, args: LoginArgs) -> BinResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password_stdin()?,
    };

    let session = app.auth().login(&args.username, &password).await?;
    let ctx = session.role_context();
    println!(
        "Logged in as {} ({})",
        session.short_username(),
        ctx.primary_role()
    );
    Ok(())
}

/// Ends the stored session.
pub async fn logout<T: HttpTransport + 'static>(app: &ClientApp<T>) -> BinResult<()> {
    match app.auth().logout().await? {
        Some(session) => println!("Logged out {}", session.short_username()),
        None => println!("No active session."),
    }
    Ok(())
}

/// Registers a civic account.
pub async fn register<T: HttpTransport + 'static>(app: &ClientApp<T>, args: RegisterArgs) -> BinResult<()> {
    let confirmation = args.confirm.unwrap_or_else(|| args.password.clone());
    let mut form = RegistrationForm::new(args.username, args.email, args.name, args.password)
        .with_confirmation(confirmation);
    form.public_profile = args.public;

    let message = app
        .auth()
        .register(&form)
        .await
        .map_err(|e| BinError::from(e).with_context("Registration failed"))?;
    println!("{}", message);
    Ok(())
}

/// Shows the stored session's user, roles and capabilities.
pub fn whoami<T: HttpTransport + 'static>(app: &ClientApp<T>, args: OutputArgs) -> BinResult<()> {
    let session = app.store().get()?.ok_or(BinError::NotLoggedIn)?;
    let report = WhoAmI::from_session(&session);

    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", to_json(&report)?),
    }
    Ok(())
}

fn read_password_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// =============================================================================
// WhoAmI
// =============================================================================

/// What the stored session's token grants.
#[derive(Debug, Clone, Serialize)]
pub struct WhoAmI {
    /// Username as stored.
    pub username: String,
    /// Short username shown in page headers.
    pub display_name: String,
    /// Primary role.
    pub primary_role: String,
    /// Description of the primary role.
    pub role_description: &'static str,
    /// All decoded roles.
    pub roles: Vec<String>,
    /// Any role is an admin role.
    pub admin_any: bool,
    /// The primary role is an admin role.
    pub admin_primary: bool,
    /// Every capability with whether it is granted.
    pub capabilities: BTreeMap<&'static str, bool>,
    /// Token expiry, when the token carries one.
    pub expires_at: Option<String>,
}

impl WhoAmI {
    /// Builds the report from a session.
    pub fn from_session(session: &Session) -> Self {
        let ctx = session.role_context();
        let expires_at = decode_payload(session.token())
            .ok()
            .and_then(|payload| payload.expires_at())
            .map(|at| at.to_rfc3339());

        Self {
            username: session.username().to_string(),
            display_name: session.short_username().to_string(),
            primary_role: ctx.primary_role().to_string(),
            role_description: ctx.primary_role().description(),
            roles: ctx.roles.iter().map(|r| r.to_string()).collect(),
            admin_any: ctx.is_admin_any(),
            admin_primary: ctx.is_admin_primary(),
            capabilities: ctx.capabilities.flags().into_iter().collect(),
            expires_at,
        }
    }

    /// Renders the report for the terminal.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WhoAmI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User:         {} ({})", self.display_name, self.username)?;
        writeln!(f, "Primary role: {} - {}", self.primary_role, self.role_description)?;
        writeln!(f, "Roles:        {}", self.roles.join(", "))?;
        writeln!(
            f,
            "Admin:        {} (primary: {})",
            yes_no(self.admin_any),
            yes_no(self.admin_primary)
        )?;
        if let Some(expires_at) = &self.expires_at {
            writeln!(f, "Expires:      {}", expires_at)?;
        }
        writeln!(f, "Capabilities:")?;
        for (name, granted) in &self.capabilities {
            writeln!(f, "  [{}] {}", if *granted { "x" } else { " " }, name)?;
        }
        Ok(())
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_whoami_admin_secondary() {
        let session = Session::new(
            token(r#"{"sub":"rui","roles":["RU","SYSBO"],"exp":1767225600}"#),
            "rui@example.com",
        );
        let report = WhoAmI::from_session(&session);

        assert_eq!(report.display_name, "rui");
        assert_eq!(report.primary_role, "RU");
        assert_eq!(report.roles, vec!["RU", "SYSBO"]);
        assert!(report.admin_any);
        assert!(!report.admin_primary);
        assert_eq!(report.capabilities.get("admin-mgmt"), Some(&false));
        assert_eq!(report.expires_at.as_deref(), Some("2026-01-01T00:00:00+00:00"));

        let text = report.render_text();
        assert!(text.contains("Admin:        yes (primary: no)"));
        assert!(text.contains("[ ] admin-mgmt"));
    }

    #[test]
    fn test_whoami_undecodable_token() {
        let session = Session::new("not-a-jwt", "ana");
        let report = WhoAmI::from_session(&session);

        assert_eq!(report.roles, vec!["RU"]);
        assert_eq!(report.expires_at, None);
        assert!(!report.render_text().contains("Expires"));
    }
}
