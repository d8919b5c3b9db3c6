// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema.
//!
//! ```text
//! ClientConfig
//! ├── api: ApiConfig
//! ├── session: SessionConfig
//! └── logging: LoggingConfig
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/rest";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default header carrying the username next to the bearer token.
pub const DEFAULT_USERNAME_HEADER: &str = "username";

/// Default login page.
pub const DEFAULT_LOGIN_PATH: &str = "login.html";

/// Default session file, relative to the configuration file.
pub const DEFAULT_STORAGE_PATH: &str = ".trailblaze/session.json";

// =============================================================================
// ClientConfig
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence and redirects.
    #[serde(default)]
    pub session: SessionConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Validates every section.
    pub fn validate(&self) -> ConfigResult<()> {
        self.api.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// REST root every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Header name for the username.
    #[serde(default = "default_username_header")]
    pub username_header: String,
}

impl ApiConfig {
    /// Validates the API section.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_base_url(&self.base_url)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "api.timeout_secs",
                "must be greater than 0",
            ));
        }
        if self.username_header.trim().is_empty() {
            return Err(ConfigError::validation(
                "api.username_header",
                "cannot be empty",
            ));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            username_header: default_username_header(),
        }
    }
}

fn validate_base_url(url: &str) -> ConfigResult<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| ConfigError::validation("api.base_url", "must start with http:// or https://"))?;

    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('@')
        .next()
        .unwrap_or_default();
    let host = match host.rfind(':') {
        Some(idx) if !host.ends_with(']') => &host[..idx],
        _ => host,
    };

    if host.is_empty() {
        return Err(ConfigError::validation("api.base_url", "missing host"));
    }
    Ok(())
}

// =============================================================================
// SessionConfig
// =============================================================================

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Page the user is sent to when the session is missing or revoked.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Session file. Relative paths are resolved against the
    /// configuration file's directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

impl SessionConfig {
    /// Validates the session section.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.login_path.trim().is_empty() {
            return Err(ConfigError::validation(
                "session.login_path",
                "cannot be empty",
            ));
        }
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "session.storage_path",
                "cannot be empty",
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            storage_path: default_storage_path(),
        }
    }
}

// =============================================================================
// LoggingConfig
// =============================================================================

/// Log output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level name understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// Single-line compact output.
    Compact,
}

impl LogFormat {
    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_username_header() -> String {
    DEFAULT_USERNAME_HEADER.to_string()
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://localhost:8080/rest");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.login_path, "login.html");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_base_url_validation() {
        for ok in [
            "http://localhost:8080/rest",
            "https://trailblaze.example.com/rest",
            "https://user@host",
            "http://[::1]:8080/rest",
        ] {
            assert!(validate_base_url(ok).is_ok(), "{ok}");
        }
        for bad in ["ftp://host/rest", "localhost:8080", "http://", "https://:8080/rest", ""] {
            assert!(validate_base_url(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api.timeout_secs"));
    }

    #[test]
    fn test_empty_login_path_rejected() {
        let mut config = ClientConfig::default();
        config.session.login_path = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
