// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw content
//! 3. Parse into [`ClientConfig`]
//! 4. Apply `TRAILBLAZE_*` environment overrides
//! 5. Resolve `session.storage_path` against the file's directory
//! 6. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! TRAILBLAZE_API_BASE_URL=https://trailblaze.example.com/rest
//! TRAILBLAZE_API_TIMEOUT_SECS=10
//! TRAILBLAZE_LOGIN_PATH=signin.html
//! TRAILBLAZE_LOG_LEVEL=debug
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{ClientConfig, LogLevel};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "TRAILBLAZE";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

// =============================================================================
// ConfigLoader
// =============================================================================

/// Loads a [`ClientConfig`] from YAML, TOML or JSON.
///
/// # Examples
///
/// ```no_run
/// use trailblaze_config::ConfigLoader;
///
/// let config = ConfigLoader::new().load("trailblaze.yaml").unwrap();
/// println!("{}", config.api.base_url);
/// ```
#[derive(Clone)]
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
    env_prefix: String,
    resolve_env_vars: bool,
    resolve_paths: bool,
    env: EnvLookup,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment.
    pub fn new() -> Self {
        Self {
            base_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
            resolve_paths: true,
            env: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Sets the directory relative paths are resolved against.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables placeholders and overrides.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Enables or disables relative path resolution.
    pub fn with_path_resolution(mut self, enabled: bool) -> Self {
        self.resolve_paths = enabled;
        self
    }

    /// Replaces the environment lookup.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Loads configuration from a file.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<ClientConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let config = self.parse_content(&content, format, path)?;

        let config = self.finish(config, Some(self.base_path_for(path)))?;
        debug!(base_url = %config.api.base_url, "Configuration loaded");
        Ok(config)
    }

    /// Loads a file, falling back to defaults when it does not exist.
    ///
    /// Defaults still go through overrides and path resolution, so the
    /// session file lands next to where the configuration would be.
    pub fn load_or_default(&self, path: impl AsRef<Path>) -> ConfigResult<ClientConfig> {
        let path = path.as_ref();
        match self.load(path) {
            Err(e) if e.is_not_found() => {
                info!("No configuration at {}, using defaults", path.display());
                self.finish(ClientConfig::default(), Some(self.base_path_for(path)))
            }
            other => other,
        }
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<ClientConfig> {
        let content = self.maybe_resolve_placeholders(content);
        let config = parse_str(&content, format)?;
        self.finish(config, self.base_path.clone())
    }

    fn base_path_for(&self, path: &Path) -> PathBuf {
        self.base_path.clone().unwrap_or_else(|| {
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    fn finish(&self, mut config: ClientConfig, base_path: Option<PathBuf>) -> ConfigResult<ClientConfig> {
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }
        if self.resolve_paths {
            if let Some(base) = base_path {
                resolve_relative_paths(&mut config, &base);
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn parse_content(&self, content: &str, format: ConfigFormat, path: &Path) -> ConfigResult<ClientConfig> {
        let content = self.maybe_resolve_placeholders(content);
        parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })
    }

    fn maybe_resolve_placeholders(&self, content: &str) -> String {
        if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        }
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}`.
    ///
    /// An unset variable without a default keeps its placeholder.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut inner = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                inner.push(c);
            }

            if !closed {
                result.push_str("${");
                result.push_str(&inner);
                continue;
            }

            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner.as_str(), None),
            };

            match ((self.env)(name), default) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    warn!("Environment variable '{}' not found", name);
                    result.push_str("${");
                    result.push_str(name);
                    result.push('}');
                }
            }
        }

        result
    }

    fn var(&self, suffix: &str) -> (String, Option<String>) {
        let name = format!("{}_{}", self.env_prefix, suffix);
        let value = (self.env)(&name);
        (name, value)
    }

    fn apply_env_overrides(&self, config: &mut ClientConfig) -> ConfigResult<()> {
        if let (_, Some(value)) = self.var("API_BASE_URL") {
            config.api.base_url = value;
        }
        if let (name, Some(value)) = self.var("API_TIMEOUT_SECS") {
            config.api.timeout_secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected a whole number of seconds"))?;
        }
        if let (_, Some(value)) = self.var("LOGIN_PATH") {
            config.session.login_path = value;
        }
        if let (name, Some(value)) = self.var("LOG_LEVEL") {
            config.logging.level = value
                .parse::<LogLevel>()
                .map_err(|msg| ConfigError::invalid_env_var(name, msg))?;
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("base_path", &self.base_path)
            .field("env_prefix", &self.env_prefix)
            .field("resolve_env_vars", &self.resolve_env_vars)
            .field("resolve_paths", &self.resolve_paths)
            .finish_non_exhaustive()
    }
}

fn read_file(path: &Path) -> ConfigResult<String> {
    if !path.exists() {
        return Err(ConfigError::file_not_found(path));
    }
    fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
}

fn resolve_relative_paths(config: &mut ClientConfig, base_path: &Path) {
    if config.session.storage_path.is_relative() {
        config.session.storage_path = base_path.join(&config.session.storage_path);
    }
}

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<ClientConfig> {
    match format {
        ConfigFormat::Yaml => parse_yaml(content),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string())),
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML goes through the `config` crate.
fn parse_yaml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML.
    Yaml,
    /// TOML.
    Toml,
    /// JSON.
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the canonical extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads a file with the default loader.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<ClientConfig> {
    ConfigLoader::new().load(path)
}

/// Parses a string with the default loader.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<ClientConfig> {
    ConfigLoader::new().load_from_str(content, format)
}
