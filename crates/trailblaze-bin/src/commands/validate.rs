// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use trailblaze_config::{ClientConfig, ConfigLoader};

use super::to_json;
use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// Validates the configuration file. Unlike other commands, a missing file
/// is an error here.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    let config = ConfigLoader::new()
        .load(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;
    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  API: {}", config.api.base_url);
            println!("  Timeout: {}s", config.api.timeout_secs);
            println!("  Login page: {}", config.session.login_path);
            println!("  Session file: {}", config.session.storage_path.display());
            println!("  Logging: {} ({})", config.logging.level, config.logging.format);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", to_json(&config)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!("{}", to_json(&output)?);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Returns non-fatal issues with a valid configuration.
pub fn collect_warnings(config: &ClientConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(rest) = config.api.base_url.strip_prefix("http://") {
        let host = rest.split(['/', ':']).next().unwrap_or_default();
        let host = if rest.starts_with('[') {
            rest.split(']').next().map(|h| &rest[..h.len() + 1]).unwrap_or(host)
        } else {
            host
        };
        if !LOCAL_HOSTS.contains(&host) {
            warnings.push(format!(
                "API base URL does not use HTTPS; tokens would travel in clear text: {}",
                config.api.base_url
            ));
        }
    }

    if let Some(parent) = config.session.storage_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            warnings.push(format!(
                "Session directory does not exist yet and will be created on login: {}",
                parent.display()
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_http_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.session.storage_path = dir.path().join("session.json");
        assert!(collect_warnings(&config).is_empty());

        config.api.base_url = "http://[::1]:8080/rest".into();
        assert!(collect_warnings(&config).is_empty());
    }

    #[test]
    fn test_remote_http_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.session.storage_path = dir.path().join("session.json");
        config.api.base_url = "http://trailblaze.example.com/rest".into();

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("HTTPS"));
    }

    #[test]
    fn test_missing_session_directory_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.session.storage_path = dir.path().join("nested/session.json");

        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("nested"));
    }
}
