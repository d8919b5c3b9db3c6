// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be parsed.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A value failed validation.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// Dotted field path.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file does not exist.
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The file extension is not a known format.
    #[error("Unsupported configuration format: {format}")]
    UnsupportedFormat {
        /// The extension, or a placeholder when there is none.
        format: String,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value in environment variable '{name}': {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Parse message.
        message: String,
    },

    /// Content could not be (de)serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Serializer message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an invalid environment variable error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns `true` if the error only means the file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ConfigError::validation("api.timeout_secs", "must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'api.timeout_secs': must be greater than 0"
        );

        let err = ConfigError::file_not_found("/etc/trailblaze.yaml");
        assert!(err.to_string().contains("/etc/trailblaze.yaml"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_io_source() {
        use std::error::Error as _;

        let err = ConfigError::io(
            "cfg.yaml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.source().is_some());
        assert!(!err.is_not_found());
    }
}
