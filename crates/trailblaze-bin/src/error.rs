// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the Trailblaze binary.

use thiserror::Error;
use trailblaze_client::ClientError;
use trailblaze_view::ViewError;

/// Result type alias for trailblaze-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the Trailblaze binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No stored session.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Invalid command input.
    #[error("{0}")]
    Input(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Runtime error.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Config parsing error.
    #[error("Config error: {0}")]
    Config(#[from] trailblaze_config::ConfigError),

    /// Session, transport or API error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Page error.
    #[error(transparent)]
    View(#[from] ViewError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates a runtime error.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::NotLoggedIn => 2,
            Self::Input(_) => 3,
            Self::Io(_) => 5,
            Self::Runtime(_) => 6,
            Self::Client(e) => client_exit_code(e),
            Self::View(e) => e.client_error().map_or(3, client_exit_code),
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }

    /// Returns the text to show on the terminal.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            Self::View(e) => e.user_message(),
            Self::WithContext { context, source } => format!("{}: {}", context, source.user_message()),
            other => other.to_string(),
        }
    }
}

fn client_exit_code(err: &ClientError) -> i32 {
    match err {
        ClientError::AuthExpired => 2,
        ClientError::Validation { .. } | ClientError::PermissionDenied { .. } => 3,
        ClientError::Network { .. } | ClientError::Http { .. } | ClientError::Decode { .. } => 4,
        ClientError::Storage { .. } => 5,
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{:#}", err))
    }
}

impl From<trailblaze_auth::AuthError> for BinError {
    fn from(err: trailblaze_auth::AuthError) -> Self {
        Self::Client(err.into())
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with appropriate formatting.
pub fn report_error(error: &BinError) {
    tracing::debug!(error = %error, "Command failed");
    eprintln!("Error: {}", error.user_message());

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================
