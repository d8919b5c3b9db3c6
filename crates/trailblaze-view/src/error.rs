// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! View error types.

use thiserror::Error;
use trailblaze_auth::AuthError;
use trailblaze_client::ClientError;

/// Result type alias for view operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Errors raised while routing or loading sections.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The page does not declare the section.
    #[error("Unknown section '{section}' on page '{page}'")]
    UnknownSection {
        /// Page name.
        page: String,
        /// Requested section.
        section: String,
    },

    /// A section loader failed while its navigation was still current.
    #[error("Failed to load section '{section}': {source}")]
    Load {
        /// Section being loaded.
        section: String,
        /// Underlying failure.
        #[source]
        source: ClientError,
    },

    /// A page-level call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ViewError {
    /// Creates an unknown section error.
    pub fn unknown_section(page: impl Into<String>, section: impl Into<String>) -> Self {
        Self::UnknownSection {
            page: page.into(),
            section: section.into(),
        }
    }

    /// Creates a load error.
    pub fn load(section: impl Into<String>, source: ClientError) -> Self {
        Self::Load {
            section: section.into(),
            source,
        }
    }

    /// Returns the underlying client error, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::UnknownSection { .. } => None,
            Self::Load { source, .. } => Some(source),
            Self::Client(e) => Some(e),
        }
    }

    /// Returns `true` if the session ended.
    pub fn is_auth_failure(&self) -> bool {
        self.client_error().is_some_and(ClientError::is_auth_failure)
    }

    /// Returns the text to show the user inline.
    pub fn user_message(&self) -> String {
        match self.client_error() {
            Some(e) => e.user_message(),
            None => self.to_string(),
        }
    }
}

impl From<AuthError> for ViewError {
    fn from(err: AuthError) -> Self {
        Self::Client(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_section_message() {
        let err = ViewError::unknown_section("dashboard", "billing");
        assert_eq!(err.to_string(), "Unknown section 'billing' on page 'dashboard'");
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn test_load_error_exposes_client_error() {
        let err = ViewError::load("users", ClientError::AuthExpired);
        assert!(err.is_auth_failure());

        let err = ViewError::load("users", ClientError::network("reset"));
        assert_eq!(err.user_message(), "Connection error. Please try again.");
    }

    #[test]
    fn test_from_auth_error() {
        let err: ViewError = AuthError::permission_denied("Insufficient permissions for detailed search").into();
        assert_eq!(err.user_message(), "Insufficient permissions for detailed search");
    }
}
