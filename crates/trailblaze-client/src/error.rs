// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client error types.

use thiserror::Error;
use trailblaze_auth::AuthError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Shown for any transport-level failure.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error. Please try again.";

// =============================================================================
// ClientError
// =============================================================================

/// Errors raised by the session, transport and API layers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No session, or the server answered 401/403. The session has been
    /// cleared and the user sent back to the login page.
    #[error("Session expired")]
    AuthExpired,

    /// Form input was rejected before any request was made.
    #[error("Validation failed: {message}")]
    Validation {
        /// User-visible message.
        message: String,
    },

    /// A client-side capability check failed before any request was made.
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// User-visible message.
        message: String,
    },

    /// The request never produced a response.
    #[error("Network error: {message}")]
    Network {
        /// Transport detail, for logs only.
        message: String,
    },

    /// The server answered with a non-success status other than 401/403.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body, often a plain-text message from the server.
        body: String,
    },

    /// A response body did not have the expected shape.
    #[error("Decode error: {message}")]
    Decode {
        /// What went wrong.
        message: String,
    },

    /// The session storage backend failed.
    #[error("Storage error: {message}")]
    Storage {
        /// What went wrong.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: Option<std::io::Error>,
    },
}

impl ClientError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a permission denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a storage error from an I/O error.
    pub fn storage_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` if this error ended the session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Returns the HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the text to show the user inline.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthExpired => "Your session has expired. Please log in again.".to_string(),
            Self::Validation { message } | Self::PermissionDenied { message } => message.clone(),
            Self::Network { .. } => CONNECTION_ERROR_MESSAGE.to_string(),
            Self::Http { status, body } if body.trim().is_empty() => {
                format!("Request failed with status {}", status)
            }
            Self::Http { body, .. } => body.clone(),
            Self::Decode { .. } => "Unexpected response from server.".to_string(),
            Self::Storage { .. } => "Could not access the saved session.".to_string(),
        }
    }
}

impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PermissionDenied { message } => Self::PermissionDenied { message },
            AuthError::Validation { message } => Self::Validation { message },
            AuthError::Decode { message } => Self::Decode { message },
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_message_is_fixed() {
        let err = ClientError::network("dns lookup failed");
        assert_eq!(err.user_message(), CONNECTION_ERROR_MESSAGE);
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn test_http_message_prefers_body() {
        assert_eq!(ClientError::http(409, "User already exists").user_message(), "User already exists");
        assert_eq!(ClientError::http(500, "  ").user_message(), "Request failed with status 500");
        assert_eq!(ClientError::http(500, "").status(), Some(500));
    }

    #[test]
    fn test_from_auth_error() {
        let err: ClientError = AuthError::permission_denied("Only managers can import").into();
        assert!(matches!(err, ClientError::PermissionDenied { .. }));
        assert_eq!(err.user_message(), "Only managers can import");

        let err: ClientError = AuthError::validation("Passwords do not match.").into();
        assert_eq!(err.user_message(), "Passwords do not match.");
    }

    #[test]
    fn test_auth_failure() {
        assert!(ClientError::AuthExpired.is_auth_failure());
        assert_eq!(ClientError::AuthExpired.status(), None);
    }
}
