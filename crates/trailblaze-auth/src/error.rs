// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access-control error types.

use thiserror::Error;

/// Result type alias for access-control operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised by the access-control layer.
///
/// `Decode` never reaches a user: [`decode_roles`](crate::decode_roles)
/// recovers from it by falling back to the default role. The other two
/// variants carry a message meant to be shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token payload could not be decoded.
    #[error("Token decode failed: {message}")]
    Decode {
        /// What went wrong.
        message: String,
    },

    /// A client-side policy check failed before any request was made.
    #[error("{message}")]
    PermissionDenied {
        /// User-visible message.
        message: String,
    },

    /// Form input was rejected before any request was made.
    #[error("{message}")]
    Validation {
        /// User-visible message.
        message: String,
    },
}

impl AuthError {
    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a permission denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns the message to show the user, if this error is user-facing.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Decode { .. } => None,
            Self::PermissionDenied { message } | Self::Validation { message } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_is_not_user_facing() {
        assert_eq!(AuthError::decode("bad base64").user_message(), None);
    }

    #[test]
    fn test_user_facing_messages() {
        let err = AuthError::permission_denied("Only managers can import");
        assert_eq!(err.user_message(), Some("Only managers can import"));
        assert_eq!(err.to_string(), "Only managers can import");

        let err = AuthError::validation("Passwords do not match.");
        assert_eq!(err.user_message(), Some("Passwords do not match."));
    }
}
