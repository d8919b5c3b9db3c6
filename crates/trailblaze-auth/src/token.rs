// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token payload decoding.
//!
//! The client never verifies signatures; it only reads the payload segment
//! to decide what to render. The server remains the authority and answers
//! 401/403 when the token is not acceptable.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::RoleSet;
use crate::error::{AuthError, AuthResult};

/// Number of dot-separated segments in a bearer token.
const TOKEN_SEGMENTS: usize = 3;

/// Claims read from the token payload segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Subject (username).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Full role list, primary role first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Legacy single-role claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Token ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl TokenPayload {
    /// Returns the decoded roles, or `None` when the payload carries none.
    ///
    /// `roles` wins when present; an empty `roles` list counts as missing and
    /// does not fall through to `role`.
    pub fn role_set(&self) -> Option<RoleSet> {
        if let Some(roles) = &self.roles {
            if roles.is_empty() {
                return None;
            }
            return Some(RoleSet::from_wire(roles));
        }

        self.role
            .as_deref()
            .filter(|role| !role.is_empty())
            .map(|role| RoleSet::from_wire(&[role]))
    }

    /// Returns the expiration time.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Returns the issued-at time.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }

    /// Returns `true` if the token carries an expiration before `now`.
    ///
    /// Informational only; the server enforces expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| exp < now.timestamp())
    }
}

/// Decodes the payload segment of a bearer token.
pub fn decode_payload(token: &str) -> AuthResult<TokenPayload> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != TOKEN_SEGMENTS {
        return Err(AuthError::decode(format!(
            "expected {} segments, found {}",
            TOKEN_SEGMENTS,
            segments.len()
        )));
    }

    let bytes = decode_segment(segments[1])?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::decode(format!("invalid payload: {}", e)))
}

/// Decodes the role list from a bearer token.
///
/// Never fails: a malformed token, an undecodable payload, or a payload
/// without roles all produce `[RU]`.
pub fn decode_roles(token: &str) -> RoleSet {
    match decode_payload(token) {
        Ok(payload) => payload.role_set().unwrap_or_else(|| {
            tracing::debug!("Token payload carries no roles, using default role");
            RoleSet::fallback()
        }),
        Err(e) => {
            tracing::debug!(error = %e, "Token decode failed, using default role");
            RoleSet::fallback()
        }
    }
}

/// Decodes a base64url segment, tolerating padding and the standard alphabet.
fn decode_segment(segment: &str) -> AuthResult<Vec<u8>> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    if normalized.is_empty() {
        return Err(AuthError::decode("empty payload segment"));
    }

    URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| AuthError::decode(format!("invalid base64: {}", e)))
}

// =============================================================================
// Tests
// =============================================================================
