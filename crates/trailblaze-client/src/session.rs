// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The persisted login session.
//!
//! A session lives in a [`SessionStorage`] under three keys:
//!
//! | Key         | Value                     |
//! |-------------|---------------------------|
//! | `authToken` | opaque bearer token       |
//! | `username`  | username as typed at login|
//! | `authType`  | always `jwt`              |
//!
//! It is valid only when all three are present and non-empty and
//! `authType` is `jwt`. Anything else reads as "no session".

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use trailblaze_auth::RoleContext;

use crate::error::ClientResult;
use crate::storage::{MemoryStorage, SessionStorage};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "authToken";
/// Storage key for the username.
pub const USERNAME_KEY: &str = "username";
/// Storage key for the authentication type.
pub const AUTH_TYPE_KEY: &str = "authType";

const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, AUTH_TYPE_KEY, USERNAME_KEY];
const EVENT_CAPACITY: usize = 16;

// =============================================================================
// Session
// =============================================================================

/// Authentication scheme of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Bearer JWT.
    Jwt,
}

impl AuthType {
    /// Returns the stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Jwt => "jwt",
        }
    }

    /// Parses a stored value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "jwt" => Some(AuthType::Jwt),
            _ => None,
        }
    }
}

/// A logged-in session.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    token: String,
    username: String,
    auth_type: AuthType,
}

impl Session {
    /// Creates a JWT session.
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            auth_type: AuthType::Jwt,
        }
    }

    /// Returns the bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the username as typed at login.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the authentication type.
    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    /// Returns the local part of an e-mail username, or the username itself.
    pub fn short_username(&self) -> &str {
        match self.username.split_once('@') {
            Some((local, _)) => local,
            None => &self.username,
        }
    }

    /// Returns the uppercased first character of the short username.
    pub fn display_initial(&self) -> Option<String> {
        self.short_username()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
    }

    /// Decodes the token into the role context for a page.
    pub fn role_context(&self) -> RoleContext {
        RoleContext::from_token(self.username.clone(), &self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("auth_type", &self.auth_type)
            .finish()
    }
}

// =============================================================================
// SessionEvent
// =============================================================================

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was stored after login.
    LoggedIn {
        /// Username of the new session.
        username: String,
    },
    /// The user logged out.
    LoggedOut {
        /// Username of the ended session.
        username: String,
    },
    /// The server rejected the session and it was torn down.
    Expired {
        /// Username of the ended session.
        username: String,
    },
}

// =============================================================================
// SessionStore
// =============================================================================

struct StoreInner {
    storage: Arc<dyn SessionStorage>,
    // Serializes read-modify-write sequences across the three keys.
    lock: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

/// Single owner of the persisted session.
///
/// Cheap to clone; clones share the same storage and event channel.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl SessionStore {
    /// Creates a store over the given backend.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                storage,
                lock: Mutex::new(()),
                events,
            }),
        }
    }

    /// Creates a store over a fresh [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Returns the current session, if a valid one is stored.
    pub fn get(&self) -> ClientResult<Option<Session>> {
        let _guard = self.inner.lock.lock();
        self.read()
    }

    /// Returns `true` if a valid session is stored.
    pub fn is_logged_in(&self) -> ClientResult<bool> {
        Ok(self.get()?.is_some())
    }

    /// Stores a session, replacing any previous one.
    pub fn set(&self, session: Session) -> ClientResult<()> {
        {
            let _guard = self.inner.lock.lock();
            self.inner.storage.set_entries(&[
                (TOKEN_KEY, session.token()),
                (USERNAME_KEY, session.username()),
                (AUTH_TYPE_KEY, session.auth_type().as_str()),
            ])?;
        }

        tracing::info!(user = %session.username(), "Session started");
        self.publish(SessionEvent::LoggedIn {
            username: session.username,
        });
        Ok(())
    }

    /// Removes the session after a user-initiated logout.
    ///
    /// Returns the session that was removed.
    pub fn clear(&self) -> ClientResult<Option<Session>> {
        let previous = self.take()?;
        if let Some(session) = &previous {
            tracing::info!(user = %session.username(), "Session ended");
            self.publish(SessionEvent::LoggedOut {
                username: session.username.clone(),
            });
        }
        Ok(previous)
    }

    /// Removes the session after an authentication failure.
    ///
    /// Returns the session that was removed; `None` means another caller
    /// already tore it down.
    pub fn force_clear(&self) -> ClientResult<Option<Session>> {
        let previous = self.take()?;
        if let Some(session) = &previous {
            self.announce_expiry(session);
        }
        Ok(previous)
    }

    /// Removes the session only if it still holds `token`.
    ///
    /// Returns `true` for exactly one caller per stored session: concurrent
    /// failures for the same token, or a failure for a token that has since
    /// been replaced by a new login, return `false`.
    pub fn expire(&self, token: &str) -> ClientResult<bool> {
        let expired = {
            let _guard = self.inner.lock.lock();
            match self.read()? {
                Some(session) if session.token() == token => {
                    self.inner.storage.remove_entries(&SESSION_KEYS)?;
                    Some(session)
                }
                _ => None,
            }
        };

        match expired {
            Some(session) => {
                self.announce_expiry(&session);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn take(&self) -> ClientResult<Option<Session>> {
        let _guard = self.inner.lock.lock();
        let previous = self.read()?;
        // Partial leftovers are removed too.
        self.inner.storage.remove_entries(&SESSION_KEYS)?;
        Ok(previous)
    }

    fn read(&self) -> ClientResult<Option<Session>> {
        let storage = &self.inner.storage;
        let token = storage.get(TOKEN_KEY)?.filter(|v| !v.is_empty());
        let username = storage.get(USERNAME_KEY)?.filter(|v| !v.is_empty());
        let auth_type = storage.get(AUTH_TYPE_KEY)?.and_then(|v| AuthType::parse(&v));

        Ok(match (token, username, auth_type) {
            (Some(token), Some(username), Some(auth_type)) => Some(Session {
                token,
                username,
                auth_type,
            }),
            _ => None,
        })
    }

    fn announce_expiry(&self, session: &Session) {
        tracing::warn!(user = %session.username(), "Session rejected by server, logging out");
        self.publish(SessionEvent::Expired {
            username: session.username.clone(),
        });
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("subscribers", &self.inner.events.receiver_count())
            .finish()
    }
}
