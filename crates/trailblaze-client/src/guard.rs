// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session guard for authenticated requests.
//!
//! [`SessionGuard`] wraps a transport. Every request it sends carries the
//! session's bearer token and the short username; every response is
//! inspected, and a 401 or 403 tears the session down and sends the user
//! to the login page. Nothing is retried.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionStore};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Default login entry point.
pub const DEFAULT_LOGIN_PATH: &str = "login.html";

/// Default name of the auxiliary username header.
pub const DEFAULT_USERNAME_HEADER: &str = "username";

// =============================================================================
// Navigator
// =============================================================================

/// Moves the user to another page.
pub trait Navigator: Send + Sync {
    /// Navigates to `path`.
    fn redirect(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn redirect(&self, path: &str) {
        self(path)
    }
}

// =============================================================================
// GuardConfig
// =============================================================================

/// Guard settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Where to send the user when the session ends.
    pub login_path: String,
    /// Header carrying the short username.
    pub username_header: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            username_header: DEFAULT_USERNAME_HEADER.to_string(),
        }
    }
}

impl GuardConfig {
    /// Sets the login path.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Sets the username header name.
    pub fn with_username_header(mut self, header: impl Into<String>) -> Self {
        self.username_header = header.into();
        self
    }
}

// =============================================================================
// SessionGuard
// =============================================================================

/// Authenticated request wrapper.
pub struct SessionGuard<T> {
    transport: T,
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    config: GuardConfig,
}

impl<T: HttpTransport> SessionGuard<T> {
    /// Creates a guard with default settings.
    pub fn new(transport: T, store: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            transport,
            store,
            navigator,
            config: GuardConfig::default(),
        }
    }

    /// Replaces the settings.
    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns the wrapped transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the settings.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Returns the current session, or ends the page with a redirect.
    pub fn require_session(&self) -> ClientResult<Session> {
        match self.store.get()? {
            Some(session) => Ok(session),
            None => {
                tracing::debug!("No session, redirecting to login");
                self.navigator.redirect(&self.config.login_path);
                Err(ClientError::AuthExpired)
            }
        }
    }

    /// Sends an authenticated request.
    ///
    /// Returns the response for any status except 401/403, which end the
    /// session and yield [`ClientError::AuthExpired`].
    pub async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let session = self.require_session()?;
        let request_id = Uuid::now_v7();
        let method = request.method;
        let path = request.path.clone();

        tracing::debug!(%request_id, %method, path = %path, "Sending request");

        let request = authorize(request, &session, &self.config.username_header);
        let response = self.transport.send(request).await.inspect_err(|e| {
            tracing::debug!(%request_id, %method, path = %path, error = %e, "Request failed");
        })?;

        if response.is_auth_failure() {
            tracing::debug!(%request_id, status = response.status, path = %path, "Request rejected");
            self.expire(&session);
            return Err(ClientError::AuthExpired);
        }

        tracing::debug!(%request_id, status = response.status, "Response received");
        Ok(response)
    }

    /// Sends a GET and decodes a 2xx JSON body.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        self.send(HttpRequest::get(path))
            .await?
            .error_for_status()?
            .json()
    }

    /// Sends a POST with a JSON body and returns the 2xx response.
    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<HttpResponse> {
        self.send(HttpRequest::post(path).with_json(body)?)
            .await?
            .error_for_status()
    }

    /// Sends a PUT with a JSON body and returns the 2xx response.
    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<HttpResponse> {
        self.send(HttpRequest::put(path).with_json(body)?)
            .await?
            .error_for_status()
    }

    /// Ends the current session on the user's behalf and leaves the page.
    ///
    /// The redirect happens even when the stored copy cannot be removed.
    pub fn end_session(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear session");
        }
        self.navigator.redirect(&self.config.login_path);
    }

    fn expire(&self, session: &Session) {
        match self.store.expire(session.token()) {
            Ok(true) => self.navigator.redirect(&self.config.login_path),
            // Another request already handled it.
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(user = %session.username(), error = %e, "Failed to clear rejected session");
                self.navigator.redirect(&self.config.login_path);
            }
        }
    }
}

impl<T> fmt::Debug for SessionGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Returns the authentication headers for a session.
pub fn auth_headers(session: &Session, username_header: &str) -> Vec<(String, String)> {
    vec![
        ("Authorization".to_string(), format!("Bearer {}", session.token())),
        (username_header.to_string(), session.short_username().to_string()),
    ]
}

fn authorize(mut request: HttpRequest, session: &Session, username_header: &str) -> HttpRequest {
    request.headers.extend(auth_headers(session, username_header));
    request
}
