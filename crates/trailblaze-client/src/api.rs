// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Login, logout and registration.
//!
//! These calls are made before a session exists (or while it is being torn
//! down), so they go straight to the transport instead of through the
//! [`SessionGuard`](crate::SessionGuard).

use serde::{Deserialize, Serialize};
use trailblaze_auth::{validate_registration_passwords, AuthResult};

use crate::error::{ClientError, ClientResult};
use crate::guard::{auth_headers, DEFAULT_USERNAME_HEADER};
use crate::session::{Session, SessionStore};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Login endpoint.
pub const LOGIN_PATH: &str = "/login-jwt";
/// Logout endpoint.
pub const LOGOUT_PATH: &str = "/logout/jwt";
/// Civic registration endpoint.
pub const REGISTER_PATH: &str = "/register/civic";

const MISSING_FIELDS_MESSAGE: &str = "Please fill out both fields.";
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
const REGISTRATION_FAILED_MESSAGE: &str = "Error creating account. Please try again.";

/// Shown after a successful registration.
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Account created successfully!";

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Civic registration form.
///
/// `confirm_password` is checked locally and never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Login name.
    pub username: String,
    /// E-mail address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    #[serde(skip)]
    pub confirm_password: String,
    /// Full name.
    pub full_name: String,
    /// Phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Tax identification number.
    pub nif: String,
    /// Citizen card number.
    pub cc: String,
    /// Nationality.
    pub nationality: String,
    /// Country of residence.
    pub residence_country: String,
    /// Whether the profile is public.
    pub public_profile: bool,
}

impl RegistrationForm {
    /// Creates a form with the required fields.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            email: email.into(),
            confirm_password: password.clone(),
            password,
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    /// Sets the confirmation field.
    pub fn with_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.confirm_password = confirmation.into();
        self
    }

    /// Checks the password fields.
    pub fn validate(&self) -> AuthResult<()> {
        validate_registration_passwords(&self.password, &self.confirm_password)
    }
}

// =============================================================================
// AuthApi
// =============================================================================

/// Unauthenticated account calls.
#[derive(Debug)]
pub struct AuthApi<T> {
    transport: T,
    store: SessionStore,
    username_header: String,
}

impl<T: HttpTransport> AuthApi<T> {
    /// Creates the API over a transport and a session store.
    pub fn new(transport: T, store: SessionStore) -> Self {
        Self {
            transport,
            store,
            username_header: DEFAULT_USERNAME_HEADER.to_string(),
        }
    }

    /// Sets the username header sent on logout.
    pub fn with_username_header(mut self, header: impl Into<String>) -> Self {
        self.username_header = header.into();
        self
    }

    /// Returns the session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Logs in and stores the session.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::validation(MISSING_FIELDS_MESSAGE));
        }

        let request = HttpRequest::post(LOGIN_PATH).with_json(&LoginRequest { username, password })?;
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            tracing::info!(user = %username, status = response.status, "Login rejected");
            let body = non_empty_or(response.body, INVALID_CREDENTIALS_MESSAGE);
            return Err(ClientError::http(response.status, body));
        }

        let LoginResponse { token } = response.json()?;
        if token.is_empty() {
            return Err(ClientError::decode("login response carried an empty token"));
        }

        let session = Session::new(token, username);
        self.store.set(session.clone())?;
        Ok(session)
    }

    /// Logs out.
    ///
    /// The local session is cleared whether or not the server call succeeds.
    /// Returns the session that was cleared.
    pub async fn logout(&self) -> ClientResult<Option<Session>> {
        if let Some(session) = self.store.get()? {
            let mut request = HttpRequest::post(LOGOUT_PATH);
            request.headers = auth_headers(&session, &self.username_header);

            match self.transport.send(request).await {
                Ok(response) if !response.is_success() => {
                    tracing::debug!(status = response.status, "Server logout returned an error");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Server logout failed"),
            }
        }

        self.store.clear()
    }

    /// Registers a civic account. Returns the server's confirmation text.
    pub async fn register(&self, form: &RegistrationForm) -> ClientResult<String> {
        form.validate()?;

        let request = HttpRequest::post(REGISTER_PATH).with_json(form)?;
        let response = self.transport.send(request).await?;

        if response.is_success() {
            tracing::info!(user = %form.username, "Account registered");
            Ok(non_empty_or(response.body, REGISTRATION_SUCCESS_MESSAGE))
        } else {
            let body = non_empty_or(response.body, REGISTRATION_FAILED_MESSAGE);
            Err(ClientError::http(response.status, body))
        }
    }

    /// Checks a password against the strength rules.
    pub fn validate_password(&self, password: &str) -> ClientResult<()> {
        trailblaze_auth::validate_password(password).map_err(ClientError::from)
    }
}

pub(crate) fn non_empty_or(body: String, fallback: &str) -> String {
    if body.trim().is_empty() {
        fallback.to_string()
    } else {
        body
    }
}

/// Turns a guarded response into the message to show: the server's text,
/// or a fallback when it sent none.
pub(crate) fn response_message(response: HttpResponse, success: &str, failure: &str) -> ClientResult<String> {
    if response.is_success() {
        Ok(non_empty_or(response.body, success))
    } else {
        Err(ClientError::http(response.status, non_empty_or(response.body, failure)))
    }
}
