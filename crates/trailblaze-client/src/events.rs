// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Event calls.
//!
//! Any signed-in user can sign up for an event. Creating, editing and
//! deleting events, and reading who signed up, need
//! [`Capability::CreateEvents`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use trailblaze_auth::{Capability, RoleContext};

use crate::api::response_message;
use crate::error::{ClientError, ClientResult};
use crate::guard::SessionGuard;
use crate::transport::{HttpRequest, HttpTransport};

/// Event collection endpoint.
pub const EVENTS_PATH: &str = "/events";
/// Events the current user signed up for.
pub const REGISTERED_EVENTS_PATH: &str = "/events/registered";

const MISSING_FIELDS_MESSAGE: &str = "Please fill all required fields";

// =============================================================================
// EventForm
// =============================================================================

/// Event create and edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    /// Title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Start time, milliseconds since the Unix epoch.
    pub date_time_millis: i64,
    /// `lat,lng` pair.
    pub location: String,
    /// Worksheet the event belongs to.
    pub work_sheet_id: String,
}

impl EventForm {
    /// Creates a form with the required fields.
    pub fn new(
        title: impl Into<String>,
        date_time_millis: i64,
        location: impl Into<String>,
        work_sheet_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            date_time_millis,
            location: location.into(),
            work_sheet_id: work_sheet_id.into(),
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks the required fields.
    pub fn validate(&self) -> ClientResult<()> {
        let blank = [&self.title, &self.location, &self.work_sheet_id]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank || self.date_time_millis <= 0 {
            return Err(ClientError::validation(MISSING_FIELDS_MESSAGE));
        }
        Ok(())
    }
}

// =============================================================================
// EventApi
// =============================================================================

/// Event calls made through the session guard.
pub struct EventApi<T> {
    guard: Arc<SessionGuard<T>>,
}

impl<T: HttpTransport> EventApi<T> {
    /// Creates the API over a shared guard.
    pub fn new(guard: Arc<SessionGuard<T>>) -> Self {
        Self { guard }
    }

    /// Creates an event.
    pub async fn create(&self, ctx: &RoleContext, form: &EventForm) -> ClientResult<String> {
        ctx.require(Capability::CreateEvents)?;
        form.validate()?;

        let response = self.guard.send(HttpRequest::post(EVENTS_PATH).with_json(form)?).await?;
        let message = response_message(response, "Event created.", "Error creating event")?;
        tracing::info!(title = %form.title, "Event created");
        Ok(message)
    }

    /// Replaces an event.
    pub async fn update(&self, ctx: &RoleContext, id: &str, form: &EventForm) -> ClientResult<String> {
        ctx.require(Capability::CreateEvents)?;
        let id = require_id(id)?;
        form.validate()?;

        let response = self.guard.send(HttpRequest::put(event_path(id)).with_json(form)?).await?;
        let message = response_message(response, "Event updated.", "Error updating event")?;
        tracing::info!(event = %id, "Event updated");
        Ok(message)
    }

    /// Deletes an event.
    pub async fn delete(&self, ctx: &RoleContext, id: &str) -> ClientResult<String> {
        ctx.require(Capability::CreateEvents)?;
        let id = require_id(id)?;

        let response = self.guard.send(HttpRequest::delete(event_path(id))).await?;
        let message = response_message(response, "Event deleted.", "Error deleting event")?;
        tracing::info!(event = %id, "Event deleted");
        Ok(message)
    }

    /// Lists the usernames signed up for an event.
    pub async fn registrations(&self, ctx: &RoleContext, id: &str) -> ClientResult<Vec<String>> {
        ctx.require(Capability::CreateEvents)?;
        let id = require_id(id)?;
        self.guard.get_json(&format!("{}/registrations", event_path(id))).await
    }

    /// Signs the current user up for an event.
    pub async fn register(&self, id: &str) -> ClientResult<String> {
        let id = require_id(id)?;
        let response = self.guard.send(HttpRequest::post(registration_path(id))).await?;
        response_message(response, "Registered for event.", "Error registering for event")
    }

    /// Withdraws the current user from an event.
    pub async fn unregister(&self, id: &str) -> ClientResult<String> {
        let id = require_id(id)?;
        let response = self.guard.send(HttpRequest::delete(registration_path(id))).await?;
        response_message(response, "Registration cancelled.", "Error cancelling registration")
    }
}

fn event_path(id: &str) -> String {
    format!("{}/{}", EVENTS_PATH, id)
}

fn registration_path(id: &str) -> String {
    format!("{}/register", event_path(id))
}

fn require_id(id: &str) -> ClientResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        Err(ClientError::validation("No event selected"))
    } else {
        Ok(id)
    }
}
