// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Worksheet management calls.
//!
//! Import, edit and delete are manager actions: the capability is checked
//! before the request is built, so a denied call never reaches the server.

use std::sync::Arc;

use serde_json::Value;
use trailblaze_auth::{Capability, RoleContext};

use crate::api::response_message;
use crate::error::{ClientError, ClientResult};
use crate::guard::SessionGuard;
use crate::transport::{HttpRequest, HttpTransport};

/// Worksheet import endpoint.
pub const IMPORT_PATH: &str = "/fo/import";

/// Media type of an imported worksheet.
pub const GEOJSON_CONTENT_TYPE: &str = "application/geo+json";

/// Worksheet calls made through the session guard.
pub struct WorksheetApi<T> {
    guard: Arc<SessionGuard<T>>,
}

impl<T: HttpTransport> WorksheetApi<T> {
    /// Creates the API over a shared guard.
    pub fn new(guard: Arc<SessionGuard<T>>) -> Self {
        Self { guard }
    }

    /// Uploads a GeoJSON feature collection.
    pub async fn import(&self, ctx: &RoleContext, geojson: &Value) -> ClientResult<String> {
        ctx.require(Capability::ImportWorksheets)?;
        if !geojson.is_object() {
            return Err(ClientError::validation("No GeoJSON to import"));
        }

        let request = HttpRequest::post(IMPORT_PATH)
            .with_header("Content-Type", GEOJSON_CONTENT_TYPE)
            .with_json(geojson)?;
        let response = self.guard.send(request).await?;
        let message = response_message(response, "Worksheet imported.", "Error importing worksheet.")?;
        tracing::info!("Worksheet imported");
        Ok(message)
    }

    /// Replaces the editable fields of a worksheet.
    pub async fn update(&self, ctx: &RoleContext, id: &str, fields: &Value) -> ClientResult<String> {
        ctx.require(Capability::EditWorksheet)?;
        let id = require_id(id)?;

        let request = HttpRequest::put(worksheet_path(id)).with_json(fields)?;
        let response = self.guard.send(request).await?;
        let message = response_message(response, "Worksheet updated.", "Error updating worksheet.")?;
        tracing::info!(worksheet = %id, "Worksheet updated");
        Ok(message)
    }

    /// Deletes a worksheet.
    pub async fn delete(&self, ctx: &RoleContext, id: &str) -> ClientResult<String> {
        ctx.require(Capability::DeleteWorksheet)?;
        let id = require_id(id)?;

        let response = self.guard.send(HttpRequest::delete(worksheet_path(id))).await?;
        let message = response_message(response, "Worksheet removed.", "Error removing worksheet.")?;
        tracing::info!(worksheet = %id, "Worksheet removed");
        Ok(message)
    }
}

fn worksheet_path(id: &str) -> String {
    format!("/fo/{}", id)
}

fn require_id(id: &str) -> ClientResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        Err(ClientError::validation("No worksheet selected"))
    } else {
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use trailblaze_auth::RoleSet;

    use crate::guard::Navigator;
    use crate::session::{Session, SessionStore};
    use crate::transport::{HttpMethod, HttpResponse};

    struct EchoTransport {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl HttpTransport for EchoTransport {
        async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
            self.seen.lock().push(request);
            Ok(HttpResponse::new(self.status, self.body))
        }
    }

    fn api(status: u16, body: &'static str) -> WorksheetApi<EchoTransport> {
        let store = SessionStore::in_memory();
        store.set(Session::new("tok", "manuel")).unwrap();
        let navigator: Arc<dyn Navigator> = Arc::new(|_: &str| {});
        let transport = EchoTransport {
            status,
            body,
            seen: Mutex::new(Vec::new()),
        };
        WorksheetApi::new(Arc::new(SessionGuard::new(transport, store, navigator)))
    }

    fn manager() -> RoleContext {
        RoleContext::new("manuel", RoleSet::from_wire(&["SMBO"]))
    }

    #[tokio::test]
    async fn test_non_managers_never_reach_the_server() {
        let api = api(200, "");
        let viewer = RoleContext::new("sara", RoleSet::from_wire(&["SDVBO"]));

        let err = api.import(&viewer, &json!({"type": "FeatureCollection"})).await.unwrap_err();
        assert_eq!(err.user_message(), "Only managers can import");
        let err = api.update(&viewer, "7", &json!({})).await.unwrap_err();
        assert_eq!(err.user_message(), "Only managers can edit worksheets");
        let err = api.delete(&viewer, "7").await.unwrap_err();
        assert_eq!(err.user_message(), "Only managers can delete worksheets");

        assert!(api.guard.transport().seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_import_sends_geojson() {
        let api = api(200, "Imported 3 features");
        let message = api
            .import(&manager(), &json!({"type": "FeatureCollection", "features": []}))
            .await
            .unwrap();
        assert_eq!(message, "Imported 3 features");

        let seen = api.guard.transport().seen.lock();
        assert_eq!(seen[0].path, IMPORT_PATH);
        assert_eq!(seen[0].header("content-type"), Some(GEOJSON_CONTENT_TYPE));
        assert_eq!(seen[0].body.as_ref().unwrap()["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn test_update_and_delete_target_the_worksheet() {
        let api = api(200, "");
        api.update(&manager(), " 42 ", &json!({"serviceProviderId": 3})).await.unwrap();
        let message = api.delete(&manager(), "42").await.unwrap();
        assert_eq!(message, "Worksheet removed.");

        let seen = api.guard.transport().seen.lock();
        assert_eq!((seen[0].method, seen[0].path.as_str()), (HttpMethod::Put, "/fo/42"));
        assert_eq!((seen[1].method, seen[1].path.as_str()), (HttpMethod::Delete, "/fo/42"));
    }

    #[tokio::test]
    async fn test_failure_keeps_server_text() {
        let api = api(409, "Worksheet 42 has open executions");
        let err = api.delete(&manager(), "42").await.unwrap_err();
        assert_eq!(err.user_message(), "Worksheet 42 has open executions");

        let err = api.delete(&manager(), "  ").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }
}
