// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! - [`MockTransport`]: per-path scripted responses, recorded requests,
//!   network failures and responses held until released
//! - [`RecordingNavigator`]: remembers every redirect

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

use trailblaze_client::{
    ClientError, ClientResult, HttpMethod, HttpRequest, HttpResponse, HttpTransport, Navigator,
};

// =============================================================================
// MockTransport
// =============================================================================

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    NetworkError(String),
}

#[derive(Debug, Clone)]
struct Route {
    reply: Reply,
    gate: Option<Arc<Notify>>,
}

/// A scripted HTTP backend.
///
/// Responses are keyed by path, whatever the method. Unscripted paths
/// answer `404` with an empty body.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    in_flight: AtomicUsize,
}

impl MockTransport {
    /// Creates a transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `path` with `status` and a text body.
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) -> &Self {
        self.route(path, Reply::Response(HttpResponse::new(status, body)));
        self
    }

    /// Answers `path` with `200` and a JSON body.
    pub fn respond_json(&self, path: &str, body: Value) -> &Self {
        self.respond(path, 200, body.to_string())
    }

    /// Fails requests to `path` without a response.
    pub fn fail(&self, path: &str, message: &str) -> &Self {
        self.route(path, Reply::NetworkError(message.to_string()));
        self
    }

    /// Holds responses for `path` until the returned handle is notified.
    ///
    /// Each `notify_one` releases one request; a permit stored before the
    /// request arrives releases it immediately.
    pub fn hold(&self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        let mut routes = self.routes.lock();
        let route = routes.entry(path.to_string()).or_insert_with(|| Route {
            reply: Reply::Response(HttpResponse::new(404, "")),
            gate: None,
        });
        route.gate = Some(gate.clone());
        gate
    }

    /// Returns every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Returns the requests sent to `path`.
    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Returns the number of requests sent to `path`.
    pub fn request_count(&self, path: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.path == path).count()
    }

    /// Returns the last request sent with `method` to `path`.
    pub fn last_request(&self, method: HttpMethod, path: &str) -> Option<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .cloned()
    }

    /// Returns the number of requests waiting on a held route.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn route(&self, path: &str, reply: Reply) {
        let mut routes = self.routes.lock();
        match routes.get_mut(path) {
            Some(route) => route.reply = reply,
            None => {
                routes.insert(path.to_string(), Route { reply, gate: None });
            }
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let route = self.routes.lock().get(&request.path).cloned();
        self.requests.lock().push(request);

        let Some(route) = route else {
            return Ok(HttpResponse::new(404, ""));
        };

        if let Some(gate) = route.gate {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        match route.reply {
            Reply::Response(response) => Ok(response),
            Reply::NetworkError(message) => Err(ClientError::network(message)),
        }
    }
}

// =============================================================================
// RecordingNavigator
// =============================================================================

/// Remembers every redirect instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates a navigator with no redirects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the redirect targets, in order.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }

    /// Returns the number of redirects.
    pub fn count(&self) -> usize {
        self.redirects.lock().len()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.redirects.lock().push(path.to_string());
    }
}
