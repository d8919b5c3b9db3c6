// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! A [`ClientApp`] wired over a [`MockTransport`], an in-memory session
//! store and a [`RecordingNavigator`].

use std::sync::Arc;

use trailblaze_bin::ClientApp;
use trailblaze_client::{Session, SessionGuard, SessionStore};
use trailblaze_config::ClientConfig;

use super::mocks::{MockTransport, RecordingNavigator};

/// A fully wired client over mocks.
pub struct TestClient {
    /// Scripted backend.
    pub transport: Arc<MockTransport>,
    /// Recorded redirects.
    pub navigator: Arc<RecordingNavigator>,
    /// The client under test.
    pub app: ClientApp<Arc<MockTransport>>,
}

impl TestClient {
    /// Creates a logged-out client with default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a logged-out client.
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = Arc::new(MockTransport::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let app = ClientApp::with_parts(
            config,
            transport.clone(),
            SessionStore::in_memory(),
            navigator.clone(),
        );

        Self {
            transport,
            navigator,
            app,
        }
    }

    /// Creates a client with `session` already stored.
    pub fn logged_in(session: Session) -> Self {
        let client = Self::new();
        client
            .app
            .store()
            .set(session)
            .expect("Failed to store session");
        client
    }

    /// Returns the session store.
    pub fn store(&self) -> &SessionStore {
        self.app.store()
    }

    /// Returns the shared guard.
    pub fn guard(&self) -> Arc<SessionGuard<Arc<Arc<MockTransport>>>> {
        self.app.guard()
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
