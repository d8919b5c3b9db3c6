// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client wiring built from a [`ClientConfig`].

use std::sync::Arc;
use std::time::Duration;

use trailblaze_client::{
    AccountApi, AuthApi, FileStorage, GuardConfig, HttpTransport, Navigator, ReqwestTransport,
    SessionGuard, SessionStore,
};
use trailblaze_config::ClientConfig;

use crate::error::BinResult;
use crate::navigator::TerminalNavigator;

/// Transport, session store and guard shared by every command.
pub struct ClientApp<T> {
    config: ClientConfig,
    transport: Arc<T>,
    store: SessionStore,
    guard: Arc<SessionGuard<Arc<T>>>,
}

impl ClientApp<ReqwestTransport> {
    /// Connects to the configured backend with the on-disk session file.
    pub fn from_config(config: ClientConfig) -> BinResult<Self> {
        let transport = ReqwestTransport::new(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_secs),
        )?;
        let storage = FileStorage::open(config.session.storage_path.clone())?;

        tracing::debug!(
            base_url = %config.api.base_url,
            session_file = %config.session.storage_path.display(),
            "Client configured"
        );

        Ok(Self::with_parts(
            config,
            transport,
            SessionStore::new(Arc::new(storage)),
            Arc::new(TerminalNavigator),
        ))
    }
}

impl<T: HttpTransport + 'static> ClientApp<T> {
    /// Assembles an app from explicit parts.
    pub fn with_parts(
        config: ClientConfig,
        transport: T,
        store: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let transport = Arc::new(transport);
        let guard_config = GuardConfig::default()
            .with_login_path(config.session.login_path.clone())
            .with_username_header(config.api.username_header.clone());
        let guard = SessionGuard::new(transport.clone(), store.clone(), navigator).with_config(guard_config);

        Self {
            config,
            transport,
            store,
            guard: Arc::new(guard),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns the shared guard.
    pub fn guard(&self) -> Arc<SessionGuard<Arc<T>>> {
        self.guard.clone()
    }

    /// Returns the login and registration API.
    pub fn auth(&self) -> AuthApi<Arc<T>> {
        AuthApi::new(self.transport.clone(), self.store.clone())
            .with_username_header(self.config.api.username_header.clone())
    }

    /// Returns the account administration API.
    pub fn accounts(&self) -> AccountApi<Arc<T>> {
        AccountApi::new(self.guard.clone())
    }
}
