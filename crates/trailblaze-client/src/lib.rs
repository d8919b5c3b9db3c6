// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trailblaze-client
//!
//! Session and HTTP plumbing for the Trailblaze client.
//!
//! - [`SessionStore`]: the single owner of the persisted login session,
//!   with lifecycle events on a broadcast channel
//! - [`SessionGuard`]: attaches credentials to every request and ends the
//!   session on 401/403
//! - [`AuthApi`]: login, logout and registration
//! - [`AccountApi`]: administrative account operations and own-profile
//!   changes
//! - [`WorksheetApi`] and [`EventApi`]: worksheet and event management,
//!   checked against the caller's capabilities before anything is sent
//! - [`HttpTransport`]: the seam to the REST backend, with a `reqwest`
//!   implementation
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use trailblaze_client::{AuthApi, Navigator, ReqwestTransport, SessionGuard, SessionStore};
//!
//! # async fn run() -> trailblaze_client::ClientResult<()> {
//! let transport = Arc::new(ReqwestTransport::new("http://localhost:8080/rest", Duration::from_secs(30))?);
//! let store = SessionStore::in_memory();
//!
//! AuthApi::new(transport.clone(), store.clone()).login("ana", "Abcdef1!").await?;
//!
//! let navigator: Arc<dyn Navigator> = Arc::new(|path: &str| println!("go to {path}"));
//! let guard = SessionGuard::new(transport, store, navigator);
//! let users: Vec<String> = guard.get_json("/list/all").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod account;
pub mod api;
mod error;
pub mod events;
pub mod guard;
pub mod session;
pub mod storage;
pub mod transport;
pub mod worksheet;

pub use account::{AccountApi, AccountOperation, InstitutionalForm, ProfileUpdate, UserDetails, UserFilter};
pub use api::{AuthApi, RegistrationForm};
pub use error::{ClientError, ClientResult, CONNECTION_ERROR_MESSAGE};
pub use events::{EventApi, EventForm};
pub use guard::{auth_headers, GuardConfig, Navigator, SessionGuard};
pub use session::{AuthType, Session, SessionEvent, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use worksheet::WorksheetApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
