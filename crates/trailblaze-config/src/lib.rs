// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trailblaze-config
//!
//! Configuration for the Trailblaze client: where the REST backend lives,
//! where the session is kept, and how logs are written.
//!
//! Files may be YAML, TOML or JSON. `${VAR}` and `${VAR:default}`
//! placeholders are resolved before parsing, and `TRAILBLAZE_*` variables
//! override the parsed values.
//!
//! ```no_run
//! use trailblaze_config::load_config;
//!
//! let config = load_config("trailblaze.yaml").unwrap();
//! println!("Backend: {}", config.api.base_url);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{ApiConfig, ClientConfig, LogFormat, LogLevel, LoggingConfig, SessionConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
