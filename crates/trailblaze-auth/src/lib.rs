// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trailblaze-auth
//!
//! Client-side access control for the Trailblaze land-management web client.
//!
//! This crate provides:
//! - Bearer token payload decoding with a safe `RU` fallback
//! - The closed [`Role`] set issued by the backend
//! - The role-to-capability policy table used by every page
//! - Registration password validation
//!
//! Everything here is pure: no I/O, no shared state.
//!
//! ```
//! use trailblaze_auth::{decode_roles, Capability};
//!
//! let roles = decode_roles("not-a-token");
//! assert_eq!(roles.primary().as_str(), "RU");
//! assert!(roles.capabilities().contains(Capability::WorksheetsNav));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod capability;
mod context;
mod error;
pub mod password;
pub mod policy;
mod role;
pub mod token;

pub use capability::{Capability, CapabilitySet};
pub use context::{RoleContext, RoleSet};
pub use error::{AuthError, AuthResult};
pub use password::{validate_password, validate_registration_passwords};
pub use policy::{capabilities_for, is_admin_any, is_admin_primary};
pub use role::Role;
pub use token::{decode_payload, decode_roles, TokenPayload};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
