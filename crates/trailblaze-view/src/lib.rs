// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trailblaze-view
//!
//! Role-driven view state for the Trailblaze pages.
//!
//! A [`PageController`] is built once per page load. It decodes the
//! session's roles, evaluates the capability table, and owns a
//! [`SectionRouter`] that keeps exactly one section visible and loads its
//! data. A renderer reads the resulting state; nothing here draws.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                PageController                │
//! │   RoleContext ── CapabilitySet               │
//! │        │                                     │
//! │        ▼                                     │
//! │   SectionRouter ── Navigation (generation)   │
//! │        │                                     │
//! │        ▼                                     │
//! │   SectionLoader ── SessionGuard ── transport │
//! └──────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod controller;
mod error;
pub mod loader;
pub mod page;
pub mod router;

pub use controller::{ActionOutcome, PageController, PageHeader, WorksheetView};
pub use error::{ViewError, ViewResult};
pub use loader::{rest_sections, RestSectionLoader, SectionLoader};
pub use page::{PageKind, PageLayout, SectionGate, SectionSpec};
pub use router::{LoadOutcome, Navigation, SectionContent, SectionRouter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
