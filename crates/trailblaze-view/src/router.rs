// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Section router.
//!
//! Exactly one section of a page is visible at a time. Switching is
//! synchronous: it updates the visible section and hands back a
//! [`Navigation`] ticket whose `load` runs the section's loader.
//!
//! Each switch bumps a generation counter. A load only writes its result
//! into the displayed content if no other switch happened while it was
//! running; otherwise the result is dropped. Loads are never cancelled.
//!
//! ```text
//! switch("profile")  gen=1 ──── load ─────────────────────── done (dropped)
//! switch("users")    gen=2 ──── load ──── done (applied)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use trailblaze_auth::RoleContext;
use trailblaze_client::ClientResult;

use crate::error::{ViewError, ViewResult};
use crate::loader::SectionLoader;
use crate::page::PageLayout;

// =============================================================================
// LoadOutcome / SectionContent
// =============================================================================

/// What happened to a navigation's load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The result is now the section's displayed content.
    Applied,
    /// The section has no loader.
    NoLoader,
    /// The section's gate rejected the current roles.
    Skipped,
    /// Another switch happened first; the result was dropped.
    Superseded,
}

/// Loaded data for a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionContent {
    /// Section the data belongs to.
    pub section: String,
    /// Generation of the navigation that loaded it.
    pub generation: u64,
    /// Loaded payload.
    pub payload: Value,
}

// =============================================================================
// SectionRouter
// =============================================================================

struct RouterState {
    current: &'static str,
    generation: u64,
    contents: HashMap<&'static str, SectionContent>,
}

struct RouterShared {
    layout: PageLayout,
    ctx: Arc<RoleContext>,
    loaders: Mutex<HashMap<&'static str, Arc<dyn SectionLoader>>>,
    state: Mutex<RouterState>,
}

/// Tracks the visible section of one page.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SectionRouter {
    shared: Arc<RouterShared>,
}

impl SectionRouter {
    /// Creates a router showing the page's initial section.
    pub fn new(layout: PageLayout, ctx: Arc<RoleContext>) -> Self {
        Self {
            shared: Arc::new(RouterShared {
                layout,
                ctx,
                loaders: Mutex::new(HashMap::new()),
                state: Mutex::new(RouterState {
                    current: layout.initial(),
                    generation: 0,
                    contents: HashMap::new(),
                }),
            }),
        }
    }

    /// Registers the loader for a section, replacing any previous one.
    pub fn register(&self, section: &str, loader: Arc<dyn SectionLoader>) -> ViewResult<()> {
        let spec = self.spec(section)?;
        self.shared.loaders.lock().insert(spec.name, loader);
        Ok(())
    }

    /// Returns `true` if the section has a loader.
    pub fn has_loader(&self, section: &str) -> bool {
        self.shared.loaders.lock().contains_key(section)
    }

    /// Makes `section` the only visible section and starts a navigation.
    ///
    /// Fails without changing anything if the page does not declare it.
    pub fn switch_section(&self, section: &str) -> ViewResult<Navigation> {
        let spec = self.spec(section)?;

        let generation = {
            let mut state = self.shared.state.lock();
            state.current = spec.name;
            state.generation += 1;
            state.generation
        };

        tracing::debug!(
            page = %self.shared.layout.kind(),
            section = spec.name,
            generation,
            "Switched section"
        );

        Ok(Navigation {
            shared: self.shared.clone(),
            section: spec.name,
            generation,
        })
    }

    /// Returns the visible section.
    pub fn current_section(&self) -> &'static str {
        self.shared.state.lock().current
    }

    /// Returns the title of the visible section.
    pub fn title(&self) -> &'static str {
        let current = self.current_section();
        self.shared
            .layout
            .section(current)
            .map(|s| s.title)
            .unwrap_or(current)
    }

    /// Returns the number of switches so far.
    pub fn generation(&self) -> u64 {
        self.shared.state.lock().generation
    }

    /// Returns the content of the visible section, if loaded.
    pub fn displayed(&self) -> Option<SectionContent> {
        let state = self.shared.state.lock();
        state.contents.get(state.current).cloned()
    }

    /// Returns the last applied content of any section.
    pub fn content(&self, section: &str) -> Option<SectionContent> {
        self.shared.state.lock().contents.get(section).cloned()
    }

    /// Returns the page layout.
    pub fn layout(&self) -> &PageLayout {
        &self.shared.layout
    }

    /// Returns the role context the router evaluates gates against.
    pub fn context(&self) -> &RoleContext {
        &self.shared.ctx
    }

    fn spec(&self, section: &str) -> ViewResult<&'static crate::page::SectionSpec> {
        self.shared.layout.section(section).ok_or_else(|| {
            ViewError::unknown_section(self.shared.layout.kind().as_str(), section)
        })
    }
}

impl fmt::Debug for SectionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("SectionRouter")
            .field("page", &self.shared.layout.kind())
            .field("current", &state.current)
            .field("generation", &state.generation)
            .finish()
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// A ticket for one section switch.
#[must_use = "a navigation does nothing until it is loaded or committed"]
pub struct Navigation {
    shared: Arc<RouterShared>,
    section: &'static str,
    generation: u64,
}

impl Navigation {
    /// Returns the target section.
    pub fn section(&self) -> &'static str {
        self.section
    }

    /// Returns the generation this navigation was issued at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` if no later switch has happened.
    pub fn is_current(&self) -> bool {
        self.shared.state.lock().generation == self.generation
    }

    /// Runs the section's loader and commits its result.
    pub async fn load(self) -> ViewResult<LoadOutcome> {
        let gate = self.shared.layout.section(self.section).and_then(|s| s.gate);
        if let Some(gate) = gate {
            if !gate.allows(&self.shared.ctx) {
                tracing::debug!(section = self.section, ?gate, "Section gate not met, skipping load");
                return Ok(LoadOutcome::Skipped);
            }
        }

        let loader = self.shared.loaders.lock().get(self.section).cloned();
        let Some(loader) = loader else {
            return Ok(LoadOutcome::NoLoader);
        };

        let result = loader.load(self.section, &self.shared.ctx).await;
        self.commit(result)
    }

    /// Commits a result produced outside the registered loader.
    ///
    /// Both successes and failures are dropped when the navigation is
    /// no longer current.
    pub fn commit(self, result: ClientResult<Value>) -> ViewResult<LoadOutcome> {
        let mut state = self.shared.state.lock();
        if state.generation != self.generation {
            tracing::debug!(
                section = self.section,
                generation = self.generation,
                current = state.generation,
                "Discarding stale section load"
            );
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(payload) => {
                state.contents.insert(
                    self.section,
                    SectionContent {
                        section: self.section.to_string(),
                        generation: self.generation,
                        payload,
                    },
                );
                Ok(LoadOutcome::Applied)
            }
            Err(e) => Err(ViewError::load(self.section, e)),
        }
    }
}

impl fmt::Debug for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigation")
            .field("section", &self.section)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;
    use trailblaze_auth::RoleSet;
    use trailblaze_client::ClientError;

    use crate::page::PageKind;

    struct StaticLoader(Value);

    #[async_trait]
    impl SectionLoader for StaticLoader {
        async fn load(&self, _section: &str, _ctx: &RoleContext) -> ClientResult<Value> {
            Ok(self.0.clone())
        }
    }

    struct BlockedLoader {
        release: Arc<Notify>,
        payload: Value,
    }

    #[async_trait]
    impl SectionLoader for BlockedLoader {
        async fn load(&self, _section: &str, _ctx: &RoleContext) -> ClientResult<Value> {
            self.release.notified().await;
            Ok(self.payload.clone())
        }
    }

    fn router(roles: &[&str]) -> SectionRouter {
        let ctx = Arc::new(RoleContext::new("ana", RoleSet::from_wire(roles)));
        SectionRouter::new(PageKind::Dashboard.layout(), ctx)
    }

    #[test]
    fn test_starts_on_initial_section() {
        let router = router(&["RU"]);
        assert_eq!(router.current_section(), "overview");
        assert_eq!(router.title(), "Overview");
        assert_eq!(router.generation(), 0);
        assert!(router.displayed().is_none());
    }

    #[test]
    fn test_unknown_section_leaves_state_unchanged() {
        let router = router(&["RU"]);
        let _ = router.switch_section("profile").unwrap();

        let err = router.switch_section("billing").unwrap_err();
        assert!(matches!(err, ViewError::UnknownSection { .. }));
        assert_eq!(router.current_section(), "profile");
        assert_eq!(router.generation(), 1);
        assert!(router.register("billing", Arc::new(StaticLoader(json!(null)))).is_err());
    }

    #[tokio::test]
    async fn test_load_applies_content() {
        let router = router(&["SYSADMIN"]);
        router.register("users", Arc::new(StaticLoader(json!(["ana", "rui"])))).unwrap();

        let outcome = router.switch_section("users").unwrap().load().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(router.title(), "User Management");
        assert_eq!(router.displayed().unwrap().payload, json!(["ana", "rui"]));
    }

    #[tokio::test]
    async fn test_no_loader_and_gate() {
        let router = router(&["RU"]);
        router.register("users", Arc::new(StaticLoader(json!([])))).unwrap();

        let outcome = router.switch_section("accounts").unwrap().load().await.unwrap();
        assert_eq!(outcome, LoadOutcome::NoLoader);
        assert_eq!(router.current_section(), "accounts");

        let outcome = router.switch_section("users").unwrap().load().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
        assert_eq!(router.current_section(), "users");
        assert!(router.displayed().is_none());
    }

    #[tokio::test]
    async fn test_stale_load_is_dropped() {
        let router = router(&["SYSADMIN"]);
        let release = Arc::new(Notify::new());
        router
            .register(
                "profile",
                Arc::new(BlockedLoader {
                    release: release.clone(),
                    payload: json!({"profile": "stale"}),
                }),
            )
            .unwrap();
        router.register("users", Arc::new(StaticLoader(json!(["fresh"])))).unwrap();

        let profile = router.switch_section("profile").unwrap();
        let profile_load = tokio::spawn(profile.load());

        let users = router.switch_section("users").unwrap();
        assert_eq!(users.load().await.unwrap(), LoadOutcome::Applied);

        release.notify_one();
        assert_eq!(profile_load.await.unwrap().unwrap(), LoadOutcome::Superseded);

        assert_eq!(router.current_section(), "users");
        assert_eq!(router.displayed().unwrap().payload, json!(["fresh"]));
        assert!(router.content("profile").is_none());
    }

    #[test]
    fn test_commit_error_only_when_current() {
        let router = router(&["RU"]);

        let nav = router.switch_section("overview").unwrap();
        let err = nav.commit(Err(ClientError::network("reset"))).unwrap_err();
        assert!(matches!(err, ViewError::Load { .. }));

        let stale = router.switch_section("profile").unwrap();
        let _ = router.switch_section("overview").unwrap();
        assert!(!stale.is_current());
        assert_eq!(
            stale.commit(Err(ClientError::AuthExpired)).unwrap(),
            LoadOutcome::Superseded
        );
    }
}
