// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Key-value backends for the persisted session.
//!
//! Two backends are provided:
//!
//! - [`MemoryStorage`]: process-local, used in tests and embedded use
//! - [`FileStorage`]: a JSON object on disk, used by the CLI so a session
//!   survives between invocations

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// SessionStorage
// =============================================================================

/// A string key-value store.
pub trait SessionStorage: Send + Sync {
    /// Reads a key.
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    /// Writes a key.
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Removes a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> ClientResult<()>;

    /// Writes several keys.
    fn set_entries(&self, entries: &[(&str, &str)]) -> ClientResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Removes several keys.
    fn remove_entries(&self, keys: &[&str]) -> ClientResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// JSON-file storage.
///
/// The file is read once on open and rewritten in full on every change.
/// A change whose write fails is discarded, so the in-memory view never
/// runs ahead of the file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the store, reading the file if it exists.
    ///
    /// An unreadable or malformed file is treated as empty; the next write
    /// replaces it.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed session file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ClientError::storage_io(
                    format!("failed to read {}", path.display()),
                    e,
                ));
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, f: F) -> ClientResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.lock();
        // Memory only changes once the file has.
        let mut next = entries.clone();
        f(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ClientError::storage_io(format!("failed to create {}", parent.display()), e)
            })?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::storage(format!("failed to encode session: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| ClientError::storage_io(format!("failed to write {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            ClientError::storage_io(format!("failed to replace {}", self.path.display()), e)
        })
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn set_entries(&self, pairs: &[(&str, &str)]) -> ClientResult<()> {
        self.update(|entries| {
            for (key, value) in pairs {
                entries.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_entries(&self, keys: &[&str]) -> ClientResult<()> {
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}
