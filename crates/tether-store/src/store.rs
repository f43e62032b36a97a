#![forbid(unsafe_code)]

//! Backing key-value stores, addressed by named section.
//!
//! # Design
//!
//! [`SettingsStore`] is the seam between the in-memory settings cache and
//! whatever actually persists data. It deals in whole sections: a load
//! reads every key of one section, a write replaces that section and
//! leaves all others untouched.
//!
//! The trait is deliberately infallible. A settings cache has no fatal
//! error class — an unreadable store yields empty sections, a failed write
//! is logged by the adapter that failed. Callers that need to surface
//! "settings file unreadable" to a user do so from the adapter layer, not
//! through this interface.
//!
//! # Adapters
//!
//! - [`JsonFileStore`]: one JSON document holding every section, located
//!   through a [`StoreLocator`] on each access, replaced atomically via a
//!   temp file + rename.
//! - [`MemoryStore`]: mutex-guarded map for tests and ephemeral use.

use crate::locator::StoreLocator;
use crate::value::SettingValue;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;

/// All keys of one section, ordered for deterministic serialization.
pub type SectionMap = BTreeMap<String, SettingValue>;

/// A section-addressed persistent key-value store.
pub trait SettingsStore: Send + Sync {
    /// Load every key of the named section. Missing sections and
    /// unreadable stores yield an empty map.
    fn read_section(&self, name: &str) -> SectionMap;

    /// Atomically replace the named section with `entries`. Other
    /// sections are untouched. Failures are absorbed by the adapter.
    fn write_section(&self, name: &str, entries: &SectionMap);
}

/// The on-disk document: section name to section contents.
type Document = BTreeMap<String, SectionMap>;

/// File-backed store keeping every section in a single JSON document.
///
/// The document path is re-resolved through the locator on every read and
/// write, so pointer-file redirection is picked up by the next reload.
pub struct JsonFileStore {
    locator: Box<dyn StoreLocator>,
}

impl JsonFileStore {
    /// Create a store resolving its document through `locator`.
    #[must_use]
    pub fn new(locator: impl StoreLocator + 'static) -> Self {
        Self {
            locator: Box::new(locator),
        }
    }

    fn load_document(&self, path: &Path) -> Document {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                // A store that does not exist yet is simply empty.
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(file = %path.display(), %err, "settings file unreadable");
                }
                return Document::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(err) => {
                warn!(file = %path.display(), %err, "settings file malformed");
                Document::new()
            }
        }
    }

    fn store_document(&self, path: &Path, document: &Document) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // Write-then-rename so a crash mid-write never truncates the
        // previous document.
        let tmp = path.with_extension("tmp");
        {
            let mut file = std::fs::File::create(&tmp)?;
            let body = serde_json::to_string_pretty(document).map_err(std::io::Error::other)?;
            file.write_all(body.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, path)
    }
}

impl SettingsStore for JsonFileStore {
    fn read_section(&self, name: &str) -> SectionMap {
        let path = self.locator.resolve();
        self.load_document(&path)
            .remove(name)
            .unwrap_or_default()
    }

    fn write_section(&self, name: &str, entries: &SectionMap) {
        let path = self.locator.resolve();
        let mut document = self.load_document(&path);
        document.insert(name.to_string(), entries.clone());
        if let Err(err) = self.store_document(&path, &document) {
            warn!(file = %path.display(), section = name, %err, "settings write failed");
        }
    }
}

/// In-memory store for tests and ephemeral configuration.
#[derive(Default)]
pub struct MemoryStore {
    sections: Mutex<HashMap<String, SectionMap>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one key, creating the section as needed. Test convenience.
    pub fn seed(&self, section: &str, key: &str, value: SettingValue) {
        self.sections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}

impl SettingsStore for MemoryStore {
    fn read_section(&self, name: &str) -> SectionMap {
        self.sections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn write_section(&self, name: &str, entries: &SectionMap) {
        self.sections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.to_string(), entries.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
