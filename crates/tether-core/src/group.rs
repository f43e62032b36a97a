#![forbid(unsafe_code)]

//! Section snapshots.
//!
//! A [`Group`] is an in-memory copy of one named section of the backing
//! store, taken at construction time. It is a plain value object: cloning
//! a group clones its map, and nothing in a group holds the store open.
//! Later external changes to the store are invisible until a fresh group
//! is loaded — that is exactly the reload mechanism the bundle builds on.

use std::collections::BTreeMap;
use tether_store::{Scalar, SettingValue, SettingsStore};

/// Snapshot of one section's keys and values.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    map: BTreeMap<String, SettingValue>,
}

impl Group {
    /// Create an empty snapshot for `name` without touching the store.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map: BTreeMap::new(),
        }
    }

    /// Snapshot the named section by reading all of its keys from `store`.
    #[must_use]
    pub fn load(store: &dyn SettingsStore, name: impl Into<String>) -> Self {
        let name = name.into();
        let map = store.read_section(&name);
        Self { name, map }
    }

    /// Section name this snapshot belongs to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed read. Absent or mismatched entries degrade to the target's
    /// zero value; this never fails.
    #[must_use]
    pub fn get<T: Scalar>(&self, key: &str) -> T {
        T::from_value(self.map.get(key).unwrap_or(&SettingValue::Invalid))
    }

    /// The tagged entry under `key`, if present.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&SettingValue> {
        self.map.get(key)
    }

    /// Insert or overwrite `key` unconditionally.
    pub fn put(&mut self, key: impl Into<String>, value: SettingValue) {
        self.map.insert(key.into(), value);
    }

    /// Existence check, independent of the entry's validity.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Write every key of this snapshot back to the store, replacing the
    /// section's previous contents. Other sections are untouched.
    pub fn save(&self, store: &dyn SettingsStore) {
        store.write_section(&self.name, &self.map);
    }

    /// Number of keys in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the snapshot holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
