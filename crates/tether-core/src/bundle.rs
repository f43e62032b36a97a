#![forbid(unsafe_code)]

//! Two-tier settings bundles with dirty tracking and change notification.
//!
//! # Design
//!
//! A [`Bundle`] owns two [`Group`] snapshots of one section: `saved`
//! mirrors the last persisted state, `transient` is the live working copy.
//! Writes go through an equality gate — storing a value equal to the
//! current entry is a pure no-op, which is what keeps a bound control from
//! echoing changes back and forth forever.
//!
//! One plain (non-reentrant) mutex guards both snapshots and the dirty
//! flag. Notifications are collected while the lock is held and delivered
//! immediately after it is released, so a listener is free to call back
//! into the same bundle without deadlocking.
//!
//! # Invariants
//!
//! 1. `is_modified() == false` implies `transient == saved` key-for-key.
//! 2. A value-equal `store` never sets the dirty flag and never notifies.
//! 3. Per-bundle notification order follows the order of the triggering
//!    writes; no ordering holds across bundles.
//! 4. No callback ever runs while the state lock is held.

use crate::group::Group;
use crate::subscription::{Subscribers, Subscription};
use std::sync::{Arc, Mutex, MutexGuard};
use tether_store::{Scalar, SettingValue, SettingsStore};
use tracing::debug;

struct State {
    saved: Group,
    transient: Group,
    modified: bool,
}

/// A shared, mutex-guarded two-tier cache of one settings section.
///
/// Bundles are shared as `Arc<Bundle>` among every observable value and
/// binding that names the same section; the bundle lives as long as its
/// longest holder.
pub struct Bundle {
    name: String,
    store: Arc<dyn SettingsStore>,
    state: Mutex<State>,
    changed: Subscribers<()>,
    reloaded: Subscribers<()>,
}

impl Bundle {
    /// Load the named section from `store` and wrap it in a shared bundle.
    ///
    /// `transient` starts as a copy of `saved`; the bundle is clean.
    #[must_use]
    pub fn new(name: impl Into<String>, store: Arc<dyn SettingsStore>) -> Arc<Self> {
        let name = name.into();
        let saved = Group::load(store.as_ref(), name.clone());
        let transient = saved.clone();
        Arc::new(Self {
            name,
            store,
            state: Mutex::new(State {
                saved,
                transient,
                modified: false,
            }),
            changed: Subscribers::new(),
            reloaded: Subscribers::new(),
        })
    }

    /// Section name this bundle caches.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic inside an accessor must not poison settings for good.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Typed read of the live working copy. Never fails; absent or
    /// mismatched entries degrade to the target's zero value.
    #[must_use]
    pub fn get<T: Scalar>(&self, key: &str) -> T {
        self.lock().transient.get(key)
    }

    /// The tagged entry under `key` in the working copy, or `Invalid`
    /// when absent.
    #[must_use]
    pub fn raw(&self, key: &str) -> SettingValue {
        self.lock()
            .transient
            .value(key)
            .cloned()
            .unwrap_or(SettingValue::Invalid)
    }

    /// Existence check against the working copy.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lock().transient.contains(key)
    }

    /// Equality-gated write into the working copy.
    ///
    /// If `key` is absent or holds a different value, the entry is
    /// written, the dirty flag set, "changed" subscribers notified, and
    /// `true` returned. A value-equal write returns `false` and does
    /// nothing else — no notification, no dirty flag.
    pub fn store(&self, key: &str, value: SettingValue) -> bool {
        {
            let mut state = self.lock();
            if state.transient.value(key) == Some(&value) {
                return false;
            }
            if !state.modified {
                debug!(
                    bundle = %self.name,
                    key,
                    old = ?state.transient.value(key),
                    new = ?value,
                    "first unsaved change"
                );
            }
            state.modified = true;
            state.transient.put(key, value);
        }
        self.changed.notify(&());
        true
    }

    /// Persist the working copy: clear the dirty flag, copy `transient`
    /// into `saved`, and write the section back to the store. Exactly the
    /// transient contents at the moment of the call are persisted.
    pub fn save(&self) {
        let mut state = self.lock();
        state.modified = false;
        state.saved = state.transient.clone();
        state.saved.save(self.store.as_ref());
    }

    /// Discard unsaved edits: clear the dirty flag, restore `transient`
    /// from `saved`, and notify "changed". The store is not touched.
    ///
    /// The notification carries no diff — listeners re-read the keys they
    /// care about.
    pub fn revert(&self) {
        {
            let mut state = self.lock();
            state.modified = false;
            state.transient = state.saved.clone();
        }
        self.changed.notify(&());
    }

    /// Re-read the section from the store, discarding unsaved edits, and
    /// notify "reloaded".
    ///
    /// The fresh snapshot re-resolves the store's location, so pointer
    /// redirection lands here. "reloaded" is distinct from "changed";
    /// listeners that only watch the latter will not see external reloads.
    pub fn reload(&self) {
        let fresh = Group::load(self.store.as_ref(), self.name.clone());
        {
            let mut state = self.lock();
            state.saved = fresh;
            state.transient = state.saved.clone();
            state.modified = false;
        }
        self.reloaded.notify(&());
    }

    /// Current dirty flag: whether the working copy has diverged from the
    /// saved state since the last save, revert, or reload.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.lock().modified
    }

    /// Subscribe to "changed": raised after every actual write and after
    /// every revert.
    pub fn on_changed(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.changed.subscribe(move |_: &()| callback())
    }

    /// Subscribe to "reloaded": raised after every reload.
    pub fn on_reloaded(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.reloaded.subscribe(move |_: &()| callback())
    }
}

impl std::fmt::Debug for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Bundle")
            .field("name", &self.name)
            .field("keys", &state.transient.len())
            .field("modified", &state.modified)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
