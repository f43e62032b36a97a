#![forbid(unsafe_code)]

//! Typed observable handles onto one key of one bundle.
//!
//! # Design
//!
//! A [`Value<T>`] names a `(bundle, key)` pair plus a default. It never
//! duplicates the live value — every read goes through the bundle — and a
//! write is just an equality-gated [`Bundle::store`]. What the value adds
//! on top is typing (the [`Scalar`] coercion on both paths) and its own
//! "value changed" notification, raised only when a write actually
//! changed the stored entry.
//!
//! Cloning a `Value` clones a handle: both handles share the same
//! subscribers and the same bundle slot.
//!
//! # Reload
//!
//! Each value subscribes to its bundle's "reloaded" notification for its
//! whole life. On reload it re-reads the key and re-raises "value
//! changed" only when the reloaded value differs from the last value this
//! handle observed — the small `last_seen` state exists purely for that
//! diff; reads never consult it.
//!
//! # Invariants
//!
//! 1. After construction the bundle maps `key` to a value of type `T`
//!    (the previously stored entry, coerced, or the default if absent or
//!    invalid).
//! 2. At most one "value changed" notification per actual change.
//! 3. `get()` always reflects the bundle's working copy.

use crate::bundle::Bundle;
use crate::subscription::{Subscribers, Subscription};
use std::sync::{Arc, Mutex, Weak};
use tether_store::Scalar;

struct Inner<T: Scalar> {
    bundle: Arc<Bundle>,
    key: String,
    def: T,
    changed: Subscribers<T>,
    /// Last value this handle notified for (or saw at construction).
    /// Used only to gate the reload re-notification.
    last_seen: Mutex<T>,
    /// Keeps the bundle's "reloaded" subscription alive for the lifetime
    /// of the last handle.
    reload_guard: Mutex<Option<Subscription>>,
}

impl<T: Scalar> Inner<T> {
    fn last_seen(&self) -> std::sync::MutexGuard<'_, T> {
        self.last_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// A typed, notification-raising handle onto one key within one bundle.
pub struct Value<T: Scalar> {
    inner: Arc<Inner<T>>,
}

// Manual Clone: shares the same inner state.
impl<T: Scalar> Clone for Value<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Scalar + std::fmt::Debug> std::fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Value")
            .field("bundle", &self.inner.bundle.name())
            .field("key", &self.inner.key)
            .field("current", &self.get())
            .finish()
    }
}

impl<T: Scalar> Value<T> {
    /// Create a handle onto `key` in `bundle`, seeding `def` when the key
    /// is absent or holds an invalid placeholder.
    ///
    /// Seeding runs through the ordinary assignment path, so it raises
    /// the bundle's "changed" notification exactly once in that case and
    /// not at all otherwise.
    #[must_use]
    pub fn new(bundle: Arc<Bundle>, key: impl Into<String>, def: T) -> Self {
        let inner = Arc::new(Inner {
            bundle,
            key: key.into(),
            def: def.clone(),
            changed: Subscribers::new(),
            last_seen: Mutex::new(def.clone()),
            reload_guard: Mutex::new(None),
        });
        let value = Self {
            inner: Arc::clone(&inner),
        };

        // React to bundle reloads for as long as any handle lives. The
        // subscription captures only a weak inner, so the value and the
        // guard it stores do not keep each other alive in a cycle.
        let weak: Weak<Inner<T>> = Arc::downgrade(&inner);
        let guard = inner.bundle.on_reloaded(move || {
            if let Some(inner) = weak.upgrade() {
                Value { inner }.reread();
            }
        });
        *inner
            .reload_guard
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(guard);

        if value.inner.bundle.raw(&value.inner.key).is_invalid() {
            value.set(value.inner.def.clone());
        } else {
            *inner.last_seen() = value.get();
        }
        value
    }

    /// Current value, read through the bundle's working copy.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.bundle.get(&self.inner.key)
    }

    /// Assign a new value through the bundle's equality-gated store.
    ///
    /// Raises this value's "changed" notification only when the store
    /// actually changed the entry.
    pub fn set(&self, value: T) {
        if self
            .inner
            .bundle
            .store(&self.inner.key, value.clone().into_value())
        {
            *self.inner.last_seen() = value.clone();
            self.inner.changed.notify(&value);
        }
    }

    /// Subscribe to "value changed". The callback receives each new value
    /// after an actual change.
    pub fn on_changed(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.inner.changed.subscribe(callback)
    }

    /// The default supplied at construction.
    #[must_use]
    pub fn default_value(&self) -> &T {
        &self.inner.def
    }

    /// Key this handle is bound to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// The bundle this handle reads and writes through.
    #[must_use]
    pub fn bundle(&self) -> &Arc<Bundle> {
        &self.inner.bundle
    }

    /// Reload reaction: re-read the key and re-raise "value changed" when
    /// the reloaded value differs from the last observed one.
    fn reread(&self) {
        let fresh = self.get();
        let differs = {
            let mut last = self.inner.last_seen();
            if *last == fresh {
                false
            } else {
                *last = fresh.clone();
                true
            }
        };
        if differs {
            self.inner.changed.notify(&fresh);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
