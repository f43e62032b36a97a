#![forbid(unsafe_code)]

//! Subscriber lists and RAII subscription guards.
//!
//! # Design
//!
//! [`Subscribers<A>`] holds callbacks as weak references; the strong
//! reference lives inside the [`Subscription`] guard handed back to the
//! subscriber. Dropping the guard unsubscribes: the weak entry fails to
//! upgrade on the next notification cycle and is pruned then. Live
//! callbacks are notified in registration order.
//!
//! Notification collects the live callbacks under the list lock and calls
//! them after releasing it, so a callback may subscribe, unsubscribe, or
//! publish again without deadlocking.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. A dropped [`Subscription`] is never called again (it may linger in
//!    the list, unpruned, until the next notify).
//! 3. `notify` holds no lock while running callbacks.

use std::sync::{Arc, Mutex, Weak};

type CallbackArc<A> = Arc<dyn Fn(&A) + Send + Sync>;
type CallbackWeak<A> = Weak<dyn Fn(&A) + Send + Sync>;

/// An ordered list of weakly-held subscriber callbacks.
pub struct Subscribers<A> {
    list: Mutex<Vec<CallbackWeak<A>>>,
}

impl<A> Default for Subscribers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Subscribers<A> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CallbackWeak<A>>> {
        // A panicking callback must not wedge every later notification.
        self.list
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Register `callback`, returning the guard that keeps it alive.
    pub fn subscribe(&self, callback: impl Fn(&A) + Send + Sync + 'static) -> Subscription
    where
        A: 'static,
    {
        let strong: CallbackArc<A> = Arc::new(callback);
        self.lock().push(Arc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Notify live subscribers with `payload` and prune dead entries.
    pub fn notify(&self, payload: &A) {
        // Collect live callbacks first; never call them under the lock.
        let callbacks: Vec<CallbackArc<A>> = {
            let mut list = self.lock();
            list.retain(|weak| weak.strong_count() > 0);
            list.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in &callbacks {
            callback(payload);
        }
    }

    /// Number of registered entries, including dead ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard drops the only strong reference to the callback, so
/// the weak entry in the subscriber list loses its referent and the
/// callback cannot fire again.
pub struct Subscription {
    // Type-erased strong reference keeping the callback alive; the
    // concrete `Arc<dyn Fn(&A) + ..>` cannot coerce to `Arc<dyn Any>`
    // directly, so it travels boxed.
    _guard: Box<dyn std::any::Any + Send>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
