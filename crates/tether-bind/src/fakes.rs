#![forbid(unsafe_code)]

//! Fake controls implementing every capability.
//!
//! These stand in for real toolkit widgets in tests: they hold their
//! displayed state in a mutex, fire their change event on user edits and
//! on state-changing programmatic sets (the way toolkit widgets do), and
//! count programmatic sets so tests can assert that no redundant echo
//! update arrived.

use crate::control::{DisplayControl, EditableControl};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tether_core::{Subscribers, Subscription};
use tether_store::Scalar;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// A generic fake editable control displaying one `T`.
///
/// Aliased per capability below; the behavior is identical everywhere:
/// state plus a change event that fires whenever the displayed value
/// actually changes, whoever changed it.
pub struct FakeControl<T: Scalar> {
    state: Mutex<T>,
    changed: Subscribers<T>,
    set_calls: AtomicUsize,
}

/// Index-based discrete selector (combo box by index).
pub type FakeIndexSelector = FakeControl<i64>;
/// Boolean toggle (check box).
pub type FakeToggle = FakeControl<bool>;
/// Integer spin control or slider.
pub type FakeSpinner = FakeControl<i64>;
/// Floating-point spin control or slider.
pub type FakeSlider = FakeControl<f64>;
/// Free-text entry (line edit).
pub type FakeTextBox = FakeControl<String>;

impl<T: Scalar> FakeControl<T> {
    /// Create a control displaying `initial`.
    #[must_use]
    pub fn new(initial: T) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(initial),
            changed: Subscribers::new(),
            set_calls: AtomicUsize::new(0),
        })
    }

    /// Simulate a user edit: update the display and fire the change
    /// event, exactly as an interactive edit would.
    pub fn user_edit(&self, value: T) {
        *lock(&self.state) = value.clone();
        self.changed.notify(&value);
    }

    /// Currently displayed value.
    #[must_use]
    pub fn current(&self) -> T {
        lock(&self.state).clone()
    }

    /// Number of programmatic `set_value` calls received.
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
}

impl<T: Scalar> EditableControl<T> for FakeControl<T> {
    fn value(&self) -> T {
        self.current()
    }

    fn set_value(&self, value: T) {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        let changed = {
            let mut state = lock(&self.state);
            if *state == value {
                false
            } else {
                *state = value.clone();
                true
            }
        };
        // Toolkit widgets fire their change event on state-changing
        // programmatic sets too; the bind protocol must absorb that.
        if changed {
            self.changed.notify(&value);
        }
    }

    fn on_value_changed(&self, callback: Box<dyn Fn(&T) + Send + Sync>) -> Subscription {
        self.changed.subscribe(move |value: &T| callback(value))
    }
}

/// Text-based discrete selector that normalizes unknown entries to its
/// first item, the way a combo box clamps text it does not contain.
pub struct FakeTextSelector {
    items: Vec<String>,
    state: Mutex<String>,
    changed: Subscribers<String>,
    set_calls: AtomicUsize,
}

impl FakeTextSelector {
    /// Create a selector over `items`, displaying the first one.
    #[must_use]
    pub fn new(items: &[&str]) -> Arc<Self> {
        let items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        let initial = items.first().cloned().unwrap_or_default();
        Arc::new(Self {
            items,
            state: Mutex::new(initial),
            changed: Subscribers::new(),
            set_calls: AtomicUsize::new(0),
        })
    }

    fn normalize(&self, value: String) -> String {
        if self.items.contains(&value) {
            value
        } else {
            self.items.first().cloned().unwrap_or_default()
        }
    }

    /// Simulate a user picking an entry.
    pub fn user_edit(&self, value: &str) {
        let value = self.normalize(value.to_string());
        *lock(&self.state) = value.clone();
        self.changed.notify(&value);
    }

    /// Currently displayed entry.
    #[must_use]
    pub fn current(&self) -> String {
        lock(&self.state).clone()
    }

    /// Number of programmatic `set_value` calls received.
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
}

impl EditableControl<String> for FakeTextSelector {
    fn value(&self) -> String {
        self.current()
    }

    fn set_value(&self, value: String) {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        let value = self.normalize(value);
        let changed = {
            let mut state = lock(&self.state);
            if *state == value {
                false
            } else {
                *state = value.clone();
                true
            }
        };
        if changed {
            self.changed.notify(&value);
        }
    }

    fn on_value_changed(&self, callback: Box<dyn Fn(&String) + Send + Sync>) -> Subscription {
        self.changed.subscribe(move |value: &String| callback(value))
    }
}

/// Display-only label.
pub struct FakeLabel {
    text: Mutex<String>,
    set_calls: AtomicUsize,
}

impl FakeLabel {
    /// Create an empty label.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            text: Mutex::new(String::new()),
            set_calls: AtomicUsize::new(0),
        })
    }

    /// Currently displayed text.
    #[must_use]
    pub fn text(&self) -> String {
        lock(&self.text).clone()
    }

    /// Number of programmatic `set_value` calls received.
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
}

impl DisplayControl<String> for FakeLabel {
    fn set_value(&self, value: String) {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.text) = value;
    }
}
