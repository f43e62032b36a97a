#![forbid(unsafe_code)]

//! Bind adapters: wiring between observable values and controls.
//!
//! # Design
//!
//! A binding wires one [`Value<T>`] to one control, both directions
//! subscribed before the initial push. Every update crossing the binding
//! — control edit toward the value, value change toward the control — is
//! posted to the control thread's [`UiHandle`] rather than called
//! directly, so no change notification ever re-enters the call stack
//! that produced it. The bundle's equality-gated store then terminates
//! any echo: a change converges in at most one round trip.
//!
//! The returned [`Binding`] owns both direction subscriptions; dropping
//! it deregisters both before either endpoint goes away.
//!
//! # Capabilities
//!
//! One constructor per capability, mirroring what interactive toolkits
//! offer: index selector, text selector (with its normalize-reconcile
//! step), toggle, numeric spin/slider, free-text entry, and display-only
//! label.

use crate::control::{DisplayControl, EditableControl, Numeric};
use crate::queue::UiHandle;
use std::sync::Arc;
use tether_core::{Subscription, Value};
use tether_store::Scalar;

/// RAII guard for one value-to-control binding.
///
/// Dropping the binding detaches both directions. The value and the
/// control themselves are untouched and must outlive the drop.
pub struct Binding {
    _subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding").finish_non_exhaustive()
    }
}

/// Symmetric two-way wiring: the common shape of every editable bind.
fn bind_symmetric<T, C>(value: &Value<T>, control: &Arc<C>, ui: &UiHandle) -> Binding
where
    T: Scalar,
    C: EditableControl<T> + 'static,
{
    // Value -> control, marshaled onto the control thread.
    let control_for_push = Arc::clone(control);
    let ui_for_push = ui.clone();
    let value_sub = value.on_changed(move |new: &T| {
        let control = Arc::clone(&control_for_push);
        let new = new.clone();
        ui_for_push.post(move || control.set_value(new));
    });

    // Control -> value, deferred so the control's event handler returns
    // before the store runs.
    let value_for_store = value.clone();
    let ui_for_store = ui.clone();
    let control_sub = control.on_value_changed(Box::new(move |new: &T| {
        let value = value_for_store.clone();
        let new = new.clone();
        ui_for_store.post(move || value.set(new));
    }));

    // Initial push: the control starts out showing the value's state.
    control.set_value(value.get());

    Binding {
        _subscriptions: vec![value_sub, control_sub],
    }
}

/// Bind an integer value to an index-based discrete selector.
pub fn bind_index_selector<C>(value: &Value<i64>, control: &Arc<C>, ui: &UiHandle) -> Binding
where
    C: EditableControl<i64> + 'static,
{
    bind_symmetric(value, control, ui)
}

/// Bind a string value to a text-based discrete selector.
///
/// After the initial push the adapter reads the control's own current
/// text back into the value: the control may have normalized or clamped
/// what was pushed, and the pair must agree on a fixed point before any
/// events flow.
pub fn bind_text_selector<C>(value: &Value<String>, control: &Arc<C>, ui: &UiHandle) -> Binding
where
    C: EditableControl<String> + 'static,
{
    let binding = bind_symmetric(value, control, ui);
    value.set(control.value());
    binding
}

/// Bind a boolean value to a toggle control.
pub fn bind_toggle<C>(value: &Value<bool>, control: &Arc<C>, ui: &UiHandle) -> Binding
where
    C: EditableControl<bool> + 'static,
{
    bind_symmetric(value, control, ui)
}

/// Bind a numeric value to a spin control or slider.
pub fn bind_numeric<T, C>(value: &Value<T>, control: &Arc<C>, ui: &UiHandle) -> Binding
where
    T: Numeric,
    C: EditableControl<T> + 'static,
{
    bind_symmetric(value, control, ui)
}

/// Bind a string value to a free-text entry.
pub fn bind_text_entry<C>(value: &Value<String>, control: &Arc<C>, ui: &UiHandle) -> Binding
where
    C: EditableControl<String> + 'static,
{
    bind_symmetric(value, control, ui)
}

/// Bind a string value to a display-only label. One-directional: the
/// label tracks the value, nothing flows back.
pub fn bind_label<C>(value: &Value<String>, control: &Arc<C>, ui: &UiHandle) -> Binding
where
    C: DisplayControl<String> + 'static,
{
    let control_for_push = Arc::clone(control);
    let ui_for_push = ui.clone();
    let value_sub = value.on_changed(move |new: &String| {
        let control = Arc::clone(&control_for_push);
        let new = new.clone();
        ui_for_push.post(move || control.set_value(new));
    });

    control.set_value(value.get());

    Binding {
        _subscriptions: vec![value_sub],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeLabel, FakeSpinner, FakeTextSelector, FakeToggle};
    use crate::queue::UiQueue;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tether_core::Bundle;
    use tether_store::{MemoryStore, SettingsStore};

    fn bundle(name: &str) -> Arc<Bundle> {
        Bundle::new(name, Arc::new(MemoryStore::new()) as Arc<dyn SettingsStore>)
    }

    fn value_counter<T: Scalar>(value: &Value<T>) -> (Arc<AtomicU32>, Subscription) {
        let count = Arc::new(AtomicU32::new(0));
        let count2 = Arc::clone(&count);
        let sub = value.on_changed(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });
        (count, sub)
    }

    #[test]
    fn toggle_edit_converges_in_one_round_trip() {
        let queue = UiQueue::new();
        let value = Value::new(bundle("s"), "enabled", false);
        let control = FakeToggle::new(false);
        let _binding = bind_toggle(&value, &control, &queue.handle());
        queue.drain();

        let (events, _sub) = value_counter(&value);
        let sets_before = control.set_calls();

        control.user_edit(true);
        queue.drain();

        assert!(value.get());
        assert!(control.current());
        // Exactly one value-changed event for the whole round trip.
        assert_eq!(events.load(Ordering::SeqCst), 1);
        // The control saw exactly the one echo push, which its own
        // equality check absorbed; nothing further is queued.
        assert_eq!(control.set_calls() - sets_before, 1);
        assert_eq!(queue.drain(), 0);
    }

    #[test]
    fn two_bindings_one_value_single_event() {
        let queue = UiQueue::new();
        let value = Value::new(bundle("s"), "count", 0i64);
        let first = FakeSpinner::new(0);
        let second = FakeSpinner::new(0);
        let _a = bind_numeric(&value, &first, &queue.handle());
        let _b = bind_numeric(&value, &second, &queue.handle());
        queue.drain();

        let (events, _sub) = value_counter(&value);
        value.set(5);
        queue.drain();

        assert_eq!(first.current(), 5);
        assert_eq!(second.current(), 5);
        assert_eq!(events.load(Ordering::SeqCst), 1);
        assert_eq!(queue.drain(), 0);
    }

    #[test]
    fn initial_push_seeds_the_control() {
        let queue = UiQueue::new();
        let value = Value::new(bundle("s"), "count", 42i64);
        let control = FakeSpinner::new(0);
        let _binding = bind_numeric(&value, &control, &queue.handle());

        // The push happens synchronously at bind time.
        assert_eq!(control.current(), 42);
        queue.drain();
        assert_eq!(value.get(), 42);
    }

    #[test]
    fn text_selector_reconciles_to_fixed_point() {
        let queue = UiQueue::new();
        let value = Value::new(bundle("s"), "model", String::from("unknown-model"));
        let control = FakeTextSelector::new(&["alpha", "beta"]);
        let _binding = bind_text_selector(&value, &control, &queue.handle());
        queue.drain();

        // The control clamped the pushed text; the value followed.
        assert_eq!(control.current(), "alpha");
        assert_eq!(value.get(), "alpha");
        assert_eq!(queue.drain(), 0);
    }

    #[test]
    fn label_tracks_value_one_way() {
        let queue = UiQueue::new();
        let value = Value::new(bundle("s"), "status", String::from("idle"));
        let label = FakeLabel::new();
        let _binding = bind_label(&value, &label, &queue.handle());
        assert_eq!(label.text(), "idle");

        value.set("tracking".into());
        queue.drain();
        assert_eq!(label.text(), "tracking");
    }

    #[test]
    fn dropped_binding_detaches_both_directions() {
        let queue = UiQueue::new();
        let value = Value::new(bundle("s"), "count", 0i64);
        let control = FakeSpinner::new(0);
        let binding = bind_numeric(&value, &control, &queue.handle());
        queue.drain();

        drop(binding);

        control.user_edit(7);
        queue.drain();
        assert_eq!(value.get(), 0);

        value.set(9);
        queue.drain();
        assert_eq!(control.current(), 7);
    }

    #[test]
    fn control_edits_flow_through_queue_not_call_stack() {
        let queue = UiQueue::new();
        let value = Value::new(bundle("s"), "count", 0i64);
        let control = FakeSpinner::new(0);
        let _binding = bind_numeric(&value, &control, &queue.handle());
        queue.drain();

        control.user_edit(3);
        // Before the drain the value is untouched: the update is queued,
        // not applied inside the control's event.
        assert_eq!(value.get(), 0);
        queue.drain();
        assert_eq!(value.get(), 3);
    }
}
