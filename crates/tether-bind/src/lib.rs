#![forbid(unsafe_code)]

//! Control binding for Tether settings.
//!
//! This crate keeps an observable [`tether_core::Value`] and an external
//! interactive control mutually consistent: user edits flow into the
//! value, programmatic changes flow back into the control's display, and
//! neither direction can echo into an unbounded loop. Controls appear
//! only through the capability traits in [`control`]; the queued dispatch
//! in [`queue`] marshals every crossing update onto the thread that owns
//! the control.

pub mod bind;
pub mod control;
pub mod queue;

#[cfg(any(test, feature = "test-helpers"))]
pub mod fakes;

pub use bind::{
    Binding, bind_index_selector, bind_label, bind_numeric, bind_text_entry, bind_text_selector,
    bind_toggle,
};
pub use control::{DisplayControl, EditableControl, Numeric};
pub use queue::{UiHandle, UiQueue};
