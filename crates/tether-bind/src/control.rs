#![forbid(unsafe_code)]

//! Control capabilities.
//!
//! Bindings couple a settings value to a control through a declared
//! capability, never a concrete widget type. Two capabilities cover the
//! whole protocol:
//!
//! - [`EditableControl<T>`]: the control displays a `T`, the user can
//!   change it, and programmatic changes can be pushed in. Index
//!   selectors bind as `T = i64`, text selectors and free-text entries as
//!   `T = String`, toggles as `T = bool`, spin controls and sliders as
//!   `T = i64` or `T = f64`.
//! - [`DisplayControl<T>`]: settable display with no input event
//!   (labels). One-directional by construction.
//!
//! A control's change event must fire for user edits; firing it for
//! programmatic [`set_value`](EditableControl::set_value) calls as well
//! is tolerated — the bind protocol's queued dispatch plus the bundle's
//! equality gate absorb the echo.

use tether_core::Subscription;
use tether_store::Scalar;

/// A bidirectional interactive control displaying one `T`.
pub trait EditableControl<T: Scalar>: Send + Sync {
    /// The control's currently displayed value.
    fn value(&self) -> T;

    /// Push a value into the control's display.
    fn set_value(&self, value: T);

    /// Subscribe to the control's change event. The returned guard must
    /// deregister the callback on drop.
    fn on_value_changed(&self, callback: Box<dyn Fn(&T) + Send + Sync>) -> Subscription;
}

/// A display-only control (label-like): settable, no input event.
pub trait DisplayControl<T: Scalar>: Send + Sync {
    /// Push a value into the control's display.
    fn set_value(&self, value: T);
}

/// Marker for the numeric-magnitude capability (spin controls, sliders).
pub trait Numeric: Scalar {}

impl Numeric for i64 {}
impl Numeric for f64 {}
