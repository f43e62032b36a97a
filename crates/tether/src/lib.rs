#![forbid(unsafe_code)]

//! Tether public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users: the
//! storage seam, the observable bundle core, and the control binding
//! layer, re-exported in one place.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tether::prelude::*;
//!
//! let store = Arc::new(store::JsonFileStore::new(store::PointerFile::new(
//!     "/etc/app/settings-pointer.json",
//!     "/etc/app/settings/default.json",
//! )));
//! let tracker = core::Bundle::new("tracker", store);
//! let fps = core::Value::new(Arc::clone(&tracker), "fps", 60i64);
//!
//! let ui = bind::UiQueue::new();
//! // let _binding = bind::bind_numeric(&fps, &spinner, &ui.handle());
//! ```

pub mod prelude {
    pub use tether_bind as bind;
    pub use tether_core as core;
    pub use tether_store as store;
}

pub use tether_bind::{
    Binding, DisplayControl, EditableControl, Numeric, UiHandle, UiQueue, bind_index_selector,
    bind_label, bind_numeric, bind_text_entry, bind_text_selector, bind_toggle,
};
pub use tether_core::{Bundle, Group, Subscription, Value};
pub use tether_store::{
    FixedPath, JsonFileStore, MemoryStore, PointerFile, Scalar, SectionMap, SettingValue,
    SettingsStore, StoreLocator,
};
