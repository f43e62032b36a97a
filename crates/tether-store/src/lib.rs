#![forbid(unsafe_code)]

//! Storage layer for Tether: tagged setting values, active-file location
//! resolution, and section-addressed key-value stores.
//!
//! Everything above this crate (snapshots, bundles, observable values)
//! reads and writes settings exclusively through the [`SettingsStore`]
//! trait; the adapters here are the only code that knows where bytes live.

pub mod locator;
pub mod store;
pub mod value;

pub use locator::{FixedPath, PointerFile, StoreLocator};
pub use store::{JsonFileStore, MemoryStore, SectionMap, SettingsStore};
pub use value::{Scalar, SettingValue};
