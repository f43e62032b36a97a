#![forbid(unsafe_code)]

//! Observable settings bundles: the synchronization core of Tether.
//!
//! Independent components declare typed settings as [`Value<T>`] handles
//! over a shared [`Bundle`]. The bundle keeps two snapshots of its section
//! — last-persisted and live — tracks divergence with a dirty flag, and
//! publishes "changed"/"reloaded" notifications through cancellable
//! [`Subscription`] guards. Persistence goes through the
//! [`tether_store::SettingsStore`] seam; nothing in this crate touches a
//! file directly.

pub mod bundle;
pub mod group;
pub mod subscription;
pub mod value;

pub use bundle::Bundle;
pub use group::Group;
pub use subscription::{Subscribers, Subscription};
pub use value::Value;
