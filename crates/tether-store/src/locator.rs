#![forbid(unsafe_code)]

//! Resolution of the active settings file location.
//!
//! The store never hard-codes where settings live. A [`StoreLocator`] is
//! handed to whatever constructs a file-backed store and answers one
//! question: "which file is the active settings document right now?" The
//! answer is re-asked on every section read and write, so swapping the
//! active file takes effect on the next reload without restarting.
//!
//! [`PointerFile`] implements the pointer-to-the-real-file scheme: a small,
//! fixed, well-known JSON document whose single entry names the active
//! settings file. [`FixedPath`] pins the location for tests and embedded
//! use.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolves the path of the active settings file.
///
/// Implementations must be cheap enough to call on every store access.
pub trait StoreLocator: Send + Sync {
    /// Current location of the active settings file.
    fn resolve(&self) -> PathBuf;
}

/// The single-entry document inside a pointer file.
#[derive(Deserialize)]
struct Pointer {
    settings_file: PathBuf,
}

/// Pointer-file indirection: a fixed file names the active settings file.
///
/// When the pointer file is missing or unreadable the locator falls back
/// to a caller-supplied default path, so first launch works before any
/// pointer has been written.
pub struct PointerFile {
    pointer_path: PathBuf,
    default_path: PathBuf,
}

impl PointerFile {
    /// Create a locator reading `pointer_path`, degrading to
    /// `default_path` when the pointer is absent or malformed.
    #[must_use]
    pub fn new(pointer_path: impl Into<PathBuf>, default_path: impl Into<PathBuf>) -> Self {
        Self {
            pointer_path: pointer_path.into(),
            default_path: default_path.into(),
        }
    }

    /// Path of the pointer document itself.
    #[must_use]
    pub fn pointer_path(&self) -> &Path {
        &self.pointer_path
    }
}

impl StoreLocator for PointerFile {
    fn resolve(&self) -> PathBuf {
        let raw = match std::fs::read_to_string(&self.pointer_path) {
            Ok(raw) => raw,
            Err(err) => {
                // Absent pointer is the expected first-launch state; only a
                // pointer that exists but cannot be read is worth a warning.
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(
                        pointer = %self.pointer_path.display(),
                        %err,
                        "settings pointer unreadable, using default path"
                    );
                }
                return self.default_path.clone();
            }
        };
        match serde_json::from_str::<Pointer>(&raw) {
            Ok(pointer) => pointer.settings_file,
            Err(err) => {
                warn!(
                    pointer = %self.pointer_path.display(),
                    %err,
                    "settings pointer malformed, using default path"
                );
                self.default_path.clone()
            }
        }
    }
}

/// A locator that always answers with the same path.
pub struct FixedPath {
    path: PathBuf,
}

impl FixedPath {
    /// Create a locator pinned to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StoreLocator for FixedPath {
    fn resolve(&self) -> PathBuf {
        self.path.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
