use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration options supplied when constructing a store.
///
/// Deserializable so callers can embed it in their own configuration files;
/// missing keys fall back to [`StoreOptions::default`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Directory holding the store files.
    pub dir: PathBuf,
    /// Whether to create `dir` (and its parents) when a store is opened.
    pub create_dir: bool,
    /// Whether to fsync the store file after every write.
    pub sync_on_write: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            create_dir: true,
            sync_on_write: false,
        }
    }
}

impl StoreOptions {
    /// Creates options rooted at `dir` with default settings.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Enables or disables creating the store directory on open.
    pub fn create_dir(mut self, enabled: bool) -> Self {
        self.create_dir = enabled;
        self
    }

    /// Enables or disables an fsync after every write.
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.sync_on_write = enabled;
        self
    }
}
