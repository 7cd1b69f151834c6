//! Persisted key-value store.
//!
//! The browser original kept everything in `localStorage`; here each key is
//! one JSON file under a configured directory. There are no transactions, no
//! migrations, and no expiry - a reader that finds a malformed value falls
//! back to the caller's default instead of propagating a parse failure.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// A string-keyed store of JSON-serializable records.
///
/// Cheaply cloneable; clones share the same backing directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: Arc<PathBuf>,
}

impl LocalStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir: Arc::new(dir) })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read and parse the value stored under `key`.
    ///
    /// Returns `None` when the key is absent or the stored value is
    /// malformed; a malformed value is logged and treated as absent.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding malformed stored value");
                None
            }
        }
    }

    /// Read the value stored under `key`, or `default` when absent or
    /// malformed.
    #[must_use]
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Serialize `value` and write it under `key` synchronously.
    ///
    /// A write failure is logged rather than surfaced; persistence is
    /// best-effort by contract, matching the browser original.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let path = self.path_for(key);
        match serde_json::to_string(value) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, json) {
                    warn!(key, error = %e, "failed to persist value");
                }
            }
            Err(e) => warn!(key, error = %e, "failed to serialize value"),
        }
    }

    /// Remove the value stored under `key`, if any.
    pub fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if path.exists()
            && let Err(e) = fs::remove_file(&path)
        {
            warn!(key, error = %e, "failed to remove stored value");
        }
    }
}
