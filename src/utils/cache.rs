//! Key-value JSON cache for display titles.
//!
//! Search results store the artifact title under `"{group} {artifact}"` so the
//! version list rendered by a later invocation can show it again.
//!
//! # Cache Structure
//!
//! ```text
//! <cache dir>/
//!   titleCache/
//!     <md5 of key>.json
//! ```
//!
//! Entries never expire. Every operation is best-effort: failures are logged
//! and otherwise ignored.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the directory holding title entries
pub const TITLE_CACHE_NAME: &str = "titleCache";

/// File-backed string-keyed JSON store
#[derive(Debug, Clone)]
pub struct TitleCache {
    dir: PathBuf,
}

impl TitleCache {
    /// Create a cache living under `cache_dir`
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            dir: cache_dir.join(TITLE_CACHE_NAME),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = md5::compute(key.as_bytes());
        self.dir.join(format!("{:x}.json", digest))
    }

    /// Store `value` under `key`
    pub fn store_json<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.write_entry(key, value) {
            tracing::warn!("Failed to cache '{}': {}", key, e);
        } else {
            tracing::trace!("Cached '{}'", key);
        }
    }

    /// Load the value stored under `key`, if any
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read_entry(key) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("No cached value for '{}': {}", key, e);
                None
            }
        }
    }

    fn write_entry<T: Serialize>(&self, key: &str, value: &T) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string(value)?;
        fs::write(self.entry_path(key), content)
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> std::io::Result<T> {
        let content = fs::read_to_string(self.entry_path(key))?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }
}
