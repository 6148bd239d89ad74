//! Persistent weather cache store.
//!
//! The cache is one flat JSON object, key → record. `save` is the only
//! path that touches the on-disk file, and it always goes through a
//! temporary file plus atomic rename: a crash mid-write leaves the
//! previous valid cache in place.

use std::path::{Path, PathBuf};

use common::types::WeatherCache;
use common::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted cache. An absent file means an empty cache;
    /// a malformed file is logged and treated as empty without being
    /// deleted, so the next successful save is what replaces it.
    pub fn load(&self) -> WeatherCache {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no cache at {}, starting empty", self.path.display());
                return WeatherCache::new();
            }
            Err(e) => {
                warn!(
                    "cache at {} unreadable ({}), starting empty",
                    self.path.display(),
                    e
                );
                return WeatherCache::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(cache) => cache,
            Err(e) => {
                warn!(
                    "cache at {} is not a valid JSON object ({}), starting empty",
                    self.path.display(),
                    e
                );
                WeatherCache::new()
            }
        }
    }

    /// Persist the complete cache atomically.
    pub fn save(&self, cache: &WeatherCache) -> Result<(), Error> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::Storage(format!("cannot create {}: {}", dir.display(), e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| Error::Storage(format!("cannot create temp file in {}: {}", dir.display(), e)))?;

        serde_json::to_writer_pretty(&mut tmp, cache)
            .map_err(|e| Error::Storage(format!("cannot serialize cache: {}", e)))?;

        tmp.persist(&self.path)
            .map_err(|e| Error::Storage(format!("cannot replace {}: {}", self.path.display(), e)))?;

        debug!("saved {} records to {}", cache.len(), self.path.display());
        Ok(())
    }
}

/// Key-wise union: `updates` wins on conflict, every key of `existing`
/// not present in `updates` is preserved unchanged. The store
/// accumulates coverage across batch runs that each touch only a slice
/// of all locations.
pub fn merge(existing: WeatherCache, updates: WeatherCache) -> WeatherCache {
    let mut merged = existing;
    merged.extend(updates);
    merged
}
