//! Disk cache backend
//!
//! Provides a `CacheManager` that stores serializable data to JSON files with
//! expiry timestamps, so cached testimonials survive a process restart.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use super::{CacheEntry, CacheError, CachedData};

/// Manages reading and writing cached data to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/folio-testimonials/` on Linux). Each cache entry includes an expiry
/// timestamp; expired entries are still returned with `is_expired = true`.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "folio-testimonials")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Writes data to the cache with a specified TTL (time-to-live)
    ///
    /// Each write goes to its own temporary file in the cache directory, which
    /// is then renamed into place, so a concurrent reader sees either the old
    /// entry or the new one and concurrent writers never share a file.
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)?;

        let entry = CacheEntry::new(data, ttl);
        let mut file = NamedTempFile::new_in(&self.cache_dir)?;
        serde_json::to_writer_pretty(file.as_file_mut(), &entry)?;
        file.as_file_mut().flush()?;
        file.persist(self.cache_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    /// Reads data from the cache
    ///
    /// Returns `None` if the cache entry doesn't exist or cannot be parsed.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let content = fs::read_to_string(self.cache_path(key)).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;
        Some(entry.into_cached())
    }
}
