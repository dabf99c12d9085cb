//! Cache module for storing fetched testimonials
//!
//! Entries carry a TTL (time-to-live) and are stored either in a process-wide
//! in-memory map or as JSON files on disk. Both backends return expired entries
//! with an `is_expired` flag and leave it to the caller to decide whether stale
//! data is acceptable.

mod manager;
mod memory;

pub use manager::CacheManager;
pub use memory::MemoryCache;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when writing a cache entry
#[derive(Debug, Error)]
pub enum CacheError {
    /// Directory creation or file write failed
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Data could not be serialized
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Another thread panicked while holding the in-memory cache lock
    #[error("In-memory cache lock poisoned")]
    Poisoned,

    /// Disk cache requested but no cache directory could be determined
    #[error("No cache directory available for the disk cache; pass --cache-dir")]
    NoCacheDir,
}

/// Wrapper struct for cached data with expiry metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Stamps `data` as cached now, expiring after `ttl`
    fn new(data: T, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            data,
            cached_at: now,
            expires_at,
        }
    }

    /// Converts to the caller-facing form, evaluating expiry against now
    fn into_cached(self) -> CachedData<T> {
        CachedData {
            is_expired: Utc::now() >= self.expires_at,
            data: self.data,
            cached_at: self.cached_at,
        }
    }
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// A cache backend chosen at startup
#[derive(Debug, Clone)]
pub enum Cache {
    /// Shared in-memory map; clones see the same entries
    Memory(MemoryCache),
    /// JSON files under a cache directory
    Disk(CacheManager),
}

impl Cache {
    /// Reads an entry, returning `None` if it is missing or cannot be decoded
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        match self {
            Cache::Memory(cache) => cache.read(key),
            Cache::Disk(cache) => cache.read(key),
        }
    }

    /// Writes an entry that expires after `ttl`, replacing any existing one
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> Result<(), CacheError> {
        match self {
            Cache::Memory(cache) => cache.write(key, data, ttl),
            Cache::Disk(cache) => cache.write(key, data, ttl),
        }
    }

    /// Like [`Cache::read`], but runs disk I/O on the blocking thread pool
    pub async fn read_async<T>(&self, key: &str) -> Option<CachedData<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match self {
            Cache::Memory(cache) => cache.read(key),
            Cache::Disk(cache) => {
                let cache = cache.clone();
                let key = key.to_string();
                tokio::task::spawn_blocking(move || cache.read(&key))
                    .await
                    .ok()
                    .flatten()
            }
        }
    }

    /// Like [`Cache::write`], but runs disk I/O on the blocking thread pool
    pub async fn write_async<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        match self {
            Cache::Memory(cache) => cache.write(key, data, ttl),
            Cache::Disk(cache) => {
                let value = serde_json::to_value(data)?;
                let cache = cache.clone();
                let key = key.to_string();
                tokio::task::spawn_blocking(move || cache.write(&key, &value, ttl))
                    .await
                    .map_err(|e| CacheError::Io(std::io::Error::other(e)))?
            }
        }
    }

    /// Short backend name for logs
    pub fn backend_name(&self) -> &'static str {
        match self {
            Cache::Memory(_) => "memory",
            Cache::Disk(_) => "disk",
        }
    }
}
