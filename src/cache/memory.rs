//! In-memory cache backend shared across requests

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{CacheEntry, CacheError, CachedData};

/// Process-wide key/value cache holding JSON values with expiry metadata.
///
/// Cloning is cheap and every clone shares the same map. Entries are stored as
/// JSON so any serializable type can be cached under any key.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry<Value>>>>,
}

impl MemoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes data under `key`, expiring after `ttl`. Last write wins.
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry::new(serde_json::to_value(data)?, ttl);
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    /// Reads the entry under `key`, or `None` if absent or not decodable as `T`
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let entry = self.entries.read().ok()?.get(key).cloned()?;
        let data = serde_json::from_value(entry.data).ok()?;

        Some(
            CacheEntry {
                data,
                cached_at: entry.cached_at,
                expires_at: entry.expires_at,
            }
            .into_cached(),
        )
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
