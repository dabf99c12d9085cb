//! Runtime configuration for the testimonials service
//!
//! `Settings` is built once at startup (see [`crate::cli`]) and handed to the
//! components that need it; nothing reads the environment after that.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::Url;

use crate::cache::{Cache, CacheError, CacheManager, MemoryCache};

/// Sheet and cell range holding the form responses (header row excluded)
pub const DEFAULT_RANGE: &str = "Form Responses 1!A2:K";

/// Root of the Google Sheets API
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Cache lifetime for served testimonials
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Shorter cache lifetime used with `--dev`
pub const DEV_CACHE_TTL: Duration = Duration::from_secs(60);

/// Upper bound on one upstream request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where cached testimonials are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CacheBackend {
    /// Process-wide in-memory map
    #[default]
    Memory,
    /// JSON files in a cache directory
    Disk,
}

/// Connection details for the Google Sheets values API
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet identifier; `None` when unset or blank
    pub sheet_id: Option<String>,
    /// API key; `None` when unset or blank
    pub api_key: Option<String>,
    /// A1-notation range to read
    pub range: String,
    /// API root URL
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Treats blank values the same as unset ones
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SheetsConfig {
    /// Creates a config with default range, base URL, and timeout
    pub fn new(sheet_id: Option<String>, api_key: Option<String>) -> Self {
        Self {
            sheet_id: non_blank(sheet_id),
            api_key: non_blank(api_key),
            range: DEFAULT_RANGE.to_string(),
            base_url: default_base_url(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Returns `(sheet_id, api_key)` when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.sheet_id.as_deref()?, self.api_key.as_deref()?))
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_SHEETS_BASE_URL).expect("default Sheets URL is valid")
}

/// Everything the service needs to start
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP server binds to
    pub bind: SocketAddr,
    /// Upstream Sheets configuration
    pub sheets: SheetsConfig,
    /// How long fetched testimonials stay cached
    pub cache_ttl: Duration,
    /// Cache storage backend
    pub cache_backend: CacheBackend,
    /// Directory for the disk backend; XDG cache dir when `None`
    pub cache_dir: Option<PathBuf>,
}

impl Settings {
    /// Builds the cache selected by these settings.
    ///
    /// Fails only for the disk backend when no cache directory was given and
    /// none can be determined (e.g., no home directory).
    pub fn cache(&self) -> Result<Cache, CacheError> {
        match self.cache_backend {
            CacheBackend::Memory => Ok(Cache::Memory(MemoryCache::new())),
            CacheBackend::Disk => {
                let manager = match &self.cache_dir {
                    Some(dir) => CacheManager::with_dir(dir.clone()),
                    None => CacheManager::new().ok_or(CacheError::NoCacheDir)?,
                };
                Ok(Cache::Disk(manager))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(cache_backend: CacheBackend, cache_dir: Option<PathBuf>) -> Settings {
        Settings {
            bind: "127.0.0.1:0".parse().unwrap(),
            sheets: SheetsConfig::new(None, None),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_backend,
            cache_dir,
        }
    }

    #[test]
    fn test_sheets_config_defaults() {
        let config = SheetsConfig::new(Some("id".to_string()), Some("key".to_string()));
        assert_eq!(config.range, "Form Responses 1!A2:K");
        assert_eq!(config.base_url.as_str(), "https://sheets.googleapis.com/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.credentials(), Some(("id", "key")));
    }

    #[test]
    fn test_blank_credentials_count_as_missing() {
        let config = SheetsConfig::new(Some("  ".to_string()), Some("key".to_string()));
        assert!(config.sheet_id.is_none());
        assert!(config.credentials().is_none());

        let config = SheetsConfig::new(Some("id".to_string()), None);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_credentials_are_trimmed() {
        let config = SheetsConfig::new(Some(" id \n".to_string()), Some(" key ".to_string()));
        assert_eq!(config.credentials(), Some(("id", "key")));
    }

    #[test]
    fn test_memory_backend_builds_memory_cache() {
        let cache = settings(CacheBackend::Memory, None).cache();
        assert!(matches!(cache, Ok(Cache::Memory(_))));
    }

    #[test]
    fn test_disk_backend_uses_given_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = settings(CacheBackend::Disk, Some(temp_dir.path().to_path_buf())).cache();

        match cache {
            Ok(Cache::Disk(manager)) => assert_eq!(manager.cache_dir(), temp_dir.path()),
            other => panic!("expected disk cache, got {other:?}"),
        }
    }
}
