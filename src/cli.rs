//! Command-line interface parsing for the testimonials service
//!
//! Every flag can also be set through an environment variable, which is how the
//! service is usually configured when deployed. The Sheets credentials are read
//! from `GOOGLE_SHEETS_ID` and `GOOGLE_SHEETS_API_KEY`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::config::{CacheBackend, Settings, SheetsConfig, DEFAULT_CACHE_TTL, DEV_CACHE_TTL};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The Sheets base URL cannot carry a path
    #[error("Invalid Sheets base URL: '{0}'. Expected an http or https URL")]
    InvalidBaseUrl(String),
}

/// Portfolio testimonials service - serves Google Form testimonials as JSON
#[derive(Parser, Debug)]
#[command(name = "folio-testimonials")]
#[command(about = "Serves portfolio testimonials from a Google Sheet")]
#[command(version)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "FOLIO_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short, env = "FOLIO_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Spreadsheet id holding the form responses
    #[arg(long, env = "GOOGLE_SHEETS_ID")]
    pub sheet_id: Option<String>,

    /// Google API key with read access to the spreadsheet
    #[arg(long, env = "GOOGLE_SHEETS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seconds a fetched list stays cached (default 300, or 60 with --dev)
    #[arg(long, value_name = "SECS", env = "FOLIO_CACHE_TTL")]
    pub cache_ttl: Option<u64>,

    /// Use development defaults (shorter cache TTL)
    #[arg(long, env = "FOLIO_DEV")]
    pub dev: bool,

    /// Cache backend
    #[arg(long, value_enum, env = "FOLIO_CACHE", default_value_t = CacheBackend::Memory)]
    pub cache: CacheBackend,

    /// Directory for the disk cache (defaults to the XDG cache directory)
    #[arg(long, value_name = "PATH", env = "FOLIO_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Root URL of the Google Sheets API
    #[arg(
        long,
        value_name = "URL",
        env = "FOLIO_SHEETS_BASE_URL",
        default_value = crate::config::DEFAULT_SHEETS_BASE_URL
    )]
    pub sheets_base_url: Url,

    /// Upstream request timeout in seconds
    #[arg(long, value_name = "SECS", env = "FOLIO_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,
}

/// Picks the cache TTL: an explicit value wins, then the `--dev` preset
pub fn resolve_cache_ttl(cache_ttl: Option<u64>, dev: bool) -> Duration {
    match (cache_ttl, dev) {
        (Some(secs), _) => Duration::from_secs(secs),
        (None, true) => DEV_CACHE_TTL,
        (None, false) => DEFAULT_CACHE_TTL,
    }
}

impl Settings {
    /// Creates Settings from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Settings)` with credentials normalized (blank means unset)
    /// * `Err(CliError)` if the base URL is unusable
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let base_url = &cli.sheets_base_url;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(CliError::InvalidBaseUrl(base_url.to_string()));
        }

        let sheets = SheetsConfig {
            base_url: base_url.clone(),
            timeout: Duration::from_secs(cli.timeout),
            ..SheetsConfig::new(cli.sheet_id.clone(), cli.api_key.clone())
        };

        Ok(Settings {
            bind: SocketAddr::new(cli.bind, cli.port),
            sheets,
            cache_ttl: resolve_cache_ttl(cli.cache_ttl, cli.dev),
            cache_backend: cli.cache,
            cache_dir: cli.cache_dir.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_cache_ttl() {
        assert_eq!(resolve_cache_ttl(None, false), Duration::from_secs(300));
        assert_eq!(resolve_cache_ttl(None, true), Duration::from_secs(60));
        assert_eq!(resolve_cache_ttl(Some(5), true), Duration::from_secs(5));
        assert_eq!(resolve_cache_ttl(Some(0), false), Duration::ZERO);
    }

    #[test]
    fn test_cli_parse_explicit_values() {
        let cli = Cli::parse_from([
            "folio-testimonials",
            "--bind",
            "127.0.0.1",
            "--port",
            "8080",
            "--sheet-id",
            "abc",
            "--api-key",
            "xyz",
            "--cache-ttl",
            "30",
            "--cache",
            "disk",
            "--cache-dir",
            "/tmp/folio",
            "--timeout",
            "3",
        ]);

        assert_eq!(cli.port, 8080);
        assert_eq!(cli.sheet_id.as_deref(), Some("abc"));
        assert_eq!(cli.api_key.as_deref(), Some("xyz"));
        assert_eq!(cli.cache_ttl, Some(30));
        assert_eq!(cli.cache, CacheBackend::Disk);

        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(settings.cache_ttl, Duration::from_secs(30));
        assert_eq!(settings.sheets.timeout, Duration::from_secs(3));
        assert_eq!(settings.sheets.credentials(), Some(("abc", "xyz")));
        assert_eq!(settings.cache_dir, Some(PathBuf::from("/tmp/folio")));
    }

    #[test]
    fn test_cli_parse_dev_flag_shortens_ttl() {
        let cli = Cli::parse_from(["folio-testimonials", "--dev", "--sheet-id", "a", "--api-key", "b"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_cli_rejects_unknown_cache_backend() {
        let result = Cli::try_parse_from(["folio-testimonials", "--cache", "redis"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_cli_blank_credentials_are_unset() {
        let cli = Cli::parse_from(["folio-testimonials", "--sheet-id", " ", "--api-key", "key"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert!(settings.sheets.sheet_id.is_none());
        assert!(settings.sheets.credentials().is_none());
    }

    #[test]
    fn test_from_cli_leaves_cache_dir_lookup_to_settings() {
        let cli = Cli::parse_from(["folio-testimonials", "--cache", "disk"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.cache_backend, CacheBackend::Disk);
        assert!(settings.cache_dir.is_none());
    }

    #[test]
    fn test_from_cli_rejects_non_http_base_url() {
        let cli = Cli::parse_from(["folio-testimonials", "--sheets-base-url", "ftp://example.com"]);
        let err = Settings::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CliError::InvalidBaseUrl(_)));
        assert!(err.to_string().contains("ftp://example.com"));
    }

    #[test]
    fn test_from_cli_custom_base_url() {
        let cli = Cli::parse_from([
            "folio-testimonials",
            "--sheets-base-url",
            "http://localhost:9999",
        ]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.sheets.base_url.as_str(), "http://localhost:9999/");
    }
}
