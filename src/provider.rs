//! Testimonial provider
//!
//! Serves testimonials from the cache when possible and otherwise fetches the
//! form responses from Google Sheets, reshapes them, and caches the result.
//! Every failure degrades to an empty list so the frontend can fall back to its
//! own static testimonials.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::cache::Cache;
use crate::data::{testimonials_from_rows, FetchError, SheetsClient, Testimonial};

/// Cache key under which the processed testimonials are stored
pub const CACHE_KEY: &str = "testimonials";

/// Per-call options for [`TestimonialProvider::fetch_testimonials`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the cache lookup and always fetch upstream
    pub bypass_cache: bool,
}

/// Fetches, transforms, and caches testimonials
#[derive(Debug, Clone)]
pub struct TestimonialProvider {
    /// Upstream client; `None` when credentials are not configured
    sheets: Option<SheetsClient>,
    /// Where processed testimonials are cached
    cache: Cache,
    /// Lifetime of a cache entry
    cache_ttl: Duration,
}

impl TestimonialProvider {
    /// Creates a provider. Pass `None` for `sheets` to serve an empty list.
    pub fn new(sheets: Option<SheetsClient>, cache: Cache, cache_ttl: Duration) -> Self {
        Self {
            sheets,
            cache,
            cache_ttl,
        }
    }

    /// Whether an upstream sheet is configured
    pub fn is_configured(&self) -> bool {
        self.sheets.is_some()
    }

    /// The cache this provider reads and writes
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Returns the current testimonials, never failing.
    ///
    /// Missing configuration, upstream errors, and malformed responses all
    /// resolve to an empty list; the cause is only logged.
    pub async fn fetch_testimonials(&self, options: FetchOptions) -> Vec<Testimonial> {
        match self.try_fetch(options).await {
            Ok(testimonials) => testimonials,
            Err(FetchError::ConfigurationMissing) => {
                warn!("{}", FetchError::ConfigurationMissing);
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Error fetching testimonials from Google Sheets");
                Vec::new()
            }
        }
    }

    /// Returns the current testimonials, surfacing why a fetch failed.
    ///
    /// # Behavior
    /// - Fails with `ConfigurationMissing` before any cache or network access
    /// - Unless bypassed, returns a fresh cache entry verbatim
    /// - Otherwise fetches upstream, drops rows without a name or quote, and
    ///   caches the result (an empty upstream range is not cached)
    pub async fn try_fetch(&self, options: FetchOptions) -> Result<Vec<Testimonial>, FetchError> {
        let sheets = self.sheets.as_ref().ok_or(FetchError::ConfigurationMissing)?;

        if !options.bypass_cache {
            if let Some(cached) = self.cache.read_async::<Vec<Testimonial>>(CACHE_KEY).await {
                if !cached.is_expired {
                    debug!(
                        count = cached.data.len(),
                        cached_at = %cached.cached_at,
                        "Serving testimonials from cache"
                    );
                    return Ok(cached.data);
                }
            }
        }

        let rows = sheets.fetch_rows().await?;
        if rows.is_empty() {
            info!("No data found in Google Sheets");
            return Ok(Vec::new());
        }
        info!(rows = rows.len(), "Fetched rows from Google Sheets");

        let testimonials = testimonials_from_rows(&rows);
        info!(
            count = testimonials.len(),
            "Processed testimonials after filtering"
        );

        if let Err(e) = self
            .cache
            .write_async(CACHE_KEY, &testimonials, self.cache_ttl)
            .await
        {
            warn!(
                error = %e,
                backend = self.cache.backend_name(),
                "Failed to cache testimonials"
            );
        }

        Ok(testimonials)
    }
}
