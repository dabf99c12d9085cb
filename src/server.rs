//! HTTP server exposing the testimonials endpoint

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::data::Testimonial;
use crate::provider::{FetchOptions, TestimonialProvider};

/// Path of the testimonials endpoint
pub const TESTIMONIALS_PATH: &str = "/api/testimonials";

/// Query parameters accepted by the testimonials endpoint
#[derive(Debug, Default, Deserialize)]
pub struct TestimonialsQuery {
    /// `"true"` forces a fresh upstream fetch
    pub refresh: Option<String>,
}

impl TestimonialsQuery {
    /// Only the exact value `true` bypasses the cache
    pub fn bypass_cache(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}

/// Builds the application router around a shared provider
pub fn router(provider: Arc<TestimonialProvider>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(TESTIMONIALS_PATH, get(testimonials_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(provider)
}

/// Always answers 200 with a JSON array, empty when nothing is available.
///
/// A query string that fails to parse is treated as if it were absent.
pub async fn testimonials_handler(
    State(provider): State<Arc<TestimonialProvider>>,
    query: Result<Query<TestimonialsQuery>, QueryRejection>,
) -> Json<Vec<Testimonial>> {
    let query = query.map(|Query(query)| query).unwrap_or_else(|rejection| {
        warn!(error = %rejection.body_text(), "Ignoring unparseable query string");
        TestimonialsQuery::default()
    });
    let options = FetchOptions {
        bypass_cache: query.bypass_cache(),
    };
    debug!(bypass_cache = options.bypass_cache, "Testimonials requested");

    Json(provider.fetch_testimonials(options).await)
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Serves on `listener` until Ctrl+C or SIGTERM
pub async fn serve(listener: TcpListener, provider: Arc<TestimonialProvider>) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        info!("Server running on {address}");
    }

    axum::serve(listener, router(provider))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_cache_only_for_true() {
        let query = |refresh: Option<&str>| TestimonialsQuery {
            refresh: refresh.map(str::to_string),
        };

        assert!(query(Some("true")).bypass_cache());
        assert!(!query(Some("false")).bypass_cache());
        assert!(!query(Some("1")).bypass_cache());
        assert!(!query(Some("TRUE")).bypass_cache());
        assert!(!query(None).bypass_cache());
    }
}
