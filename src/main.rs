//! Portfolio testimonials service
//!
//! Serves `GET /api/testimonials` for the portfolio website, backed by the
//! Google Sheet that collects testimonial form responses.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use folio_testimonials::cli::Cli;
use folio_testimonials::config::Settings;
use folio_testimonials::data::SheetsClient;
use folio_testimonials::{server, TestimonialProvider};

/// Initializes logging from `RUST_LOG`, defaulting to `info`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_cli(cli)?;
    let cache = settings.cache()?;

    let sheets = SheetsClient::from_config(&settings.sheets)?;
    if sheets.is_none() {
        warn!(
            "Google Sheets configuration missing. Add GOOGLE_SHEETS_ID and GOOGLE_SHEETS_API_KEY \
             to your environment variables; serving an empty testimonial list"
        );
    }

    info!(
        backend = cache.backend_name(),
        ttl_secs = settings.cache_ttl.as_secs(),
        "Cache configured"
    );
    let provider = Arc::new(TestimonialProvider::new(sheets, cache, settings.cache_ttl));

    info!("Binding to {}", settings.bind);
    let listener = TcpListener::bind(settings.bind).await?;
    server::serve(listener, provider).await?;

    Ok(())
}
