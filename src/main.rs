//! # News Sentiment
//!
//! Fetches recent news article URLs for a query from a news-search API,
//! downloads each article, extracts its visible text and scores it with a
//! lexicon-based sentiment analyzer.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... news_sentiment --term markets --count 49 --sort popularity
//! ```
//!
//! ## Architecture
//!
//! The application is a two-stage, strictly sequential pipeline:
//! 1. **Collecting**: one search request yields an ordered list of article URLs
//!    (also written to `<output_dir>/my_news_data.txt`)
//! 2. **Analyzing**: each URL is fetched, its text extracted and scored, one at
//!    a time with a fixed pause in between; failures are recorded per article
//!
//! Only configuration problems abort the run. Search and article failures are
//! logged and leave an empty list or an error record respectively.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregator;
mod cli;
mod collector;
mod config;
mod error;
mod extract;
mod http;
mod models;
mod pipeline;
mod sentiment;
mod utils;

use cli::Cli;
use config::Config;
use http::ReqwestHttp;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("news_sentiment starting up");

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env file");
    }

    // Parse CLI and resolve config
    let args = Cli::parse();
    let config = Config::load(&args).inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
    debug!(?config, "Resolved configuration");

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let http = ReqwestHttp::new()?;
    let report = pipeline::run(&config, &http).await;

    info!(
        collected = report.collected,
        skipped = report.skipped,
        succeeded = report.succeeded,
        failed = report.failed,
        sum_positive = report.totals.positive,
        sum_neutral = report.totals.neutral,
        sum_negative = report.totals.negative,
        "Sentiment totals"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
