//! One end-to-end run: collect URLs, then score them.

use crate::aggregator;
use crate::collector;
use crate::config::Config;
use crate::http::HttpGet;
use crate::models::{ArticleResult, RunningTotals, SearchQuery, MISSING_URL};
use serde::Serialize;
use tracing::{info, instrument};

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub query: SearchQuery,
    /// URLs returned by the search API, placeholders included.
    pub collected: usize,
    /// Placeholders dropped before fetching (only with `skip_missing_urls`).
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub totals: RunningTotals,
    pub results: Vec<ArticleResult>,
}

/// Remove [`MISSING_URL`] placeholders, returning how many were dropped.
pub fn drop_missing_urls(urls: Vec<String>) -> (Vec<String>, usize) {
    let before = urls.len();
    let kept: Vec<String> = urls.into_iter().filter(|url| url != MISSING_URL).collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

#[instrument(level = "info", skip_all, fields(term = %config.term))]
pub async fn run<H: HttpGet>(config: &Config, http: &H) -> RunReport {
    let query = config.query();
    let urls = collector::collect(http, &config.endpoint, &config.api_key, &query, &config.debug_file()).await;
    let collected = urls.len();

    let (urls, skipped) = if config.skip_missing_urls {
        drop_missing_urls(urls)
    } else {
        (urls, 0)
    };
    if skipped > 0 {
        info!(skipped, "Dropped articles without a URL");
    }

    let (results, totals) = aggregator::analyze(http, &urls, &config.aggregator_options()).await;
    let succeeded = results.iter().filter(|r| r.is_success()).count();

    RunReport {
        query,
        collected,
        skipped,
        succeeded,
        failed: results.len() - succeeded,
        totals,
        results,
    }
}
