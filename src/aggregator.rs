//! Per-article fetch, extract and score, with running totals.
//!
//! URLs are handled strictly in input order, one at a time:
//!
//! 1. GET the page with the configured timeout
//! 2. Extract the visible text ([`extract::article_text`])
//! 3. Score it ([`SentimentAnalyzer::score`])
//! 4. Add pos/neu/neg to the [`RunningTotals`]
//! 5. Record an [`ArticleResult`] (score or error)
//! 6. Sleep for the courtesy delay, whatever the outcome
//!
//! A failure only ever affects its own result; the output always holds one
//! result per input URL, in input order.

use crate::error::ArticleError;
use crate::extract;
use crate::http::HttpGet;
use crate::models::{ArticleResult, RunningTotals, SentimentScore};
use crate::sentiment::SentimentAnalyzer;
use futures::stream::{self, StreamExt};
use std::pin::pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// Knobs for the per-article stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorOptions {
    /// Per-request timeout for article fetches.
    pub timeout: Duration,
    /// Pause after every article, successful or not.
    pub delay: Duration,
    /// Maximum excerpt length in characters.
    pub excerpt_chars: usize,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            delay: Duration::from_secs(1),
            excerpt_chars: 100,
        }
    }
}

/// Fetch, extract and score a single article.
///
/// Returns the full extracted text alongside its score so the caller can
/// decide how much of it to keep.
#[instrument(level = "debug", skip(http, analyzer, timeout))]
pub async fn score_article<H: HttpGet>(
    http: &H,
    analyzer: &SentimentAnalyzer,
    url: &str,
    timeout: Duration,
) -> Result<(String, SentimentScore), ArticleError> {
    let response = http.get(url, Some(timeout)).await?.error_for_status()?;
    let text = extract::article_text(&response.body);
    let score = analyzer.score(&text)?;
    Ok((text, score))
}

/// Score every URL in order and accumulate the totals.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn analyze<H: HttpGet>(
    http: &H,
    urls: &[String],
    options: &AggregatorOptions,
) -> (Vec<ArticleResult>, RunningTotals) {
    let analyzer = SentimentAnalyzer::new();
    let mut totals = RunningTotals::default();
    let mut results = Vec::with_capacity(urls.len());

    // `then` keeps exactly one article in flight
    let mut outcomes = pin!(stream::iter(urls.iter().enumerate()).then(|(index, url)| async move {
        let outcome = score_article(http, &analyzer, url, options.timeout).await;
        sleep(options.delay).await;
        (index, url, outcome)
    }));

    while let Some((index, url, outcome)) = outcomes.next().await {
        let result = match outcome {
            Ok((text, score)) => {
                totals.add(&score);
                info!(
                    index,
                    %url,
                    compound = score.compound,
                    positive = score.positive,
                    negative = score.negative,
                    neutral = score.neutral,
                    "Processed article"
                );
                ArticleResult::scored(url, extract::excerpt(&text, options.excerpt_chars), score)
            }
            Err(e) => {
                error!(index, %url, error = %e, "Error processing article");
                ArticleResult::failed(url, &e)
            }
        };
        results.push(result);

        info!(
            sum_positive = totals.positive,
            sum_neutral = totals.neutral,
            sum_negative = totals.negative,
            "Running sentiment totals"
        );
    }

    let succeeded = results.iter().filter(|r| r.is_success()).count();
    info!(total = results.len(), succeeded, failed = results.len() - succeeded, "Finished analyzing articles");

    (results, totals)
}
