//! Data models for one pipeline run.
//!
//! This module defines the values that flow between the two stages:
//! - [`SearchQuery`]: the news-search request, built once per run
//! - [`SentimentScore`]: the four-field output of the lexicon scorer
//! - [`ArticleResult`]: one record per input URL, successful or not
//! - [`RunningTotals`]: additive pos/neu/neg sums over scored articles
//!
//! Everything here is owned by the pipeline driver and dropped at the end
//! of the run.

use crate::error::{ArticleError, FetchError};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Placeholder recorded for an article object that carries no `url`.
pub const MISSING_URL: &str = "No URL found";

/// Largest `pageSize` the search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort order understood by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Articles most closely related to the query first.
    #[serde(alias = "relevancy")]
    #[value(alias = "relevancy")]
    Relevance,
    /// Articles from popular sources and publishers first.
    Popularity,
    /// Newest articles first.
    #[serde(alias = "publishedAt")]
    #[value(alias = "publishedAt")]
    PublishedAt,
}

impl SortOrder {
    /// Value sent as the `sortBy` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevancy",
            SortOrder::Popularity => "popularity",
            SortOrder::PublishedAt => "publishedAt",
        }
    }
}

/// A single news-search request.
///
/// `date_from` defaults to yesterday: the free tier of the search API
/// embargoes articles for a day, so asking from yesterday is the earliest
/// window that returns anything recent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub term: String,
    pub date_from: NaiveDate,
    pub sort: SortOrder,
    /// Always within `1..=MAX_PAGE_SIZE`.
    pub max_results: u32,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, sort: SortOrder, max_results: u32) -> Self {
        Self {
            term: term.into(),
            date_from: Local::now().date_naive() - Duration::days(1),
            sort,
            max_results: max_results.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn with_date_from(mut self, date_from: NaiveDate) -> Self {
        self.date_from = date_from;
        self
    }
}

/// Lexicon scorer output.
///
/// `positive`, `negative` and `neutral` are each in `[0, 1]`; `compound` is
/// in `[-1, 1]`. The three proportions need not sum to exactly 1 because
/// of rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScore {
    pub fn is_within_bounds(&self) -> bool {
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        self.compound.is_finite()
            && (-1.0..=1.0).contains(&self.compound)
            && unit(self.positive)
            && unit(self.negative)
            && unit(self.neutral)
    }
}

/// Category of a per-article failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    Transport,
    HttpStatus,
    Scoring,
}

/// Serialisable description of why an article has no score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ArticleError> for ErrorRecord {
    fn from(err: &ArticleError) -> Self {
        let kind = match err {
            ArticleError::Fetch(FetchError::InvalidUrl { .. }) => ErrorKind::InvalidUrl,
            ArticleError::Fetch(FetchError::Transport(_)) => ErrorKind::Transport,
            ArticleError::Fetch(FetchError::Status(_)) => ErrorKind::HttpStatus,
            ArticleError::Scoring(_) => ErrorKind::Scoring,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Either the score of an article or the reason it could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Score(SentimentScore),
    Error(ErrorRecord),
}

/// Outcome for one input URL. Created once and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleResult {
    pub url: String,
    /// Bounded prefix of the extracted text; empty for failed articles.
    pub excerpt: String,
    pub sentiment: Sentiment,
}

impl ArticleResult {
    pub fn scored(url: &str, excerpt: String, score: SentimentScore) -> Self {
        Self {
            url: url.to_string(),
            excerpt,
            sentiment: Sentiment::Score(score),
        }
    }

    pub fn failed(url: &str, err: &ArticleError) -> Self {
        Self {
            url: url.to_string(),
            excerpt: String::new(),
            sentiment: Sentiment::Error(err.into()),
        }
    }

    pub fn score(&self) -> Option<&SentimentScore> {
        match &self.sentiment {
            Sentiment::Score(score) => Some(score),
            Sentiment::Error(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.score().is_some()
    }
}

/// Sums of the positive, neutral and negative proportions over every
/// successfully scored article. Only ever added to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningTotals {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl RunningTotals {
    pub fn add(&mut self, score: &SentimentScore) {
        self.positive += score.positive;
        self.neutral += score.neutral;
        self.negative += score.negative;
    }

    /// Recompute the totals from a finished result list.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a ArticleResult>) -> Self {
        let mut totals = Self::default();
        for score in results.into_iter().filter_map(ArticleResult::score) {
            totals.add(score);
        }
        totals
    }
}
