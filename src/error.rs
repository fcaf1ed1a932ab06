//! Error kinds for every stage of the pipeline.
//!
//! Only [`ConfigError`] is fatal. Everything else is contained: a
//! [`CollectError`] turns into an empty URL list, an [`ArticleError`] turns
//! into an [`ErrorRecord`](crate::models::ErrorRecord) for that one article.

use thiserror::Error;

/// Failure to obtain a successful HTTP response for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::Status(status.as_u16());
        }
        FetchError::Transport(err.to_string())
    }
}

/// Failure of the search query. Recovered by returning no URLs.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("search request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("search response could not be decoded: {0}")]
    Decode(String),
}

/// Failure while handling a single article.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArticleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("sentiment scoring failed: {0}")]
    Scoring(String),
}

/// Startup configuration problems. These abort the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key configured (pass --api-key or set NEWS_API_KEY)")]
    MissingApiKey,

    #[error("article count must be between 1 and 100, got {0}")]
    InvalidCount(u32),

    #[error("{field} must be a non-negative number of seconds, got {value}")]
    InvalidDuration { field: &'static str, value: f64 },

    #[error("invalid endpoint {0:?}: {1}")]
    InvalidEndpoint(String, url::ParseError),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(500).to_string(), "HTTP status 500");
        let invalid = FetchError::InvalidUrl {
            url: "No URL found".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(invalid.to_string().contains("\"No URL found\""));
    }

    #[test]
    fn test_article_error_is_transparent_over_fetch() {
        let err: ArticleError = FetchError::Transport("timed out".into()).into();
        assert_eq!(err.to_string(), "request failed: timed out");
    }
}
