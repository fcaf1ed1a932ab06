//! Runtime configuration.
//!
//! Values are layered, highest priority first:
//! 1. command-line flags and their environment variables ([`Cli`])
//! 2. the optional YAML file named by `--config` ([`FileConfig`])
//! 3. built-in defaults
//!
//! The API key has no default; a run without one fails at startup.
//!
//! # Config file
//!
//! ```yaml
//! api_key: "..."
//! term: markets
//! count: 49
//! sort: popularity        # relevance | popularity | published-at
//! output_dir: output
//! timeout_secs: 10
//! delay_secs: 1
//! excerpt_chars: 100
//! skip_missing_urls: false
//! ```

use crate::aggregator::AggregatorOptions;
use crate::cli::Cli;
use crate::collector::DEBUG_FILE_NAME;
use crate::error::ConfigError;
use crate::models::{SearchQuery, SortOrder, MAX_PAGE_SIZE};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_TERM: &str = "markets";
pub const DEFAULT_COUNT: u32 = 49;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Contents of the optional YAML config file. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub term: Option<String>,
    pub count: Option<u32>,
    pub sort: Option<SortOrder>,
    pub output_dir: Option<String>,
    pub timeout_secs: Option<f64>,
    pub delay_secs: Option<f64>,
    pub excerpt_chars: Option<usize>,
    pub skip_missing_urls: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    fn parse(raw: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub endpoint: Url,
    pub term: String,
    pub count: u32,
    pub sort: SortOrder,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub delay: Duration,
    pub excerpt_chars: usize,
    pub skip_missing_urls: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint.as_str())
            .field("term", &self.term)
            .field("count", &self.count)
            .field("sort", &self.sort)
            .field("output_dir", &self.output_dir)
            .field("timeout", &self.timeout)
            .field("delay", &self.delay)
            .field("excerpt_chars", &self.excerpt_chars)
            .field("skip_missing_urls", &self.skip_missing_urls)
            .finish()
    }
}

impl Config {
    /// Load the config file named on the command line, if any, and resolve.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) => {
                let file = FileConfig::load(path)?;
                info!(path, "Loaded config file");
                file
            }
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Merge CLI values over file values over defaults and validate.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .clone()
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let endpoint = cli
            .endpoint
            .clone()
            .or(file.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint).map_err(|e| ConfigError::InvalidEndpoint(endpoint.clone(), e))?;

        let count = cli.count.or(file.count).unwrap_or(DEFAULT_COUNT);
        if count == 0 {
            return Err(ConfigError::InvalidCount(count));
        }
        if count > MAX_PAGE_SIZE {
            warn!(requested = count, max = MAX_PAGE_SIZE, "Article count above API maximum; clamping");
        }

        let timeout = seconds("timeout_secs", cli.timeout_secs.or(file.timeout_secs).unwrap_or(10.0))?;
        let delay = seconds("delay_secs", cli.delay_secs.or(file.delay_secs).unwrap_or(1.0))?;

        Ok(Self {
            api_key,
            endpoint,
            term: cli.term.clone().or(file.term).unwrap_or_else(|| DEFAULT_TERM.to_string()),
            count: count.min(MAX_PAGE_SIZE),
            sort: cli.sort.or(file.sort).unwrap_or(SortOrder::Popularity),
            output_dir: PathBuf::from(
                cli.output_dir
                    .clone()
                    .or(file.output_dir)
                    .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            timeout,
            delay,
            excerpt_chars: cli.excerpt_chars.or(file.excerpt_chars).unwrap_or(100),
            skip_missing_urls: cli.skip_missing_urls || file.skip_missing_urls.unwrap_or(false),
        })
    }

    /// The search request for this run, dated from yesterday.
    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.term.clone(), self.sort, self.count)
    }

    pub fn aggregator_options(&self) -> AggregatorOptions {
        AggregatorOptions {
            timeout: self.timeout,
            delay: self.delay,
            excerpt_chars: self.excerpt_chars,
        }
    }

    pub fn debug_file(&self) -> PathBuf {
        self.output_dir.join(DEBUG_FILE_NAME)
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { field, value })
}
