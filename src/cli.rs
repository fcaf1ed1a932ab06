//! Command-line interface definitions.
//!
//! Every option is optional on the command line so that a YAML config file
//! (`--config`) can fill it in; see [`crate::config`] for the precedence
//! rules and defaults.

use crate::models::SortOrder;
use clap::Parser;

/// Command-line arguments for News Sentiment.
///
/// # Examples
///
/// ```sh
/// # Default query ("markets", 49 articles, by popularity)
/// NEWS_API_KEY=... news_sentiment
///
/// # Custom query, report printed as JSON
/// news_sentiment --term "interest rates" --count 20 --sort published-at --json
///
/// # Everything from a config file
/// news_sentiment --config ./news_sentiment.yaml
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// News search API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// News search endpoint
    #[arg(long, env = "NEWS_API_URL")]
    pub endpoint: Option<String>,

    /// Search keyword [default: markets]
    #[arg(short, long)]
    pub term: Option<String>,

    /// Number of articles to request, at most 100 [default: 49]
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Sort order for the search results [default: popularity]
    #[arg(short, long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Directory for the URL debug file [default: output]
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Per-article request timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout_secs: Option<f64>,

    /// Pause between articles in seconds [default: 1]
    #[arg(long)]
    pub delay_secs: Option<f64>,

    /// Length of the stored text excerpt in characters [default: 100]
    #[arg(long)]
    pub excerpt_chars: Option<usize>,

    /// Drop "No URL found" placeholders instead of trying to fetch them
    #[arg(long)]
    pub skip_missing_urls: bool,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
