//! Lexicon-based sentiment scoring.
//!
//! - [`lexicon`]: embedded word valences, negations and booster words
//! - [`analyzer`]: the rule-based scorer producing a [`SentimentScore`](crate::models::SentimentScore)

pub mod analyzer;
pub mod lexicon;

pub use analyzer::SentimentAnalyzer;
