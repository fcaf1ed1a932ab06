//! Rule-based polarity scoring over the valence lexicon.
//!
//! Each token is looked up in the [`Lexicon`] and its valence adjusted by
//! the words before it:
//! 1. Boosters/dampeners up to three words back (weighted 1, 0.95, 0.9)
//! 2. Negations up to three words back (multiply by [`N_SCALAR`])
//! 3. ALL-CAPS emphasis when the text mixes upper and lower case
//! 4. A contrastive "but" halves what comes before it and boosts what follows
//!
//! The adjusted valences are then summed, amplified by `!`/`?` and
//! normalized into a compound score plus positive/negative/neutral
//! proportions.

use super::lexicon::{negated, Lexicon, C_INCR, N_SCALAR};
use crate::error::ArticleError;
use crate::models::SentimentScore;

/// Normalization constant approximating the max expected valence sum.
const ALPHA: f64 = 15.0;

const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_BOOST: f64 = 0.18;
const MAX_QUESTION_BOOST: f64 = 0.96;

/// Lexicon-based sentiment scorer.
#[derive(Debug, Clone, Copy)]
pub struct SentimentAnalyzer {
    lexicon: &'static Lexicon,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::shared(),
        }
    }

    /// Score `text`, rejecting any result outside the documented bounds.
    ///
    /// Empty text (or text with no usable tokens) scores all zeros.
    pub fn score(&self, text: &str) -> Result<SentimentScore, ArticleError> {
        let score = self.polarity_scores(text);
        if score.is_within_bounds() {
            Ok(score)
        } else {
            Err(ArticleError::Scoring(format!(
                "score out of range: compound={} pos={} neg={} neu={}",
                score.compound, score.positive, score.negative, score.neutral
            )))
        }
    }

    /// Raw compound/pos/neg/neu scores for `text`.
    pub fn polarity_scores(&self, text: &str) -> SentimentScore {
        let tokens = tokenize(text);
        let cap_diff = allcap_differential(&tokens);
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut sentiments = Vec::with_capacity(tokens.len());
        for (i, lower) in lowered.iter().enumerate() {
            if self.lexicon.booster(lower).is_some() {
                sentiments.push(0.0);
                continue;
            }
            if lower == "kind" && lowered.get(i + 1).is_some_and(|next| next == "of") {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence_at(&tokens, &lowered, i, cap_diff));
        }

        but_check(&lowered, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn valence_at(&self, tokens: &[&str], lowered: &[String], i: usize, cap_diff: bool) -> f64 {
        let Some(mut valence) = self.lexicon.valence(&lowered[i]) else {
            return 0.0;
        };

        // "no" directly before another sentiment word acts only as a negator
        if lowered[i] == "no" && lowered.get(i + 1).is_some_and(|next| self.lexicon.contains(next)) {
            valence = 0.0;
        }
        if (i > 0 && lowered[i - 1] == "no")
            || (i > 1 && lowered[i - 2] == "no")
            || (i > 2 && lowered[i - 3] == "no" && matches!(lowered[i - 1].as_str(), "or" | "nor"))
        {
            valence *= N_SCALAR;
        }

        if cap_diff && is_upper(tokens[i]) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let back = i - (start + 1);
            if self.lexicon.contains(&lowered[back]) {
                continue;
            }
            let mut scalar = self.booster_scalar(tokens[back], &lowered[back], valence, cap_diff);
            if start == 1 {
                scalar *= 0.95;
            } else if start == 2 {
                scalar *= 0.9;
            }
            valence += scalar;
            valence = negation_check(valence, lowered, start, i);
        }

        least_check(valence, lowered, i, self.lexicon)
    }

    fn booster_scalar(&self, token: &str, lower: &str, valence: f64, cap_diff: bool) -> f64 {
        let Some(mut scalar) = self.lexicon.booster(lower) else {
            return 0.0;
        };
        if valence < 0.0 {
            scalar = -scalar;
        }
        if cap_diff && is_upper(token) {
            scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
        }
        scalar
    }
}

/// Whitespace tokens with surrounding punctuation removed, unless stripping
/// would leave two characters or fewer (emoticons survive). Single
/// characters are dropped.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 { token } else { stripped }
        })
        .filter(|token| token.chars().count() > 1)
        .collect()
}

fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are ALL CAPS.
fn allcap_differential(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_upper(t)).count();
    caps > 0 && caps < tokens.len()
}

fn negation_check(mut valence: f64, lowered: &[String], start: usize, i: usize) -> f64 {
    let at = |back: usize| lowered[i - back].as_str();
    match start {
        0 => {
            if negated([at(1)]) {
                valence *= N_SCALAR;
            }
        }
        1 => {
            if at(2) == "never" && matches!(at(1), "so" | "this") {
                valence *= 1.25;
            } else if at(2) == "without" && at(1) == "doubt" {
            } else if negated([at(2)]) {
                valence *= N_SCALAR;
            }
        }
        2 => {
            if at(3) == "never" && (matches!(at(2), "so" | "this") || matches!(at(1), "so" | "this")) {
                valence *= 1.25;
            } else if at(3) == "without" && (at(2) == "doubt" || at(1) == "doubt") {
            } else if negated([at(3)]) {
                valence *= N_SCALAR;
            }
        }
        _ => {}
    }
    valence
}

/// "least" flips the valence unless it reads "at least" / "very least".
fn least_check(mut valence: f64, lowered: &[String], i: usize, lexicon: &Lexicon) -> f64 {
    if i > 1 && !lexicon.contains(&lowered[i - 1]) && lowered[i - 1] == "least" {
        if lowered[i - 2] != "at" && lowered[i - 2] != "very" {
            valence *= N_SCALAR;
        }
    } else if i > 0 && !lexicon.contains(&lowered[i - 1]) && lowered[i - 1] == "least" {
        valence *= N_SCALAR;
    }
    valence
}

fn but_check(lowered: &[String], sentiments: &mut [f64]) {
    let Some(but) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, s) in sentiments.iter_mut().enumerate() {
        if idx < but {
            *s *= 0.5;
        } else if idx > but {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64 * EXCLAMATION_BOOST;
    let questions = text.matches('?').count();
    let question_boost = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_BOOST,
        _ => MAX_QUESTION_BOOST,
    };
    exclamations + question_boost
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> SentimentScore {
    if sentiments.is_empty() {
        return SentimentScore::default();
    }

    let emphasis = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize(sum);

    let (mut pos_sum, mut neg_sum, mut neu_count) = (0.0_f64, 0.0_f64, 0.0_f64);
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    SentimentScore {
        compound: round_to(compound, 4),
        positive: round_to((pos_sum / total).abs(), 3),
        negative: round_to((neg_sum / total).abs(), 3),
        neutral: round_to((neu_count / total).abs(), 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(text: &str) -> SentimentScore {
        SentimentAnalyzer::new().score(text).unwrap()
    }

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(scores(""), SentimentScore::default());
        assert_eq!(scores("   \n\t "), SentimentScore::default());
        assert_eq!(scores("a b c"), SentimentScore::default());
    }

    #[test]
    fn test_text_without_lexicon_words_is_neutral() {
        let s = scores("The committee met on Tuesday");
        assert_eq!(s.compound, 0.0);
        assert_eq!(s.positive, 0.0);
        assert_eq!(s.negative, 0.0);
        assert_eq!(s.neutral, 1.0);
    }

    #[test]
    fn test_single_word_normalization() {
        let s = scores("good");
        assert!((s.compound - 0.4404).abs() < 1e-9);
        assert_eq!(s.positive, 1.0);
        assert_eq!(s.neutral, 0.0);
    }

    #[test]
    fn test_polarity_direction() {
        assert!(scores("Stocks rally as investors celebrate strong profits").compound > 0.5);
        assert!(scores("Markets crash amid fears of a deep recession and crisis").compound < -0.5);
    }

    #[test]
    fn test_negation_flips_polarity() {
        assert!(scores("The outlook is good").compound > 0.0);
        assert!(scores("The outlook is not good").compound < 0.0);
        assert!(scores("The outlook isn't good").compound < 0.0);
    }

    #[test]
    fn test_booster_increases_intensity() {
        let plain = scores("The results were good");
        let boosted = scores("The results were extremely good");
        let dampened = scores("The results were slightly good");
        assert!(boosted.compound > plain.compound);
        assert!(dampened.compound < plain.compound);
    }

    #[test]
    fn test_caps_emphasis_only_in_mixed_case() {
        let mixed = scores("The results were GOOD today");
        let lower = scores("The results were good today");
        assert!(mixed.compound > lower.compound);

        let shouting = scores("GOOD");
        assert_eq!(shouting.compound, scores("good").compound);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        let s = scores("The food was good but the service was terrible");
        assert!(s.compound < 0.0);
    }

    #[test]
    fn test_exclamation_amplifies() {
        assert!(scores("This is great!!!").compound > scores("This is great").compound);
    }

    #[test]
    fn test_kind_of_is_not_the_adjective() {
        assert!(scores("kind people").compound > 0.0);
        assert_eq!(scores("kind of").compound, 0.0);
        assert_eq!(scores("kind of good").compound, scores("good").compound);
    }

    #[test]
    fn test_at_least_does_not_negate() {
        assert!(scores("at least good").compound > 0.0);
        assert!(scores("least good").compound < 0.0);
    }

    #[test]
    fn test_tokenize_strips_punctuation_but_keeps_emoticons() {
        assert_eq!(tokenize("Hello, world! :) a"), vec!["Hello", "world", ":)"]);
    }

    #[test]
    fn test_scores_are_bounded_for_long_text() {
        let text = "wonderful amazing great! ".repeat(500) + &"terrible awful crisis ".repeat(300);
        let s = scores(&text);
        assert!(s.is_within_bounds());
        assert!(s.compound <= 1.0 && s.compound >= -1.0);
    }
}
