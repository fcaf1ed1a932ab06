//! Valence lexicon and the modifier word lists used by the analyzer.
//!
//! Valences are on a -4.0 ..= 4.0 scale. The word list ships inside the
//! binary (`lexicon.tsv`) and is parsed once.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::warn;

/// Scalar added to (or removed from) a valence by a booster word.
pub const B_INCR: f64 = 0.293;
pub const B_DECR: f64 = -0.293;

/// Emphasis added for an ALL-CAPS sentiment word in mixed-case text.
pub const C_INCR: f64 = 0.733;

/// Multiplier applied to a negated valence.
pub const N_SCALAR: f64 = -0.74;

const LEXICON_TSV: &str = include_str!("lexicon.tsv");

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't",
    "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt",
    "havent", "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't",
    "isn't", "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not",
    "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't",
    "shan't", "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't",
    "wouldn't", "rarely", "seldom", "despite",
];

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerable", "considerably",
    "decidedly", "deeply", "effing", "enormous", "enormously", "entirely", "especially",
    "exceptional", "exceptionally", "extreme", "extremely", "fabulously", "flipping",
    "flippin", "frackin", "fracking", "fricking", "frickin", "frigging", "friggin", "fully",
    "fuckin", "fucking", "fuggin", "fugging", "greatly", "hella", "highly", "hugely",
    "incredible", "incredibly", "intensely", "major", "majorly", "more", "most",
    "particularly", "purely", "quite", "really", "remarkably", "so", "substantially",
    "thoroughly", "total", "totally", "tremendous", "tremendously", "uber", "unbelievably",
    "unusually", "utter", "utterly", "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "just enough", "kind of", "kinda", "kindof", "kind-of",
    "less", "little", "marginal", "marginally", "occasional", "occasionally", "partly",
    "scarce", "scarcely", "slight", "slightly", "somewhat", "sort of", "sorta", "sortof",
    "sort-of",
];

static DEFAULT_LEXICON: Lazy<Lexicon> = Lazy::new(Lexicon::new);

/// Word valences plus negation and booster lists.
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
    boosters: HashMap<&'static str, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    /// Build the lexicon from the embedded word list.
    pub fn new() -> Self {
        let boosters = BOOSTERS_UP
            .iter()
            .map(|w| (*w, B_INCR))
            .chain(BOOSTERS_DOWN.iter().map(|w| (*w, B_DECR)))
            .collect();

        Self {
            valences: parse_tsv(LEXICON_TSV),
            boosters,
        }
    }

    /// Shared instance of the embedded lexicon.
    pub fn shared() -> &'static Lexicon {
        &DEFAULT_LEXICON
    }

    /// Valence for an already lower-cased word.
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.valences.contains_key(word)
    }

    /// Booster scalar for an already lower-cased word.
    pub fn booster(&self, word: &str) -> Option<f64> {
        self.boosters.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

/// True if any of `words` is a negation, including `n't` contractions.
pub fn negated<'a>(words: impl IntoIterator<Item = &'a str>) -> bool {
    words.into_iter().any(|w| {
        let lower = w.to_lowercase();
        NEGATIONS.contains(&lower.as_str()) || lower.contains("n't")
    })
}

fn parse_tsv(tsv: &str) -> HashMap<String, f64> {
    let mut valences = HashMap::new();
    for (lineno, line) in tsv.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let (Some(word), Some(value)) = (fields.next(), fields.next()) else {
            warn!(lineno, line, "Skipping malformed lexicon line");
            continue;
        };
        match value.trim().parse::<f64>() {
            Ok(v) => {
                valences.insert(word.to_lowercase(), v);
            }
            Err(e) => warn!(lineno, line, error = %e, "Skipping lexicon line with bad valence"),
        }
    }
    valences
}
