//! Lexicon-based sentiment scoring.
//!
//! Implements the VADER rule set: per-token valences from a polarity lexicon,
//! adjusted for boosters/dampeners, negation, contrastive "but", ALL-CAPS
//! emphasis and `!`/`?` punctuation. The summed valence is squashed into a
//! compound score in [-1, 1]; `neg`/`neu`/`pos` are the share of negative,
//! neutral and positive token mass.
//!
//! The analyzer is immutable once built, so one instance is shared by all
//! requests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::LexiconError;

const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.txt");

// Empirically derived VADER constants.
const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;

/// Compound scores strictly above this are positive, strictly below its
/// negation are negative.
pub const LABEL_THRESHOLD: f64 = 0.05;

static NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let increments = [
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
    let decrements = [
        "almost", "barely", "hardly", "kinda", "kindof", "kind-of", "less", "little",
        "marginal", "marginally", "occasional", "occasionally", "partly", "scarce", "scarcely",
        "slight", "slightly", "somewhat", "sorta", "sortof", "sort-of",
    ];
    increments
        .iter()
        .map(|w| (*w, B_INCR))
        .chain(decrements.iter().map(|w| (*w, B_DECR)))
        .collect()
});

static DEFAULT_ANALYZER: Lazy<Arc<SentimentAnalyzer>> =
    Lazy::new(|| Arc::new(SentimentAnalyzer::new(Lexicon::builtin())));

// ============================================================================
// Scores & Labels
// ============================================================================

/// VADER-style polarity breakdown of one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentScore {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl SentimentScore {
    pub fn neutral() -> Self {
        Self {
            neg: 0.0,
            neu: 1.0,
            pos: 0.0,
            compound: 0.0,
        }
    }

    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_compound(self.compound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Both threshold comparisons are exclusive: ±0.05 is neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if compound < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

// ============================================================================
// Lexicon
// ============================================================================

/// Token → mean valence table.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// The compact lexicon compiled into the binary.
    pub fn builtin() -> Self {
        Self::from_vader_text(BUILTIN_LEXICON).unwrap_or_default()
    }

    /// Parses the VADER lexicon format: `token<TAB>mean[<TAB>...]` per line.
    /// Extra columns (std-dev, raw ratings) are ignored.
    pub fn from_vader_text(text: &str) -> Result<Self, LexiconError> {
        let mut valences = HashMap::new();

        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut columns = line.split('\t');
            let token = columns.next().unwrap_or_default().trim();
            let raw = columns.next().unwrap_or_default().trim();
            let valence: f64 = raw.parse().map_err(|_| LexiconError::InvalidValence {
                line: idx + 1,
                value: raw.to_string(),
            })?;
            if !token.is_empty() {
                valences.insert(token.to_lowercase(), valence);
            }
        }

        if valences.is_empty() {
            return Err(LexiconError::Empty);
        }
        Ok(Self { valences })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_vader_text(&text)
    }

    pub fn valence(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

// ============================================================================
// Analyzer
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Process-wide analyzer over the built-in lexicon.
    pub fn shared() -> Arc<Self> {
        DEFAULT_ANALYZER.clone()
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn polarity_scores(&self, text: &str) -> SentimentScore {
        let tokens = tokenize(text);
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let cap_diff = has_cap_differential(&tokens);

        let mut sentiments = Vec::with_capacity(tokens.len());
        for i in 0..tokens.len() {
            let word = lowered[i].as_str();
            let kind_of = word == "kind" && lowered.get(i + 1).map(String::as_str) == Some("of");
            if BOOSTERS.contains_key(word) || kind_of {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence_at(&tokens, &lowered, i, cap_diff));
        }

        apply_but_weighting(&lowered, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn valence_at(&self, tokens: &[&str], lowered: &[String], i: usize, cap_diff: bool) -> f64 {
        let word = lowered[i].as_str();
        let Some(mut valence) = self.lexicon.valence(word) else {
            return 0.0;
        };

        // "no" directly qualifying a sentiment word carries no polarity itself
        if word == "no" && lowered.get(i + 1).is_some_and(|next| self.lexicon.contains(next)) {
            return 0.0;
        }
        let no_before = (i > 0 && lowered[i - 1] == "no")
            || (i > 1 && lowered[i - 2] == "no")
            || (i > 2 && lowered[i - 3] == "no" && matches!(lowered[i - 1].as_str(), "or" | "nor"));
        if no_before {
            valence *= N_SCALAR;
        }

        if cap_diff && is_all_caps(tokens[i]) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let prev = i - (start + 1);
            if self.lexicon.contains(&lowered[prev]) {
                continue;
            }
            let mut shift = booster_shift(tokens[prev], &lowered[prev], valence, cap_diff);
            if start == 1 {
                shift *= 0.95;
            } else if start == 2 {
                shift *= 0.9;
            }
            valence += shift;
            valence = negation_check(valence, lowered, start, i);
        }

        self.least_check(valence, lowered, i)
    }

    fn least_check(&self, valence: f64, lowered: &[String], i: usize) -> f64 {
        if i > 0 && lowered[i - 1] == "least" && !self.lexicon.contains("least") {
            let qualified = i > 1 && matches!(lowered[i - 2].as_str(), "at" | "very");
            if !qualified {
                return valence * N_SCALAR;
            }
        }
        valence
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

// ============================================================================
// Scoring Helpers
// ============================================================================

/// Whitespace tokens with surrounding punctuation stripped, unless stripping
/// leaves two characters or fewer (keeps emoticons like `:)`). Single
/// characters are dropped.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                token
            } else {
                stripped
            }
        })
        .filter(|token| token.chars().count() > 1)
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are written in capitals.
fn has_cap_differential(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

fn booster_shift(token: &str, lowered: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(&base) = BOOSTERS.get(lowered) else {
        return 0.0;
    };
    let mut scalar = if valence < 0.0 { -base } else { base };
    if cap_diff && is_all_caps(token) {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

fn is_emphatic(word: &str) -> bool {
    word == "so" || word == "this"
}

/// Looks `start + 1` tokens back from `i` for a negation. "never so/this"
/// intensifies instead, and "without doubt" is left alone.
fn negation_check(valence: f64, lowered: &[String], start: usize, i: usize) -> f64 {
    match start {
        0 => {
            if is_negation(&lowered[i - 1]) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        1 => {
            let (w2, w1) = (lowered[i - 2].as_str(), lowered[i - 1].as_str());
            if w2 == "never" && is_emphatic(w1) {
                valence * 1.25
            } else if w2 == "without" && w1 == "doubt" {
                valence
            } else if is_negation(w2) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        2 => {
            let (w3, w2, w1) = (
                lowered[i - 3].as_str(),
                lowered[i - 2].as_str(),
                lowered[i - 1].as_str(),
            );
            if w3 == "never" && (is_emphatic(w2) || is_emphatic(w1)) {
                valence * 1.25
            } else if w3 == "without" && (w2 == "doubt" || w1 == "doubt") {
                valence
            } else if is_negation(w3) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        _ => valence,
    }
}

/// Halves sentiment before the first "but" and boosts it after.
fn apply_but_weighting(lowered: &[String], sentiments: &mut [f64]) {
    let Some(but_idx) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, sentiment) in sentiments.iter_mut().enumerate() {
        if idx < but_idx {
            *sentiment *= 0.5;
        } else if idx > but_idx {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = match text.matches('?').count() {
        0 | 1 => 0.0,
        n @ 2..=3 => n as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + questions
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> SentimentScore {
    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0usize;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1;
        }
    }

    if pos_sum == 0.0 && neg_sum == 0.0 {
        return SentimentScore::neutral();
    }

    let emphasis = punctuation_emphasis(text);
    let mut total: f64 = sentiments.iter().sum();
    if total > 0.0 {
        total += emphasis;
    } else if total < 0.0 {
        total -= emphasis;
    }

    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let mass = pos_sum + neg_sum.abs() + neu_count as f64;
    SentimentScore {
        neg: (neg_sum / mass).abs(),
        neu: neu_count as f64 / mass,
        pos: (pos_sum / mass).abs(),
        compound: round_to(normalize(total), 4),
    }
}
