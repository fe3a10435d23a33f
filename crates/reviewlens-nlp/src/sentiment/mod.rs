//! Three-way sentiment classification.
//!
//! Decision order for every call:
//! 1. empty or whitespace-only text is neutral;
//! 2. short acknowledgement phrases ("ok", "it's okay.", ...) are neutral;
//! 3. with a scorer, the compound score is banded, and a mildly positive
//!    score on text containing a dampening token ("ok", "fine", ...) is
//!    downgraded to neutral;
//! 4. without a scorer, or when the scorer fails for this input, a
//!    positive/negative word count decides.
//!
//! Classification never fails and only ever yields one of the three labels.

pub mod heuristic;
pub mod lexicon;
pub mod scorer;

use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use reviewlens_core::config::{DEFAULT_DAMPENING_CEILING, DEFAULT_NEUTRAL_BAND};
use reviewlens_core::{Error, NlpConfig, SentimentBackend};

use crate::clean::clean_text;
use crate::tokenize::Tokenizer;

pub use lexicon::LexiconScorer;
pub use scorer::SentimentScorer;

static NEUTRAL_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(it is okay|it's okay|it is ok|it's ok|okay|ok|fine)\.?\s*$")
        .expect("valid neutral phrase pattern")
});

static DAMPENING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(okay|ok|fine|alright)\b").expect("valid dampening pattern")
});

/// Sentiment label. Serialized as `"positive"`, `"neutral"`, `"negative"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(Error::Internal(format!("Unknown sentiment label: {}", other))),
        }
    }
}

/// Compound-score cut-offs.
///
/// Both values are empirical and uncalibrated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentThresholds {
    /// Scores in `[-neutral_band, neutral_band]` are neutral.
    pub neutral_band: f64,
    /// Positive scores below this become neutral when a dampening token is
    /// present.
    pub dampening_ceiling: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            neutral_band: DEFAULT_NEUTRAL_BAND,
            dampening_ceiling: DEFAULT_DAMPENING_CEILING,
        }
    }
}

impl From<&NlpConfig> for SentimentThresholds {
    fn from(config: &NlpConfig) -> Self {
        Self {
            neutral_band: config.neutral_band,
            dampening_ceiling: config.dampening_ceiling,
        }
    }
}

/// True for the fixed set of short neutral acknowledgements.
pub fn is_neutral_phrase(text: &str) -> bool {
    NEUTRAL_PHRASE_RE.is_match(text)
}

/// True if any dampening token occurs as a whole word.
pub fn contains_dampening_token(text: &str) -> bool {
    DAMPENING_RE.is_match(text)
}

/// Classifier over an optional compound scorer with a word-count fallback.
#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Option<Arc<dyn SentimentScorer>>,
    tokenizer: Arc<Tokenizer>,
    thresholds: SentimentThresholds,
}

impl SentimentClassifier {
    pub fn new(
        scorer: Option<Arc<dyn SentimentScorer>>,
        tokenizer: Arc<Tokenizer>,
        thresholds: SentimentThresholds,
    ) -> Self {
        Self {
            scorer,
            tokenizer,
            thresholds,
        }
    }

    /// Heuristic-only classifier with default thresholds.
    pub fn heuristic(tokenizer: Arc<Tokenizer>) -> Self {
        Self::new(None, tokenizer, SentimentThresholds::default())
    }

    pub fn backend(&self) -> SentimentBackend {
        if self.scorer.is_some() {
            SentimentBackend::Lexicon
        } else {
            SentimentBackend::Heuristic
        }
    }

    pub fn classify(&self, text: Option<&str>) -> SentimentLabel {
        let text = match text.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return SentimentLabel::Neutral,
        };

        if is_neutral_phrase(text) {
            return SentimentLabel::Neutral;
        }

        if let Some(scorer) = &self.scorer {
            match scorer.compound(text) {
                Ok(score) if score.is_finite() => return self.label_for_score(text, score),
                Ok(score) => debug!("{} scorer returned {}, using heuristic", scorer.name(), score),
                Err(e) => debug!("{} scorer failed, using heuristic: {}", scorer.name(), e),
            }
        }

        self.classify_heuristic(text)
    }

    /// Band a compound score, applying the dampening rule.
    pub fn label_for_score(&self, text: &str, score: f64) -> SentimentLabel {
        let band = self.thresholds.neutral_band;
        if (-band..=band).contains(&score) {
            SentimentLabel::Neutral
        } else if score > band {
            if contains_dampening_token(text) && score < self.thresholds.dampening_ceiling {
                SentimentLabel::Neutral
            } else {
                SentimentLabel::Positive
            }
        } else {
            SentimentLabel::Negative
        }
    }

    fn classify_heuristic(&self, text: &str) -> SentimentLabel {
        let tokens = self.tokenizer.tokenize(&clean_text(text));
        heuristic::classify_tokens(&tokens)
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("scorer", &self.scorer.as_ref().map(|s| s.name().to_string()))
            .field("thresholds", &self.thresholds)
            .finish()
    }
}
