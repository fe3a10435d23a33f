//! Linguistic capability detection results and tier classification.
//!
//! The NLP engine checks its optional resources once at startup and records
//! which strategy is active for each stage. Every classification call reads
//! this value; nothing re-checks per call.

use serde::{Deserialize, Serialize};

/// Word tokenizer strategy in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerBackend {
    /// Unicode word-boundary segmentation (`corpus` feature).
    Unicode,
    /// `[A-Za-z]+` pattern extraction.
    Regex,
}

/// Origin of the active stopword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwordSource {
    /// Full English list from the stopword corpus.
    Corpus,
    /// Small built-in list of function words.
    Builtin,
}

/// Sentiment strategy in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBackend {
    /// Compound score from a valence lexicon file.
    Lexicon,
    /// Positive/negative word count heuristic.
    Heuristic,
}

/// Summary tier derived from the active strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityTier {
    /// Every stage runs its self-contained fallback.
    Fallback,
    /// Some resource-backed strategies are active.
    Partial,
    /// All resource-backed strategies are active.
    Full,
}

impl std::fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fallback => write!(f, "fallback"),
            Self::Partial => write!(f, "partial"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Strategies selected for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub tokenizer: TokenizerBackend,
    pub stopwords: StopwordSource,
    pub sentiment: SentimentBackend,
}

impl Capabilities {
    /// All stages on their fallback strategies.
    pub fn fallback() -> Self {
        Self {
            tokenizer: TokenizerBackend::Regex,
            stopwords: StopwordSource::Builtin,
            sentiment: SentimentBackend::Heuristic,
        }
    }

    /// Number of stages running a resource-backed strategy.
    pub fn resource_backed(&self) -> usize {
        [
            self.tokenizer == TokenizerBackend::Unicode,
            self.stopwords == StopwordSource::Corpus,
            self.sentiment == SentimentBackend::Lexicon,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn tier(&self) -> CapabilityTier {
        match self.resource_backed() {
            0 => CapabilityTier::Fallback,
            3 => CapabilityTier::Full,
            _ => CapabilityTier::Partial,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_classification() {
        assert_eq!(Capabilities::fallback().tier(), CapabilityTier::Fallback);

        let partial = Capabilities {
            sentiment: SentimentBackend::Lexicon,
            ..Capabilities::fallback()
        };
        assert_eq!(partial.tier(), CapabilityTier::Partial);

        let full = Capabilities {
            tokenizer: TokenizerBackend::Unicode,
            stopwords: StopwordSource::Corpus,
            sentiment: SentimentBackend::Lexicon,
        };
        assert_eq!(full.tier(), CapabilityTier::Full);
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_value(Capabilities::fallback()).unwrap();
        assert_eq!(json["tokenizer"], "regex");
        assert_eq!(json["stopwords"], "builtin");
        assert_eq!(json["sentiment"], "heuristic");
        assert_eq!(CapabilityTier::Partial.to_string(), "partial");
    }
}
