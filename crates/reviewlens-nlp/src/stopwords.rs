//! Stopword sets.
//!
//! The set is chosen once at startup and never changes for the lifetime of
//! the engine that owns it.

use std::collections::HashSet;

use reviewlens_core::StopwordSource;

/// Function words used when no stopword corpus is available.
pub const BUILTIN_STOPWORDS: &[&str] = &[
    "the", "and", "is", "in", "it", "of", "to", "a", "i", "this", "that", "for", "on", "with",
    "an", "are", "was", "be",
];

/// Immutable set of lowercase stopwords.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
    source: StopwordSource,
}

impl StopwordSet {
    pub fn builtin() -> Self {
        Self::from_words(BUILTIN_STOPWORDS.iter().copied(), StopwordSource::Builtin)
    }

    /// English list from the `stop-words` corpus. `None` if the list is empty.
    #[cfg(feature = "corpus")]
    pub fn corpus() -> Option<Self> {
        let words: Vec<String> = stop_words::get(stop_words::LANGUAGE::English)
            .iter()
            .map(|s| s.to_string())
            .collect();
        if words.is_empty() {
            return None;
        }
        Some(Self::from_words(words, StopwordSource::Corpus))
    }

    pub fn from_words<I, S>(words: I, source: StopwordSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            source,
        }
    }

    pub fn source(&self) -> StopwordSource {
        self.source
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Drop stopwords, preserving order and duplicates.
    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| !self.contains(t)).collect()
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set() {
        let set = StopwordSet::builtin();
        assert_eq!(set.source(), StopwordSource::Builtin);
        assert_eq!(set.len(), BUILTIN_STOPWORDS.len());
        for w in ["this", "is", "a", "the"] {
            assert!(set.contains(w));
        }
        assert!(!set.contains("battery"));
    }

    #[test]
    fn test_filter_keeps_order() {
        let set = StopwordSet::builtin();
        let tokens = ["the", "screen", "is", "bright", "the", "screen"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(set.filter(tokens), vec!["screen", "bright", "screen"]);
    }

    #[test]
    fn test_from_words_normalizes() {
        let set = StopwordSet::from_words([" The ", "AND", ""], StopwordSource::Builtin);
        assert_eq!(set.len(), 2);
        assert!(set.contains("the"));
        assert!(set.contains("and"));
    }

    #[cfg(feature = "corpus")]
    #[test]
    fn test_corpus_is_superset_of_common_words() {
        let set = StopwordSet::corpus().expect("english list bundled");
        assert_eq!(set.source(), StopwordSource::Corpus);
        for w in ["the", "and", "is", "this", "a"] {
            assert!(set.contains(w));
        }
        assert!(set.len() > BUILTIN_STOPWORDS.len());
    }
}
