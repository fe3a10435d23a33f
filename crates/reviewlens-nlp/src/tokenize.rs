//! Word tokenization with a primary strategy and a pattern fallback.
//!
//! Both strategies yield lowercase `[a-z]+` tokens. They do not split
//! identically: the Unicode segmenter keeps contractions such as `it's` as a
//! single segment (then dropped as non-alphabetic) where the pattern
//! tokenizer yields `it` and `s`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use reviewlens_core::{Result, TokenizerBackend};

use crate::stopwords::StopwordSet;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("valid word pattern"));

/// A word tokenization strategy.
pub trait WordTokenizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn backend(&self) -> TokenizerBackend;

    /// Split text into lowercase alphabetic tokens.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

/// Maximal runs of ASCII letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

impl WordTokenizer for RegexTokenizer {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn backend(&self) -> TokenizerBackend {
        TokenizerBackend::Regex
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(WORD_RE
            .find_iter(text)
            .map(|m| m.as_str().to_ascii_lowercase())
            .collect())
    }
}

/// UAX #29 word segmentation, keeping purely alphabetic ASCII segments.
#[cfg(feature = "corpus")]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

#[cfg(feature = "corpus")]
impl WordTokenizer for UnicodeWordTokenizer {
    fn name(&self) -> &'static str {
        "unicode-words"
    }

    fn backend(&self) -> TokenizerBackend {
        TokenizerBackend::Unicode
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        use unicode_segmentation::UnicodeSegmentation;

        Ok(text
            .split_word_bounds()
            .filter(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphabetic()))
            .map(|seg| seg.to_ascii_lowercase())
            .collect())
    }
}

/// Tokenizer with per-call fallback: when the primary strategy fails for an
/// input, that input is tokenized by the pattern strategy instead.
pub struct Tokenizer {
    primary: Option<Box<dyn WordTokenizer>>,
    fallback: RegexTokenizer,
}

impl Tokenizer {
    /// Pattern tokenizer only.
    pub fn fallback() -> Self {
        Self {
            primary: None,
            fallback: RegexTokenizer,
        }
    }

    pub fn with_primary(primary: Box<dyn WordTokenizer>) -> Self {
        Self {
            primary: Some(primary),
            fallback: RegexTokenizer,
        }
    }

    #[cfg(feature = "corpus")]
    pub fn unicode() -> Self {
        Self::with_primary(Box::new(UnicodeWordTokenizer))
    }

    /// Strategy used when the primary does not fail.
    pub fn backend(&self) -> TokenizerBackend {
        self.primary
            .as_ref()
            .map(|p| p.backend())
            .unwrap_or(TokenizerBackend::Regex)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if let Some(primary) = &self.primary {
            match primary.tokenize(text) {
                Ok(tokens) => return tokens,
                Err(e) => debug!("{} tokenizer failed, using regex: {}", primary.name(), e),
            }
        }
        self.fallback.tokenize(text).unwrap_or_default()
    }

    /// Tokenize and drop every token in `stopwords`.
    pub fn tokenize_filtered(&self, text: &str, stopwords: &StopwordSet) -> Vec<String> {
        stopwords.filter(self.tokenize(text))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::fallback()
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("primary", &self.primary.as_ref().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewlens_core::Error;

    struct FailingTokenizer;

    impl WordTokenizer for FailingTokenizer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn backend(&self) -> TokenizerBackend {
            TokenizerBackend::Unicode
        }

        fn tokenize(&self, _text: &str) -> Result<Vec<String>> {
            Err(Error::Resource("tokenizer data missing".into()))
        }
    }

    fn is_word(token: &str) -> bool {
        !token.is_empty() && token.chars().all(|c| c.is_ascii_lowercase())
    }

    #[test]
    fn test_regex_tokenizer() {
        let tokens = Tokenizer::fallback().tokenize("Hello, World! It's 2024.");
        assert_eq!(tokens, vec!["hello", "world", "it", "s"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(Tokenizer::fallback().tokenize("").is_empty());
        assert!(Tokenizer::fallback().tokenize("123 !!").is_empty());
    }

    #[test]
    fn test_primary_failure_uses_fallback() {
        let tokenizer = Tokenizer::with_primary(Box::new(FailingTokenizer));
        assert_eq!(tokenizer.backend(), TokenizerBackend::Unicode);
        assert_eq!(tokenizer.tokenize("Simple TEST"), vec!["simple", "test"]);
    }

    #[test]
    fn test_filtered_removes_stopwords() {
        let stop = StopwordSet::builtin();
        let tokens =
            Tokenizer::fallback().tokenize_filtered("This is a simple test sentence.", &stop);
        assert_eq!(tokens, vec!["simple", "test", "sentence"]);
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let tokens = Tokenizer::fallback().tokenize("b a b c a b");
        assert_eq!(tokens, vec!["b", "a", "b", "c", "a", "b"]);
    }

    #[cfg(feature = "corpus")]
    #[test]
    fn test_unicode_tokenizer_contract() {
        let tokenizer = Tokenizer::unicode();
        assert_eq!(tokenizer.backend(), TokenizerBackend::Unicode);
        let tokens = tokenizer.tokenize("Great phone, terrible case. Café 42 it's");
        assert!(tokens.iter().all(|t| is_word(t)));
        assert!(tokens.contains(&"great".to_string()));
        assert!(tokens.contains(&"terrible".to_string()));
        assert!(!tokens.contains(&"42".to_string()));
    }

    #[test]
    fn test_output_contract() {
        let tokens = Tokenizer::default().tokenize("MiXeD-case_words and 9 numbers… ÜBER");
        assert!(tokens.iter().all(|t| is_word(t)));
    }
}
