//! ReviewLens NLP: cleaning, tokenization, sentiment and keyword annotation.
//!
//! Every stage has a resource-backed strategy and a self-contained fallback.
//! [`NlpEngine::detect`] chooses once per process; the chosen
//! [`Capabilities`](reviewlens_core::Capabilities) are reported, never
//! re-checked.
//!
//! The free functions below run on the process-wide engine from [`shared`].

pub mod annotate;
pub mod clean;
pub mod engine;
pub mod keywords;
pub mod sentiment;
pub mod stopwords;
pub mod tokenize;

pub use annotate::{Annotatable, Annotation, Record, DEFAULT_TEXT_FIELD};
pub use clean::{clean_raw, clean_text};
pub use engine::{init_shared, shared, NlpEngine};
pub use keywords::keyword_counts;
pub use sentiment::{
    LexiconScorer, SentimentClassifier, SentimentLabel, SentimentScorer, SentimentThresholds,
};
pub use stopwords::StopwordSet;
pub use tokenize::{Tokenizer, WordTokenizer};

/// Tokenize with the shared engine and drop its active stopwords.
pub fn tokenize_and_remove_stopwords(text: &str) -> Vec<String> {
    shared().tokenize(text)
}

/// Classify with the shared engine.
pub fn sentiment_classify(text: Option<&str>) -> SentimentLabel {
    shared().classify(text)
}

/// Top `n` keywords with the shared engine.
pub fn top_keywords(text: &str, n: usize) -> String {
    shared().top_keywords(text, n)
}

/// Annotate records with the shared engine.
pub fn annotate<R: Annotatable + Clone>(records: &[R], text_field: &str) -> Vec<R> {
    shared().annotate(records, text_field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewlens_core::{config::LEXICON_FILE, NlpConfig, SentimentBackend};
    use std::path::Path;

    fn install_bundled() {
        init_shared(&NlpConfig {
            lexicon_path: Some(
                Path::new(env!("CARGO_MANIFEST_DIR"))
                    .join("../../resources")
                    .join(LEXICON_FILE),
            ),
            ..NlpConfig::default()
        });
    }

    #[test]
    fn test_free_functions() {
        install_bundled();
        assert_eq!(clean_text("<p>Hello World! 123</p>"), "hello world");
        assert_eq!(sentiment_classify(Some("This is terrible.")), SentimentLabel::Negative);
        assert_eq!(sentiment_classify(None), SentimentLabel::Neutral);
        assert_eq!(
            top_keywords("apple banana apple orange banana apple", 2),
            "apple,banana"
        );
        let tokens = tokenize_and_remove_stopwords("This is a simple test sentence.");
        assert!(!tokens.contains(&"this".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
    }

    #[test]
    fn test_free_functions_use_lexicon() {
        install_bundled();
        assert_eq!(shared().capabilities().sentiment, SentimentBackend::Lexicon);
        assert_eq!(
            sentiment_classify(Some("Beautiful, superb screen")),
            SentimentLabel::Positive
        );
    }
}
