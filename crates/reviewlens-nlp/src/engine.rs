//! The NLP engine: resource detection plus the annotation entry points.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use reviewlens_core::{Capabilities, NlpConfig};

use crate::annotate::{Annotatable, Annotation};
use crate::clean::{clean_raw, clean_text};
use crate::keywords::join_top;
use crate::sentiment::{
    LexiconScorer, SentimentClassifier, SentimentLabel, SentimentScorer, SentimentThresholds,
};
use crate::stopwords::StopwordSet;
use crate::tokenize::Tokenizer;

static SHARED: OnceCell<NlpEngine> = OnceCell::new();

/// Cleaner, tokenizer, stopwords, classifier and keyword count, selected
/// once and immutable afterwards.
#[derive(Clone)]
pub struct NlpEngine {
    capabilities: Capabilities,
    tokenizer: Arc<Tokenizer>,
    stopwords: StopwordSet,
    classifier: SentimentClassifier,
    keyword_count: usize,
}

impl NlpEngine {
    /// Check optional resources and pick a strategy per stage.
    ///
    /// Each unavailable resource produces one warning here and is never
    /// checked again.
    pub fn detect(config: &NlpConfig) -> Self {
        if config.force_fallback {
            info!("NLP fallback forced by configuration");
            return Self::with_config_fallback(config);
        }

        let tokenizer = Arc::new(detect_tokenizer());
        let stopwords = detect_stopwords();
        let scorer = config.lexicon_path.as_deref().and_then(detect_scorer);
        if config.lexicon_path.is_none() {
            warn!("No sentiment lexicon configured. Using word-count sentiment.");
        }

        let classifier = SentimentClassifier::new(
            scorer,
            Arc::clone(&tokenizer),
            SentimentThresholds::from(config),
        );
        let engine = Self::from_parts(tokenizer, stopwords, classifier, config.keyword_count);
        info!(
            "NLP engine ready (tier={}, tokenizer={:?}, stopwords={:?}, sentiment={:?})",
            engine.capabilities.tier(),
            engine.capabilities.tokenizer,
            engine.capabilities.stopwords,
            engine.capabilities.sentiment,
        );
        engine
    }

    /// Every stage on its self-contained fallback, default thresholds.
    pub fn fallback() -> Self {
        Self::with_config_fallback(&NlpConfig::fallback_only())
    }

    fn with_config_fallback(config: &NlpConfig) -> Self {
        let tokenizer = Arc::new(Tokenizer::fallback());
        let classifier = SentimentClassifier::new(
            None,
            Arc::clone(&tokenizer),
            SentimentThresholds::from(config),
        );
        Self::from_parts(tokenizer, StopwordSet::builtin(), classifier, config.keyword_count)
    }

    pub fn from_parts(
        tokenizer: Arc<Tokenizer>,
        stopwords: StopwordSet,
        classifier: SentimentClassifier,
        keyword_count: usize,
    ) -> Self {
        let capabilities = Capabilities {
            tokenizer: tokenizer.backend(),
            stopwords: stopwords.source(),
            sentiment: classifier.backend(),
        };
        Self {
            capabilities,
            tokenizer,
            stopwords,
            classifier,
            keyword_count,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn keyword_count(&self) -> usize {
        self.keyword_count
    }

    pub fn clean(&self, text: &str) -> String {
        clean_text(text)
    }

    /// Tokens with active stopwords removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize_filtered(text, &self.stopwords)
    }

    pub fn classify(&self, text: Option<&str>) -> SentimentLabel {
        self.classifier.classify(text)
    }

    pub fn top_keywords(&self, text: &str, n: usize) -> String {
        if text.is_empty() || n == 0 {
            return String::new();
        }
        join_top(&self.tokenize(&clean_text(text)), n)
    }

    /// Annotation for one raw text. Sentiment reads the raw text so the
    /// scorer sees punctuation and case; keywords come from the cleaned text.
    pub fn annotate_text(&self, text: Option<&str>) -> Annotation {
        let clean = clean_raw(text);
        let keywords = if self.keyword_count == 0 {
            String::new()
        } else {
            join_top(&self.tokenize(&clean), self.keyword_count)
        };
        Annotation {
            sentiment: self.classify(text),
            clean_text: clean,
            keywords,
        }
    }

    /// Annotated copies of `records`; the input is left untouched. A record
    /// without `text_field` is annotated as empty text.
    pub fn annotate<R>(&self, records: &[R], text_field: &str) -> Vec<R>
    where
        R: Annotatable + Clone,
    {
        let annotated: Vec<R> = records
            .iter()
            .map(|record| {
                let text = record.field_text(text_field);
                let mut out = record.clone();
                out.apply(self.annotate_text(text.as_deref()));
                out
            })
            .collect();
        debug!("Annotated {} records from '{}'", annotated.len(), text_field);
        annotated
    }
}

impl std::fmt::Debug for NlpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlpEngine")
            .field("capabilities", &self.capabilities)
            .field("keyword_count", &self.keyword_count)
            .finish()
    }
}

/// Install the process-wide engine. The first call wins; later calls return
/// the engine already installed.
pub fn init_shared(config: &NlpConfig) -> &'static NlpEngine {
    SHARED.get_or_init(|| NlpEngine::detect(config))
}

/// The process-wide engine. Without a prior [`init_shared`] it is detected
/// from [`NlpConfig::default`], which looks for the bundled lexicon relative
/// to the working directory.
pub fn shared() -> &'static NlpEngine {
    SHARED.get_or_init(|| NlpEngine::detect(&NlpConfig::default()))
}

fn detect_tokenizer() -> Tokenizer {
    #[cfg(feature = "corpus")]
    {
        Tokenizer::unicode()
    }

    #[cfg(not(feature = "corpus"))]
    {
        warn!("Unicode segmentation unavailable (corpus feature disabled). Using regex tokenizer.");
        Tokenizer::fallback()
    }
}

fn detect_stopwords() -> StopwordSet {
    #[cfg(feature = "corpus")]
    {
        if let Some(set) = StopwordSet::corpus() {
            return set;
        }
        warn!("Stopword corpus is empty. Using built-in stopwords.");
    }

    #[cfg(not(feature = "corpus"))]
    {
        warn!("Stopword corpus unavailable (corpus feature disabled). Using built-in stopwords.");
    }

    StopwordSet::builtin()
}

fn detect_scorer(path: &Path) -> Option<Arc<dyn SentimentScorer>> {
    match LexiconScorer::load(path) {
        Ok(scorer) => Some(Arc::new(scorer)),
        Err(e) => {
            warn!("{}. Falling back to word-count sentiment.", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::Record;
    use reviewlens_core::{Review, SentimentBackend, StopwordSource, TokenizerBackend};
    use serde_json::json;

    fn bundled_lexicon() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../resources")
            .join(reviewlens_core::config::LEXICON_FILE)
    }

    fn bundled_config() -> NlpConfig {
        NlpConfig {
            lexicon_path: Some(bundled_lexicon()),
            ..NlpConfig::default()
        }
    }

    fn engines() -> Vec<NlpEngine> {
        vec![
            NlpEngine::fallback(),
            NlpEngine::detect(&NlpConfig {
                lexicon_path: None,
                ..NlpConfig::default()
            }),
            NlpEngine::detect(&bundled_config()),
        ]
    }

    #[test]
    fn test_fallback_capabilities() {
        let engine = NlpEngine::fallback();
        assert_eq!(engine.capabilities(), Capabilities::fallback());
    }

    #[test]
    fn test_forced_fallback_ignores_lexicon() {
        let engine = NlpEngine::detect(&NlpConfig {
            lexicon_path: Some(bundled_lexicon()),
            ..NlpConfig::fallback_only()
        });
        assert_eq!(engine.capabilities().sentiment, SentimentBackend::Heuristic);
        assert_eq!(engine.capabilities().tokenizer, TokenizerBackend::Regex);
    }

    #[test]
    fn test_missing_lexicon_degrades() {
        let tmp = tempfile::TempDir::new().unwrap();
        let engine = NlpEngine::detect(&NlpConfig {
            lexicon_path: Some(tmp.path().join("nope.txt")),
            ..NlpConfig::default()
        });
        assert_eq!(engine.capabilities().sentiment, SentimentBackend::Heuristic);
        assert_eq!(engine.classify(Some("I love this product!")), SentimentLabel::Positive);
    }

    #[test]
    fn test_lexicon_detected() {
        let engine = NlpEngine::detect(&NlpConfig {
            lexicon_path: Some(bundled_lexicon()),
            ..NlpConfig::default()
        });
        assert_eq!(engine.capabilities().sentiment, SentimentBackend::Lexicon);
    }

    #[cfg(feature = "corpus")]
    #[test]
    fn test_corpus_detected() {
        let engine = NlpEngine::detect(&NlpConfig::default());
        assert_eq!(engine.capabilities().tokenizer, TokenizerBackend::Unicode);
        assert_eq!(engine.capabilities().stopwords, StopwordSource::Corpus);
    }

    #[cfg(not(feature = "corpus"))]
    #[test]
    fn test_without_corpus_uses_builtin() {
        let engine = NlpEngine::detect(&NlpConfig::default());
        assert_eq!(engine.capabilities().tokenizer, TokenizerBackend::Regex);
        assert_eq!(engine.capabilities().stopwords, StopwordSource::Builtin);
    }

    #[test]
    fn test_sentiment_fixtures_on_every_engine() {
        for engine in engines() {
            let caps = engine.capabilities();
            assert_eq!(
                engine.classify(Some("I love this product!")),
                SentimentLabel::Positive,
                "{:?}",
                caps
            );
            assert_eq!(
                engine.classify(Some("This is terrible.")),
                SentimentLabel::Negative,
                "{:?}",
                caps
            );
            assert_eq!(
                engine.classify(Some("It is okay.")),
                SentimentLabel::Neutral,
                "{:?}",
                caps
            );
            assert_eq!(engine.classify(Some("")), SentimentLabel::Neutral);
            assert_eq!(engine.classify(None), SentimentLabel::Neutral);
        }
    }

    #[test]
    fn test_keyword_fixture_on_every_engine() {
        for engine in engines() {
            assert_eq!(
                engine.top_keywords("apple banana apple orange banana apple", 2),
                "apple,banana"
            );
            assert_eq!(engine.top_keywords("apple banana", 0), "");
            assert_eq!(engine.top_keywords("", 3), "");
        }
    }

    #[test]
    fn test_fallback_tokenize_removes_stopwords() {
        let engine = NlpEngine::fallback();
        assert_eq!(
            engine.tokenize("This is a simple test sentence."),
            vec!["simple", "test", "sentence"]
        );
    }

    #[test]
    fn test_tokens_never_contain_stopwords() {
        for engine in engines() {
            let tokens = engine.tokenize("This is a simple test sentence.");
            for stop in ["this", "is", "a"] {
                assert!(!tokens.contains(&stop.to_string()));
            }
        }
    }

    #[test]
    fn test_keywords_are_subset_of_tokens() {
        let text = "<b>Battery</b> life is great, battery charges fast. Screen is great!";
        for engine in engines() {
            let tokens = engine.tokenize(&clean_text(text));
            let keywords = engine.top_keywords(text, 5);
            let parts: Vec<&str> = keywords.split(',').collect();
            assert!(parts.len() <= 5);
            assert!(!keywords.contains(' '));
            for part in &parts {
                assert!(tokens.iter().any(|t| t == part));
            }
            let mut seen = std::collections::HashSet::new();
            assert!(parts.iter().all(|p| seen.insert(*p)));
        }
    }

    #[test]
    fn test_annotate_records() {
        let engine = NlpEngine::fallback();
        let mut first = Record::new();
        first.insert("review_text".into(), json!("I love this product!"));
        let mut second = Record::new();
        second.insert("title".into(), json!("no text column"));
        let records = vec![first, second];

        let out = engine.annotate(&records, "review_text");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["sentiment"], json!("positive"));
        assert_eq!(out[0]["clean_text"], json!("i love this product"));
        assert_eq!(out[0]["keywords"], json!("love,product"));
        assert_eq!(out[1]["sentiment"], json!("neutral"));
        assert_eq!(out[1]["clean_text"], json!(""));
        assert_eq!(out[1]["keywords"], json!(""));

        // inputs untouched
        assert!(!records[0].contains_key("sentiment"));
        assert!(!records[1].contains_key("clean_text"));
    }

    #[test]
    fn test_annotate_reviews() {
        let engine = NlpEngine::fallback();
        let reviews = vec![Review {
            review_text: Some("<p>Terrible battery, terrible screen.</p>".into()),
            ..Default::default()
        }];
        let out = engine.annotate(&reviews, "review_text");
        assert_eq!(out[0].sentiment.as_deref(), Some("negative"));
        assert_eq!(out[0].keywords.as_deref(), Some("terrible,battery,screen"));
        assert!(reviews[0].sentiment.is_none());
    }

    #[test]
    fn test_output_well_formed_on_every_engine() {
        let long = "great battery, awful screen ".repeat(4_000);
        let inputs = [
            "",
            "!!!",
            "!!!!????",
            "but",
            "n't",
            "not",
            "<i>Déjà vu</i> 100%",
            "GOOD good Good",
            "THIS IS THE WORST PRODUCT EVER!!!",
            "ok",
            "\u{1F600}\u{1F44D} love it \u{1F525}",
            "  \t\n  ",
            long.as_str(),
        ];
        for engine in engines() {
            let caps = engine.capabilities();
            for text in inputs {
                let a = engine.annotate_text(Some(text));
                assert!(
                    a.clean_text.chars().all(|c| c.is_ascii_lowercase() || c == ' '),
                    "{:?}",
                    caps
                );
                assert!(!a.clean_text.starts_with(' ') && !a.clean_text.ends_with(' '));
                assert!(!a.clean_text.contains("  "));
                assert!(SentimentLabel::ALL.contains(&a.sentiment), "{:?}", caps);
                assert!(!a.keywords.contains(' '));
                assert!(a.keywords.split(',').count() <= engine.keyword_count());
            }
        }
    }

    #[test]
    fn test_shared_engine_is_stable() {
        let a = init_shared(&bundled_config()) as *const NlpEngine;
        let b = shared() as *const NlpEngine;
        let c = init_shared(&NlpConfig::fallback_only()) as *const NlpEngine;
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_shared_engine_uses_lexicon() {
        let engine = init_shared(&bundled_config());
        assert_eq!(engine.capabilities().sentiment, SentimentBackend::Lexicon);
        assert_eq!(shared().capabilities(), engine.capabilities());
    }

    #[test]
    fn test_default_config_finds_bundled_lexicon_from_workspace_root() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let relative = NlpConfig::default().lexicon_path.unwrap();
        assert!(relative.is_relative());
        let engine = NlpEngine::detect(&NlpConfig {
            lexicon_path: Some(root.join(relative)),
            ..NlpConfig::default()
        });
        assert_eq!(engine.capabilities().sentiment, SentimentBackend::Lexicon);
    }
}
