use reviewlens_core::Result;

/// Produces a compound polarity score in `[-1, 1]` for a text.
///
/// Implementations may fail for a particular input; the classifier then
/// falls back to the word-count heuristic for that input only.
pub trait SentimentScorer: Send + Sync {
    fn name(&self) -> &str;

    fn compound(&self, text: &str) -> Result<f64>;
}
