//! Word-count polarity used when no compound scorer is available.

use super::SentimentLabel;

pub const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "love",
    "excellent",
    "awesome",
    "perfect",
    "best",
    "nice",
    "happy",
    "recommended",
    "recommend",
    "amazing",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "poor",
    "disappointed",
    "hate",
    "problem",
    "broken",
    "worse",
    "worst",
    "disappointing",
];

/// Counts occurrences of positive and negative words.
pub fn polarity_counts(tokens: &[String]) -> (usize, usize) {
    tokens.iter().fold((0, 0), |(pos, neg), t| {
        if POSITIVE_WORDS.contains(&t.as_str()) {
            (pos + 1, neg)
        } else if NEGATIVE_WORDS.contains(&t.as_str()) {
            (pos, neg + 1)
        } else {
            (pos, neg)
        }
    })
}

/// Equal counts, including zero each, are neutral.
pub fn classify_tokens(tokens: &[String]) -> SentimentLabel {
    let (pos, neg) = polarity_counts(tokens);
    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => SentimentLabel::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_counts() {
        assert_eq!(polarity_counts(&toks("good good bad")), (2, 1));
        assert_eq!(polarity_counts(&toks("battery screen")), (0, 0));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_tokens(&toks("i love this product")), SentimentLabel::Positive);
        assert_eq!(classify_tokens(&toks("this is terrible")), SentimentLabel::Negative);
        assert_eq!(classify_tokens(&toks("good but broken")), SentimentLabel::Neutral);
        assert_eq!(classify_tokens(&[]), SentimentLabel::Neutral);
    }

    #[test]
    fn test_lexicons_are_disjoint() {
        for w in POSITIVE_WORDS {
            assert!(!NEGATIVE_WORDS.contains(w));
        }
    }
}
