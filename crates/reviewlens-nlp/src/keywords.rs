//! Frequency-ranked keyword extraction.

use std::collections::HashMap;

/// Separator between keywords in a keyword string.
pub const KEYWORD_SEPARATOR: &str = ",";

/// Token frequencies ordered by descending count; equal counts keep the
/// order in which each token first appeared.
pub fn keyword_counts(tokens: &[String]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for token in tokens {
        match index.get(token.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token.as_str(), counts.len());
                counts.push((token.clone(), 1));
            }
        }
    }
    // sort_by is stable, so ties stay in first-occurrence order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The `n` most frequent tokens joined by [`KEYWORD_SEPARATOR`].
pub fn join_top(tokens: &[String], n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    keyword_counts(tokens)
        .into_iter()
        .take(n)
        .map(|(token, _)| token)
        .collect::<Vec<_>>()
        .join(KEYWORD_SEPARATOR)
}
