//! Markup and punctuation stripping.
//!
//! The tag pattern is a heuristic, not an HTML parser: nested or malformed
//! tags are not handled.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid tag pattern"));
static NON_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z\s]").expect("valid letter pattern"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space pattern"));

/// Lowercase letters separated by single spaces.
///
/// Tags are replaced by a space, every non-letter character is replaced by a
/// space, whitespace runs collapse to one space and the ends are trimmed.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s = TAG_RE.replace_all(text, " ");
    let s = NON_LETTER_RE.replace_all(&s, " ");
    let s = WHITESPACE_RE.replace_all(&s, " ");
    s.trim().to_ascii_lowercase()
}

/// Absent text cleans to the empty string.
pub fn clean_raw(text: Option<&str>) -> String {
    text.map(clean_text).unwrap_or_default()
}

/// String form of a JSON value; `null` is empty. Non-string input to the
/// cleaner is coerced through this.
pub(crate) fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
