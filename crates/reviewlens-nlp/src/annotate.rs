//! Record-level annotation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use reviewlens_core::Review;

use crate::clean::value_text;
use crate::sentiment::SentimentLabel;

/// Attribute written with the cleaned text.
pub const CLEAN_TEXT_FIELD: &str = "clean_text";
/// Attribute written with the sentiment label.
pub const SENTIMENT_FIELD: &str = "sentiment";
/// Attribute written with the keyword string.
pub const KEYWORDS_FIELD: &str = "keywords";
/// Source attribute when the caller names none.
pub const DEFAULT_TEXT_FIELD: &str = "review_text";

/// Derived fields for one text. Always produced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub clean_text: String,
    pub sentiment: SentimentLabel,
    pub keywords: String,
}

/// A generic record: attribute name to JSON value.
pub type Record = serde_json::Map<String, Value>;

/// A record type the pipeline can read text from and attach annotations to.
pub trait Annotatable {
    /// Text of the named attribute, or `None` if the record lacks it.
    fn field_text(&self, field: &str) -> Option<String>;

    fn apply(&mut self, annotation: Annotation);
}

impl Annotatable for Record {
    fn field_text(&self, field: &str) -> Option<String> {
        self.get(field).map(value_text)
    }

    fn apply(&mut self, annotation: Annotation) {
        self.insert(
            CLEAN_TEXT_FIELD.to_string(),
            Value::String(annotation.clean_text),
        );
        self.insert(
            SENTIMENT_FIELD.to_string(),
            Value::String(annotation.sentiment.to_string()),
        );
        self.insert(
            KEYWORDS_FIELD.to_string(),
            Value::String(annotation.keywords),
        );
    }
}

impl Annotatable for Review {
    fn field_text(&self, field: &str) -> Option<String> {
        self.field(field)
    }

    fn apply(&mut self, annotation: Annotation) {
        self.clean_text = Some(annotation.clean_text);
        self.sentiment = Some(annotation.sentiment.to_string());
        self.keywords = Some(annotation.keywords);
    }
}
