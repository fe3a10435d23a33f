//! The product review row shared by ETL, storage and the API.

use serde::{Deserialize, Serialize};

/// One cleaned product review, optionally annotated.
///
/// Field names match the `reviews` table columns and the processed CSV
/// header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: Option<String>,
    pub product_id: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<f64>,
    /// UTC timestamp, RFC 3339.
    pub review_date: Option<String>,
    pub reviews_username: Option<String>,
    pub reviews_title: Option<String>,
    pub reviews_numhelpful: Option<i64>,
    pub reviews_dorecommend: Option<String>,
    pub brand: Option<String>,
    pub name: Option<String>,
    pub categories: Option<String>,
    pub primarycategories: Option<String>,
    pub review_len: Option<i64>,
    pub review_word_count: Option<i64>,
    pub clean_text: Option<String>,
    pub sentiment: Option<String>,
    pub keywords: Option<String>,
}

impl Review {
    /// Look up a textual attribute by column name.
    ///
    /// Numeric columns are rendered with their display form so any column
    /// can feed the annotation pipeline.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "review_id" => self.review_id.clone(),
            "product_id" => self.product_id.clone(),
            "review_text" => self.review_text.clone(),
            "rating" => self.rating.map(|r| r.to_string()),
            "review_date" => self.review_date.clone(),
            "reviews_username" => self.reviews_username.clone(),
            "reviews_title" => self.reviews_title.clone(),
            "reviews_numhelpful" => self.reviews_numhelpful.map(|n| n.to_string()),
            "reviews_dorecommend" => self.reviews_dorecommend.clone(),
            "brand" => self.brand.clone(),
            "name" => self.name.clone(),
            "categories" => self.categories.clone(),
            "primarycategories" => self.primarycategories.clone(),
            "review_len" => self.review_len.map(|n| n.to_string()),
            "review_word_count" => self.review_word_count.map(|n| n.to_string()),
            "clean_text" => self.clean_text.clone(),
            "sentiment" => self.sentiment.clone(),
            "keywords" => self.keywords.clone(),
            _ => None,
        }
    }
}
