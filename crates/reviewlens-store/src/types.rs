//! Query and aggregate types.

use serde::{Deserialize, Serialize};

/// Largest page the store will return.
pub const MAX_PAGE_SIZE: i64 = 5000;
/// Page size when the caller gives none.
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// Products listed in [`ReviewStats::top_products`].
pub const TOP_PRODUCTS: usize = 10;

/// A page request, already clamped to valid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewQuery {
    pub limit: i64,
    pub offset: i64,
}

impl ReviewQuery {
    /// Clamp `limit` into `[1, MAX_PAGE_SIZE]` and `offset` to `>= 0`.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            offset: offset.max(0),
        }
    }
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 0)
    }
}

/// The columns returned by a page listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub review_id: Option<String>,
    pub product_id: Option<String>,
    pub review_date: Option<String>,
    pub rating: Option<f64>,
    pub sentiment: Option<String>,
    pub keywords: Option<String>,
    pub review_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCount {
    pub product_id: String,
    pub count: i64,
}

/// Aggregate statistics over the whole table.
///
/// Percentages are in `[0, 100]`; all zero for an empty table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total: i64,
    pub avg_rating: Option<f64>,
    pub pct_pos: f64,
    pub pct_neu: f64,
    pub pct_neg: f64,
    /// Most reviewed products, highest count first.
    pub top_products: Vec<ProductCount>,
}

impl ReviewStats {
    pub fn empty() -> Self {
        Self {
            total: 0,
            avg_rating: None,
            pct_pos: 0.0,
            pct_neu: 0.0,
            pct_neg: 0.0,
            top_products: Vec::new(),
        }
    }
}
