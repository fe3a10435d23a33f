//! Database schema SQL.

/// Name of the reviews table.
pub const REVIEWS_TABLE: &str = "reviews";

/// The `reviews` table. Column names match [`reviewlens_core::Review`].
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    review_id TEXT PRIMARY KEY,
    product_id TEXT,
    review_text TEXT,
    rating REAL,
    review_date TEXT,
    reviews_username TEXT,
    reviews_title TEXT,
    reviews_numhelpful INTEGER,
    reviews_dorecommend TEXT,
    brand TEXT,
    name TEXT,
    categories TEXT,
    primarycategories TEXT,
    review_len INTEGER,
    review_word_count INTEGER,
    clean_text TEXT,
    sentiment TEXT,
    keywords TEXT
);

CREATE INDEX IF NOT EXISTS idx_reviews_date ON reviews(review_date);
CREATE INDEX IF NOT EXISTS idx_reviews_product ON reviews(product_id);
"#;

/// Insert column order shared by `replace_reviews`.
pub const REVIEW_COLUMNS: [&str; 18] = [
    "review_id",
    "product_id",
    "review_text",
    "rating",
    "review_date",
    "reviews_username",
    "reviews_title",
    "reviews_numhelpful",
    "reviews_dorecommend",
    "brand",
    "name",
    "categories",
    "primarycategories",
    "review_len",
    "review_word_count",
    "clean_text",
    "sentiment",
    "keywords",
];
