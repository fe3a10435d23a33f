//! Raw table → cleaned, typed, de-duplicated reviews.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use reviewlens_core::Review;

use crate::extract::RawTable;

/// A canonical review attribute fed from one or more source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ReviewId,
    ProductId,
    ReviewText,
    Rating,
    ReviewDate,
    Title,
    Username,
    NumHelpful,
    DoRecommend,
    Brand,
    Name,
    Categories,
    PrimaryCategories,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::ReviewId,
        Field::ProductId,
        Field::ReviewText,
        Field::Rating,
        Field::ReviewDate,
        Field::Title,
        Field::Username,
        Field::NumHelpful,
        Field::DoRecommend,
        Field::Brand,
        Field::Name,
        Field::Categories,
        Field::PrimaryCategories,
    ];

    /// Normalized source column names, highest priority first.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Field::ReviewId => &["reviews_id", "review_id", "id"],
            Field::ProductId => &["asins", "product_id"],
            Field::ReviewText => &["reviews_text", "review_text"],
            Field::Rating => &["reviews_rating", "rating"],
            Field::ReviewDate => &["reviews_date", "review_date", "reviews_dateadded"],
            Field::Title => &["reviews_title"],
            Field::Username => &["reviews_username"],
            Field::NumHelpful => &["reviews_numhelpful"],
            Field::DoRecommend => &["reviews_dorecommend"],
            Field::Brand => &["brand"],
            Field::Name => &["name"],
            Field::Categories => &["categories"],
            Field::PrimaryCategories => &["primarycategories"],
        }
    }
}

/// Source column indices per canonical field, resolved once per table.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: Vec<(Field, Vec<usize>)>,
}

impl ColumnMap {
    pub fn resolve(table: &RawTable) -> Self {
        let columns = Field::ALL
            .iter()
            .map(|field| {
                let indices: Vec<usize> = field
                    .candidates()
                    .iter()
                    .flat_map(|name| table.column_indices(name))
                    .collect();
                (*field, indices)
            })
            .filter(|(_, indices)| !indices.is_empty())
            .collect();
        Self { columns }
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns.iter().any(|(f, _)| *f == field)
    }

    /// First non-empty cell among the field's source columns.
    pub fn value<'a>(&self, field: Field, row: &'a [String]) -> Option<&'a str> {
        let (_, indices) = self.columns.iter().find(|(f, _)| *f == field)?;
        indices
            .iter()
            .filter_map(|&i| row.get(i))
            .map(|cell| cell.trim())
            .find(|cell| !cell.is_empty())
    }
}

/// First product identifier from a list-like cell such as `['B01', 'B02']`
/// or `B01,B02`.
pub fn extract_first_asin(value: &str) -> Option<String> {
    const STRIP: &[char] = &[' ', '[', ']', '\'', '"'];

    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    let bracketed = (s.starts_with('[') && s.ends_with(']'))
        || (s.starts_with('(') && s.ends_with(')'));
    if bracketed && s.len() >= 2 {
        let inner = &s[1..s.len() - 1];
        if let Some(first) = inner.split(',').next() {
            let first = first.trim().trim_matches(STRIP);
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }

    let candidate = [',', '|', ';', ' ']
        .iter()
        .find(|sep| s.contains(**sep))
        .and_then(|sep| s.split(*sep).next())
        .unwrap_or(s);
    let candidate = candidate.trim_matches(STRIP);
    (!candidate.is_empty()).then(|| candidate.to_string())
}

/// Parse a review timestamp into UTC RFC 3339. Naive timestamps are taken
/// as UTC.
pub fn parse_review_date(value: &str) -> Option<String> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }
    let utc: DateTime<Utc> = if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        dt.with_timezone(&Utc)
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        dt.and_utc()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        dt.and_utc()
    } else if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        d.and_hms_opt(0, 0, 0)?.and_utc()
    } else {
        return None;
    };
    Some(utc.to_rfc3339_opts(SecondsFormat::Secs, false))
}

fn parse_rating(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

fn parse_count(value: &str) -> Option<i64> {
    let v = value.trim();
    v.parse::<i64>().ok().or_else(|| {
        v.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn has_useful_text(text: Option<&str>) -> bool {
    match text.map(str::trim) {
        Some(t) => !t.is_empty() && !t.eq_ignore_ascii_case("nan"),
        None => false,
    }
}

fn row_hash(review: &Review) -> String {
    let mut hasher = Sha256::new();
    // serde_json field order follows the struct, so equal rows hash equally
    hasher.update(serde_json::to_vec(review).unwrap_or_default());
    hex::encode(hasher.finalize())
}

/// Map, type and filter a raw table.
///
/// Rows without useful text are dropped when a text column exists.
/// Duplicates are removed by review id when the table has an id column
/// (rows lacking an id fall back to the whole-row hash), otherwise by the
/// whole-row hash. The first occurrence wins.
pub fn transform(table: &RawTable) -> Vec<Review> {
    let map = ColumnMap::resolve(table);
    let has_text = map.has(Field::ReviewText);
    let has_ids = map.has(Field::ReviewId);

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_hashes: HashSet<String> = HashSet::new();
    let mut reviews = Vec::with_capacity(table.len());
    let mut dropped_text = 0usize;
    let mut dropped_dup = 0usize;

    for row in &table.rows {
        let text = map.value(Field::ReviewText, row);
        if has_text && !has_useful_text(text) {
            dropped_text += 1;
            continue;
        }

        let owned = |field| map.value(field, row).map(String::from);
        let review = Review {
            review_id: owned(Field::ReviewId),
            product_id: map.value(Field::ProductId, row).and_then(extract_first_asin),
            review_text: text.map(String::from),
            rating: map.value(Field::Rating, row).and_then(parse_rating),
            review_date: map.value(Field::ReviewDate, row).and_then(parse_review_date),
            reviews_username: owned(Field::Username),
            reviews_title: owned(Field::Title),
            reviews_numhelpful: map.value(Field::NumHelpful, row).and_then(parse_count),
            reviews_dorecommend: owned(Field::DoRecommend),
            brand: owned(Field::Brand),
            name: owned(Field::Name),
            categories: owned(Field::Categories),
            primarycategories: owned(Field::PrimaryCategories),
            review_len: text.map(|t| t.chars().count() as i64),
            review_word_count: text.map(|t| t.split_whitespace().count() as i64),
            ..Default::default()
        };

        let fresh = match (&review.review_id, has_ids) {
            (Some(id), true) => seen_ids.insert(id.clone()),
            _ => seen_hashes.insert(row_hash(&review)),
        };
        if !fresh {
            dropped_dup += 1;
            continue;
        }
        reviews.push(review);
    }

    debug!(
        "Dropped {} rows without text and {} duplicates",
        dropped_text, dropped_dup
    );
    info!("Transformed {} rows into {} reviews", table.len(), reviews.len());
    reviews
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_extract_first_asin() {
        assert_eq!(
            extract_first_asin("['B01AHB9CN2', 'B00VINDBJK']").as_deref(),
            Some("B01AHB9CN2")
        );
        assert_eq!(extract_first_asin("B00QJDU3KY,B005PB2T0S").as_deref(), Some("B00QJDU3KY"));
        assert_eq!(extract_first_asin("B01|B02").as_deref(), Some("B01"));
        assert_eq!(extract_first_asin("B01; B02").as_deref(), Some("B01"));
        assert_eq!(extract_first_asin(" \"B0X\" ").as_deref(), Some("B0X"));
        assert_eq!(extract_first_asin("[]"), None);
        assert_eq!(extract_first_asin(""), None);
    }

    #[test]
    fn test_parse_review_date() {
        assert_eq!(
            parse_review_date("2017-01-03T00:00:00.000Z").as_deref(),
            Some("2017-01-03T00:00:00+00:00")
        );
        assert_eq!(
            parse_review_date("2017-01-03T10:00:00+02:00").as_deref(),
            Some("2017-01-03T08:00:00+00:00")
        );
        assert_eq!(
            parse_review_date("2017-01-03 05:06:07").as_deref(),
            Some("2017-01-03T05:06:07+00:00")
        );
        assert_eq!(parse_review_date("2017-01-03").as_deref(), Some("2017-01-03T00:00:00+00:00"));
        assert_eq!(parse_review_date("yesterday"), None);
    }

    #[test]
    fn test_numeric_parsing() {
        assert_eq!(parse_rating("4.0"), Some(4.0));
        assert_eq!(parse_rating("five"), None);
        assert_eq!(parse_rating("NaN"), None);
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count("3.0"), Some(3));
        assert_eq!(parse_count("3.5"), None);
    }

    #[test]
    fn test_transform_maps_and_derives() {
        let t = table(
            &["id", "asins", "reviews_text", "reviews_rating", "reviews_date", "brand"],
            &[&[
                "r1",
                "['B01', 'B02']",
                "Great  tablet for kids",
                "5",
                "2017-01-03T00:00:00.000Z",
                "Amazon",
            ]],
        );
        let reviews = transform(&t);
        assert_eq!(reviews.len(), 1);
        let r = &reviews[0];
        assert_eq!(r.review_id.as_deref(), Some("r1"));
        assert_eq!(r.product_id.as_deref(), Some("B01"));
        assert_eq!(r.rating, Some(5.0));
        assert_eq!(r.review_date.as_deref(), Some("2017-01-03T00:00:00+00:00"));
        assert_eq!(r.review_len, Some(22));
        assert_eq!(r.review_word_count, Some(4));
        assert_eq!(r.brand.as_deref(), Some("Amazon"));
        assert!(r.sentiment.is_none());
    }

    #[test]
    fn test_coalesces_candidate_columns() {
        let t = table(
            &["reviews_date", "reviews_dateadded", "reviews_text"],
            &[
                &["", "2018-05-01T00:00:00Z", "first"],
                &["2016-01-01T00:00:00Z", "2018-05-01T00:00:00Z", "second"],
            ],
        );
        let reviews = transform(&t);
        assert_eq!(reviews[0].review_date.as_deref(), Some("2018-05-01T00:00:00+00:00"));
        assert_eq!(reviews[1].review_date.as_deref(), Some("2016-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_drops_rows_without_text() {
        let t = table(
            &["reviews_id", "reviews_text"],
            &[&["a", "ok product"], &["b", ""], &["c", "   "], &["d", "nan"], &["e", "NaN"]],
        );
        let ids: Vec<_> = transform(&t).into_iter().filter_map(|r| r.review_id).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_dedup_by_id_keeps_first() {
        let t = table(
            &["reviews_id", "reviews_text"],
            &[&["a", "first"], &["a", "second"], &["b", "third"]],
        );
        let reviews = transform(&t);
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].review_text.as_deref(), Some("first"));
    }

    #[test]
    fn test_dedup_by_row_without_ids() {
        let t = table(
            &["reviews_text", "reviews_rating"],
            &[&["same", "5"], &["same", "5"], &["same", "4"]],
        );
        assert_eq!(transform(&t).len(), 2);
    }

    #[test]
    fn test_missing_text_column_keeps_rows() {
        let t = table(&["reviews_id", "brand"], &[&["a", "X"], &["b", "Y"]]);
        let reviews = transform(&t);
        assert_eq!(reviews.len(), 2);
        assert!(reviews[0].review_text.is_none());
        assert!(reviews[0].review_len.is_none());
    }
}
