//! Processed CSV output.

use std::path::{Path, PathBuf};

use tracing::info;

use reviewlens_core::{Error, Result, Review};
use reviewlens_store::schema::REVIEW_COLUMNS;

/// Write reviews to `out_path` with a header row, creating parent
/// directories. An empty slice still produces the header.
pub fn save_processed(reviews: &[Review], out_path: &Path) -> Result<PathBuf> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(out_path)
        .map_err(|e| Error::Csv(e.to_string()))?;
    writer
        .write_record(REVIEW_COLUMNS)
        .map_err(|e| Error::Csv(e.to_string()))?;
    for review in reviews {
        writer
            .serialize(review)
            .map_err(|e| Error::Csv(e.to_string()))?;
    }
    writer.flush()?;

    info!("Saved {} rows to {}", reviews.len(), out_path.display());
    Ok(out_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_header_and_rows() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("processed/reviews.csv");
        let reviews = vec![Review {
            review_id: Some("r1".into()),
            review_text: Some("Nice, \"really\" nice".into()),
            rating: Some(4.0),
            sentiment: Some("positive".into()),
            keywords: Some("nice".into()),
            ..Default::default()
        }];
        save_processed(&reviews, &out).unwrap();

        let mut reader = csv::Reader::from_path(&out).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, REVIEW_COLUMNS.to_vec());
        let back: Vec<Review> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(back, reviews);
    }

    #[test]
    fn test_empty_still_has_header() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("empty.csv");
        save_processed(&[], &out).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.starts_with("review_id,product_id,review_text"));
        assert_eq!(content.lines().count(), 1);
    }
}
