//! End-to-end run: extract → transform → annotate → save → load.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use reviewlens_core::{Capabilities, Result};
use reviewlens_nlp::{NlpEngine, DEFAULT_TEXT_FIELD};
use reviewlens_store::ReviewStore;

use crate::extract::extract;
use crate::save::save_processed;
use crate::transform::transform;

/// Options for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Raw CSV to read.
    pub source: PathBuf,
    /// Processed CSV to write.
    pub out: PathBuf,
    /// Replace the database contents with the annotated reviews.
    pub to_db: bool,
    pub db_path: PathBuf,
    /// Read at most this many data rows.
    pub nrows: Option<usize>,
}

/// What a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub extracted_rows: usize,
    pub reviews: usize,
    pub processed_csv: PathBuf,
    /// Rows written to the database, if loading was requested.
    pub db_rows: Option<usize>,
    pub capabilities: Capabilities,
}

/// Run the whole pipeline.
///
/// An unreadable source fails the run before anything is written. Per-record
/// text problems never fail it.
pub fn run_pipeline(options: &PipelineOptions, engine: &NlpEngine) -> Result<PipelineReport> {
    info!(
        "Pipeline started: source={}, out={}, to_db={}",
        options.source.display(),
        options.out.display(),
        options.to_db
    );

    let raw = extract(&options.source, options.nrows)?;
    let reviews = transform(&raw);
    let annotated = engine.annotate(&reviews, DEFAULT_TEXT_FIELD);

    let processed_csv = save_processed(&annotated, &options.out)?;

    let db_rows = if options.to_db {
        let store = ReviewStore::open(&options.db_path)?;
        Some(store.replace_reviews(&annotated)?)
    } else {
        None
    };

    info!(
        "Pipeline finished: {} raw rows, {} reviews, db_rows={:?}",
        raw.len(),
        annotated.len(),
        db_rows
    );

    Ok(PipelineReport {
        extracted_rows: raw.len(),
        reviews: annotated.len(),
        processed_csv,
        db_rows,
        capabilities: engine.capabilities(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewlens_core::Error;
    use reviewlens_store::ReviewQuery;
    use tempfile::TempDir;

    const RAW: &str = "\
id,asins,reviews.text,reviews.rating,reviews.date,reviews.username
r1,\"['B01','B02']\",I love this product!,5,2017-01-03T00:00:00.000Z,ann
r2,B02,This is terrible.,1,2018-02-01T00:00:00.000Z,bob
r3,B01,It is okay.,3,2016-05-05,cy
r4,B01,,4,2016-05-06,dee
r1,B01,Duplicate id,5,2017-01-03,ann
";

    fn options(tmp: &TempDir, to_db: bool) -> PipelineOptions {
        let source = tmp.path().join("raw/reviews.csv");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, RAW).unwrap();
        PipelineOptions {
            source,
            out: tmp.path().join("processed/out.csv"),
            to_db,
            db_path: tmp.path().join("db/reviews.db"),
            nrows: None,
        }
    }

    #[test]
    fn test_run_to_db() {
        let tmp = TempDir::new().unwrap();
        let opts = options(&tmp, true);
        let report = run_pipeline(&opts, &NlpEngine::fallback()).unwrap();
        assert_eq!(report.extracted_rows, 5);
        assert_eq!(report.reviews, 3);
        assert_eq!(report.db_rows, Some(3));
        assert!(report.processed_csv.exists());

        let store = ReviewStore::open_existing(&opts.db_path).unwrap();
        let rows = store.list_reviews(ReviewQuery::default()).unwrap();
        let labels: Vec<_> = rows
            .iter()
            .map(|r| (r.review_id.clone().unwrap(), r.sentiment.clone().unwrap()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("r2".to_string(), "negative".to_string()),
                ("r1".to_string(), "positive".to_string()),
                ("r3".to_string(), "neutral".to_string()),
            ]
        );
        assert_eq!(rows[1].product_id.as_deref(), Some("B01"));
        assert_eq!(rows[1].keywords.as_deref(), Some("love,product"));
    }

    #[test]
    fn test_run_without_db() {
        let tmp = TempDir::new().unwrap();
        let opts = PipelineOptions {
            nrows: Some(2),
            ..options(&tmp, false)
        };
        let report = run_pipeline(&opts, &NlpEngine::fallback()).unwrap();
        assert_eq!(report.extracted_rows, 2);
        assert_eq!(report.db_rows, None);
        assert!(!opts.db_path.exists());
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let opts = PipelineOptions {
            source: tmp.path().join("nope.csv"),
            ..options(&tmp, true)
        };
        let err = run_pipeline(&opts, &NlpEngine::fallback()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(!opts.out.exists());
        assert!(!opts.db_path.exists());
    }
}
