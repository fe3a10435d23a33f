//! ReviewLens Ingest: raw CSV → cleaned reviews → annotated CSV / database.

pub mod extract;
pub mod pipeline;
pub mod save;
pub mod transform;

pub use extract::{extract, normalize_colname, RawTable};
pub use pipeline::{run_pipeline, PipelineOptions, PipelineReport};
pub use save::save_processed;
pub use transform::{extract_first_asin, parse_review_date, transform, ColumnMap, Field};
