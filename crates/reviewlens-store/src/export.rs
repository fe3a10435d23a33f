//! Dashboard CSV export.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use tracing::info;

use crate::schema::REVIEWS_TABLE;
use reviewlens_core::{Error, Result};

/// Preferred export columns, in output order. Columns the table lacks are
/// skipped.
pub const EXPORT_COLUMNS: [&str; 12] = [
    "review_id",
    "product_id",
    "review_date",
    "rating",
    "sentiment",
    "keywords",
    "review_len",
    "review_word_count",
    "reviews_username",
    "reviews_title",
    "brand",
    "categories",
];

const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write the `reviews` table of `db_path` to `out_path` as CSV.
///
/// Returns the output path and the number of data rows. The database is
/// opened read-only; a missing file or table is [`Error::NotFound`].
pub fn export_for_dashboard(db_path: &Path, out_path: &Path) -> Result<(PathBuf, usize)> {
    if !db_path.is_file() {
        return Err(Error::NotFound(format!(
            "Database not found: {}",
            db_path.display()
        )));
    }
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| Error::Database(e.to_string()))?;

    let columns = table_columns(&conn)?;
    if columns.is_empty() {
        return Err(Error::NotFound(format!(
            "Table '{}' not found in DB: {}",
            REVIEWS_TABLE,
            db_path.display()
        )));
    }

    let mut selected: Vec<String> = EXPORT_COLUMNS
        .iter()
        .filter(|c| columns.iter().any(|existing| existing == *c))
        .map(|c| c.to_string())
        .collect();
    if selected.is_empty() {
        selected = columns;
    }

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(out_path).map_err(|e| Error::Csv(e.to_string()))?;
    writer
        .write_record(&selected)
        .map_err(|e| Error::Csv(e.to_string()))?;

    let quoted: Vec<String> = selected.iter().map(|c| format!("\"{}\"", c)).collect();
    let sql = format!("SELECT {} FROM {}", quoted.join(", "), REVIEWS_TABLE);
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::Database(e.to_string()))?;
    let mut rows = stmt.query([]).map_err(|e| Error::Database(e.to_string()))?;

    let mut count = 0;
    while let Some(row) = rows.next().map_err(|e| Error::Database(e.to_string()))? {
        let mut record = Vec::with_capacity(selected.len());
        for (i, column) in selected.iter().enumerate() {
            let value: Value = row.get(i).map_err(|e| Error::Database(e.to_string()))?;
            let cell = if column == "review_date" {
                format_export_date(&value)
            } else {
                value_to_cell(&value)
            };
            record.push(cell);
        }
        writer
            .write_record(&record)
            .map_err(|e| Error::Csv(e.to_string()))?;
        count += 1;
    }
    writer.flush()?;

    info!("Exported {} reviews to {}", count, out_path.display());
    Ok((out_path.to_path_buf(), count))
}

fn table_columns(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", REVIEWS_TABLE))
        .map_err(|e| Error::Database(e.to_string()))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .map_err(|e| Error::Database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(columns)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => format!("{:?}", f),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

/// Stored dates reformatted as `YYYY-MM-DD HH:MM:SS`; unparseable dates
/// are written empty.
fn format_export_date(value: &Value) -> String {
    let Value::Text(raw) = value else {
        return String::new();
    };
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc().format(EXPORT_DATE_FORMAT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, EXPORT_DATE_FORMAT) {
        return dt.format(EXPORT_DATE_FORMAT).to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d 00:00:00").to_string();
    }
    String::new()
}
