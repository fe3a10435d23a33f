//! Raw CSV loading.

use std::path::Path;

use tracing::info;

use reviewlens_core::{Error, Result};

/// A CSV file as normalized headers plus string cells.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// empty cells and long rows truncated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of every column with this (normalized) name, in header order.
    pub fn column_indices(&self, name: &str) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_str() == name)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Lowercase snake-case form of a header: trimmed, with spaces, dots and
/// dashes turned into underscores.
pub fn normalize_colname(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace([' ', '.', '-'], "_")
}

/// Read a CSV file, keeping at most `nrows` data rows. A file without a
/// header row is an [`Error::Ingest`].
pub fn extract(path: &Path, nrows: Option<usize>) -> Result<RawTable> {
    if !path.is_file() {
        return Err(Error::NotFound(format!("Source CSV not found: {}", path.display())));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::Csv(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Csv(e.to_string()))?
        .iter()
        .map(normalize_colname)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(Error::Ingest(format!(
            "Source CSV has no header row: {}",
            path.display()
        )));
    }

    let limit = nrows.unwrap_or(usize::MAX);
    let mut rows = Vec::new();
    for record in reader.records().take(limit) {
        let record = record.map_err(|e| Error::Csv(e.to_string()))?;
        rows.push(record.iter().map(String::from).collect());
    }

    let table = RawTable::new(headers, rows);
    info!(
        "Extracted {} rows and {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}
