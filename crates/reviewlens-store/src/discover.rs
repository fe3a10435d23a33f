//! Locate review databases under a directory tree.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use tracing::debug;

/// Default database file name searched for.
pub const DATABASE_FILE_NAME: &str = "reviews.db";

/// A database file and its row count, or why it could not be counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseFile {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Recursively find files named `file_name` (case-insensitive) under
/// `root`, sorted by path. Unreadable directories are skipped.
pub fn find_databases(root: &Path, file_name: &str) -> Vec<DatabaseFile> {
    let wanted = file_name.to_lowercase();
    let mut found = Vec::new();
    walk(root, &wanted, &mut found);
    found.sort();
    found
        .into_iter()
        .map(|path| match count_rows(&path) {
            Ok(rows) => DatabaseFile {
                path,
                rows: Some(rows),
                error: None,
            },
            Err(e) => DatabaseFile {
                path,
                rows: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

fn walk(dir: &Path, wanted: &str, found: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            walk(&path, wanted, found);
        } else if file_type.is_file()
            && entry.file_name().to_string_lossy().to_lowercase() == wanted
        {
            found.push(path);
        }
    }
}

fn count_rows(path: &Path) -> rusqlite::Result<i64> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
}
