//! ReviewLens Store: SQLite `reviews` table, statistics and CSV export.

pub mod discover;
pub mod export;
pub mod schema;
pub mod sqlite;
pub mod types;

pub use discover::{find_databases, DatabaseFile, DATABASE_FILE_NAME};
pub use export::{export_for_dashboard, EXPORT_COLUMNS};
pub use sqlite::ReviewStore;
pub use types::*;
