//! SQLite-backed review store.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info};

use crate::schema::{REVIEWS_TABLE, REVIEW_COLUMNS, SCHEMA_SQL};
use crate::types::*;
use reviewlens_core::{Error, Result, Review};

/// The `reviews` table behind a single serialized connection.
pub struct ReviewStore {
    conn: Mutex<Connection>,
}

impl ReviewStore {
    /// Open or create the database file, creating parent directories and
    /// the schema as needed.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }

        let conn = Self::create_connection(&db_path, OpenFlags::default())?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        info!(
            "ReviewStore initialized: {} reviews, path={}",
            store.count_reviews()?,
            db_path.display()
        );
        Ok(store)
    }

    /// Open a database that must already exist and already hold the
    /// `reviews` table, for reading only. The file is never modified.
    pub fn open_existing(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if !db_path.is_file() {
            return Err(Error::NotFound(format!(
                "Database not found: {}",
                db_path.display()
            )));
        }
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(db_path, flags)
            .map_err(|e| Error::Database(e.to_string()))?;

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![REVIEWS_TABLE],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        if tables == 0 {
            return Err(Error::NotFound(format!(
                "Table '{}' not found in DB: {}",
                REVIEWS_TABLE,
                db_path.display()
            )));
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn create_connection(db_path: &Path, flags: OpenFlags) -> Result<Connection> {
        let conn = Connection::open_with_flags(db_path, flags)
            .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    /// Replace the table contents with `reviews` in one transaction.
    /// Returns the number of rows written.
    pub fn replace_reviews(&self, reviews: &[Review]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;

        tx.execute(&format!("DELETE FROM {}", REVIEWS_TABLE), [])
            .map_err(|e| Error::Database(e.to_string()))?;

        let placeholders = (1..=REVIEW_COLUMNS.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
            REVIEWS_TABLE,
            REVIEW_COLUMNS.join(", "),
            placeholders
        );

        let mut written = 0;
        {
            let mut stmt = tx
                .prepare(&sql)
                .map_err(|e| Error::Database(e.to_string()))?;
            for r in reviews {
                written += stmt
                    .execute(params![
                        r.review_id,
                        r.product_id,
                        r.review_text,
                        r.rating,
                        r.review_date,
                        r.reviews_username,
                        r.reviews_title,
                        r.reviews_numhelpful,
                        r.reviews_dorecommend,
                        r.brand,
                        r.name,
                        r.categories,
                        r.primarycategories,
                        r.review_len,
                        r.review_word_count,
                        r.clean_text,
                        r.sentiment,
                        r.keywords,
                    ])
                    .map_err(|e| Error::Database(e.to_string()))?;
            }
        }

        tx.commit().map_err(|e| Error::Database(e.to_string()))?;
        info!("Replaced reviews table with {} rows", written);
        Ok(written)
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    pub fn count_reviews(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// One page of reviews, newest first. Rows without a date sort last.
    pub fn list_reviews(&self, query: ReviewQuery) -> Result<Vec<ReviewRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT review_id, product_id, review_date, rating, sentiment, keywords, review_text
                 FROM reviews
                 ORDER BY review_date DESC
                 LIMIT ?1 OFFSET ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![query.limit, query.offset], |row| {
                Ok(ReviewRow {
                    review_id: row.get("review_id")?,
                    product_id: row.get("product_id")?,
                    review_date: row.get("review_date")?,
                    rating: row.get("rating")?,
                    sentiment: row.get("sentiment")?,
                    keywords: row.get("keywords")?,
                    review_text: row.get("review_text")?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!(
            "Listed {} reviews (limit={}, offset={})",
            rows.len(),
            query.limit,
            query.offset
        );
        Ok(rows)
    }

    pub fn stats(&self) -> Result<ReviewStats> {
        let conn = self.conn.lock();
        let (total, avg_rating, pos, neu, neg): (i64, Option<f64>, i64, i64, i64) = conn
            .query_row(
                "SELECT COUNT(*),
                        AVG(rating),
                        COALESCE(SUM(CASE WHEN sentiment = 'positive' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN sentiment = 'neutral' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN sentiment = 'negative' THEN 1 ELSE 0 END), 0)
                 FROM reviews",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        if total == 0 {
            return Ok(ReviewStats::empty());
        }

        let mut stmt = conn
            .prepare_cached(
                "SELECT product_id, COUNT(*) AS n
                 FROM reviews
                 WHERE product_id IS NOT NULL
                 GROUP BY product_id
                 ORDER BY n DESC, product_id ASC
                 LIMIT ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let top_products = stmt
            .query_map(params![TOP_PRODUCTS as i64], |row| {
                Ok(ProductCount {
                    product_id: row.get(0)?,
                    count: row.get(1)?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Database(e.to_string()))?;

        let pct = |n: i64| n as f64 * 100.0 / total as f64;
        Ok(ReviewStats {
            total,
            avg_rating,
            pct_pos: pct(pos),
            pct_neu: pct(neu),
            pct_neg: pct(neg),
            top_products,
        })
    }
}
