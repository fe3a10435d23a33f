//! Review listing and aggregate statistics routes.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::error;

use crate::state::AppState;
use reviewlens_core::Error;
use reviewlens_store::{ReviewQuery, ReviewStore, DEFAULT_PAGE_SIZE};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/reviews", get(get_reviews))
}

#[derive(Debug, Deserialize)]
struct StatsParams {
    db: Option<String>,
}

/// Kept as strings so a non-integer is a 400 with our own message.
#[derive(Debug, Deserialize)]
struct ReviewsParams {
    limit: Option<String>,
    offset: Option<String>,
    db: Option<String>,
}

fn parse_int(value: Option<&str>, default: i64) -> Option<i64> {
    match value {
        None => Some(default),
        Some(v) => v.trim().parse().ok(),
    }
}

/// Map a store error to the API's JSON error body.
pub(crate) fn store_error(db: &Path, err: Error) -> Response {
    match err {
        Error::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "db_not_found",
                "path": db.display().to_string(),
            })),
        )
            .into_response(),
        other => {
            error!("Error querying reviews in {}: {}", db.display(), other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "db_query_failed",
                    "detail": other.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/stats?db=: totals, average rating, sentiment shares, top products.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> Response {
    let db = state.db_path(params.db.as_deref());
    match ReviewStore::open_existing(&db).and_then(|store| store.stats()) {
        Ok(stats) => Json(serde_json::json!(stats)).into_response(),
        Err(e) => store_error(&db, e),
    }
}

/// GET /api/reviews?limit=&offset=&db=: one page, newest first.
async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReviewsParams>,
) -> Response {
    let (Some(limit), Some(offset)) = (
        parse_int(params.limit.as_deref(), DEFAULT_PAGE_SIZE),
        parse_int(params.offset.as_deref(), 0),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "limit and offset must be integers" })),
        )
            .into_response();
    };
    let query = ReviewQuery::new(limit, offset);

    let db = state.db_path(params.db.as_deref());
    let page = ReviewStore::open_existing(&db).and_then(|store| {
        let total = store.count_reviews()?;
        let rows = store.list_reviews(query)?;
        Ok((total, rows))
    });

    match page {
        Ok((total, rows)) => {
            Json(serde_json::json!({ "total": total, "rows": rows })).into_response()
        }
        Err(e) => store_error(&db, e),
    }
}
