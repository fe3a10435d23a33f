//! Dashboard export and CSV download routes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::error;

use crate::state::AppState;
use reviewlens_store::export_for_dashboard;

/// Routes nested under `/api`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/export", get(run_export))
}

/// Routes mounted at the root.
pub fn download_routes() -> Router<Arc<AppState>> {
    Router::new().route("/download/export", get(download_export))
}

#[derive(Debug, Deserialize)]
struct ExportParams {
    db: Option<String>,
    out: Option<String>,
}

/// GET /api/export?db=&out=: regenerate the dashboard CSV.
async fn run_export(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> Response {
    let db = state.db_path(params.db.as_deref());
    let out = state.export_path(params.out.as_deref());

    match export_for_dashboard(&db, &out) {
        Ok((path, rows)) => Json(serde_json::json!({
            "path": display_relative(&path),
            "rows": rows,
        }))
        .into_response(),
        Err(e) => {
            error!("Export failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /download/export: serve the export CSV as an attachment.
async fn download_export(State(state): State<Arc<AppState>>) -> Response {
    let requested = &state.config.data_paths.export_csv;
    let candidates = export_candidates(requested);

    let Some(found) = candidates.iter().find(|p| p.is_file()) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "file_not_found",
                "requested": requested.display().to_string(),
                "checked_paths": candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            })),
        )
            .into_response();
    };

    match tokio::fs::read(found).await {
        Ok(bytes) => {
            let filename = found
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("export.csv");
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to read {}: {}", found.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Places a relative export path may live: the working directory, the
/// binary's directory and its parent. Absolute paths are used as-is.
fn export_candidates(requested: &Path) -> Vec<PathBuf> {
    if requested.is_absolute() {
        return vec![requested.to_path_buf()];
    }

    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(requested));
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(requested));
        candidates.push(exe_dir.join("..").join(requested));
    }

    let mut unique = Vec::new();
    for c in candidates {
        if !unique.contains(&c) {
            unique.push(c);
        }
    }
    unique
}

/// Path relative to the working directory when it lies beneath it.
fn display_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
