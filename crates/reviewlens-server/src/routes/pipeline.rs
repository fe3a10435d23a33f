//! Pipeline trigger and job status routes.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, info};

use crate::state::{AppState, JobStatus, PipelineJob};
use reviewlens_ingest::PipelineOptions;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/run", post(run_pipeline))
        .route("/jobs", get(get_jobs))
        .route("/jobs/{job_id}", get(get_job))
}

/// Optional body of `POST /api/run`. Every field has a default.
#[derive(Debug, Default, Deserialize)]
struct RunRequest {
    nrows: Option<usize>,
    out: Option<String>,
    to_db: Option<bool>,
    db: Option<String>,
    raw: Option<String>,
}

impl RunRequest {
    /// Missing, empty or malformed bodies mean "all defaults".
    fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        serde_json::from_slice(body).unwrap_or_else(|e| {
            debug!("Ignoring unparseable run body: {}", e);
            Self::default()
        })
    }
}

/// POST /api/run: queue a pipeline run and return immediately.
async fn run_pipeline(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let req = RunRequest::from_body(&body);
    let paths = &state.config.data_paths;

    let options = PipelineOptions {
        source: req.raw.map(PathBuf::from).unwrap_or_else(|| paths.raw_csv.clone()),
        out: req
            .out
            .map(PathBuf::from)
            .unwrap_or_else(|| paths.processed_csv.clone()),
        to_db: req.to_db.unwrap_or(true),
        db_path: state.db_path(req.db.as_deref()),
        nrows: req.nrows,
    };

    let job_id = state.enqueue_pipeline(options);
    info!("Queued pipeline job {}", job_id);

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "started", "job_id": job_id })),
    )
}

/// GET /api/jobs: all known jobs, newest first.
async fn get_jobs(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let jobs = state.jobs.read();
    let mut all_jobs: Vec<&PipelineJob> = jobs.values().collect();
    all_jobs.sort_by(|a, b| b.queued_at.cmp(&a.queued_at));

    let running = all_jobs
        .iter()
        .filter(|j| j.status == JobStatus::Running)
        .count();

    Json(serde_json::json!({
        "jobs": all_jobs,
        "total": all_jobs.len(),
        "running": running,
    }))
}

/// GET /api/jobs/{job_id}
async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let jobs = state.jobs.read();
    match jobs.get(&job_id) {
        Some(job) => (StatusCode::OK, Json(serde_json::json!(job))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Job not found" })),
        ),
    }
}
