//! Background pipeline queue. Jobs run one at a time off the async runtime.

use std::sync::Arc;

use tracing::{error, info};

use crate::state::{now_millis, AppState, JobStatus, PipelineRequest};
use reviewlens_ingest::run_pipeline;

/// Finished jobs kept for status queries.
const MAX_FINISHED_JOBS: usize = 100;

/// Start the background pipeline worker task.
pub fn start_pipeline_worker(state: Arc<AppState>) {
    let mut rx = match state.take_job_rx() {
        Some(rx) => rx,
        None => {
            error!("Pipeline worker already started");
            return;
        }
    };

    tokio::spawn(async move {
        info!("Background pipeline worker started");
        while let Some(request) = rx.recv().await {
            process_pipeline_job(&state, request).await;
        }
    });
}

async fn process_pipeline_job(state: &Arc<AppState>, request: PipelineRequest) {
    let PipelineRequest { job_id, options } = request;

    {
        let mut jobs = state.jobs.write();
        if let Some(job) = jobs.get_mut(&job_id) {
            job.status = JobStatus::Running;
            job.started_at = Some(now_millis());
        }
    }

    info!(
        "Processing pipeline job {}: {}",
        job_id,
        options.source.display()
    );

    let engine = Arc::clone(&state.engine);
    let result = tokio::task::spawn_blocking(move || run_pipeline(&options, &engine)).await;

    let completed_at = now_millis();
    {
        let mut jobs = state.jobs.write();
        if let Some(job) = jobs.get_mut(&job_id) {
            job.completed_at = Some(completed_at);
            match &result {
                Ok(Ok(report)) => {
                    job.status = JobStatus::Completed;
                    job.reviews = Some(report.reviews);
                    job.db_rows = report.db_rows;
                }
                Ok(Err(e)) => {
                    job.status = JobStatus::Failed;
                    job.error = Some(e.to_string());
                }
                Err(e) => {
                    job.status = JobStatus::Failed;
                    job.error = Some(format!("Pipeline task panicked: {}", e));
                }
            }
        }
    }

    match result {
        Ok(Ok(report)) => info!(
            "Pipeline job {} completed: {} reviews, db_rows={:?}",
            job_id, report.reviews, report.db_rows
        ),
        Ok(Err(e)) => error!("Pipeline job {} failed: {}", job_id, e),
        Err(e) => error!("Pipeline job {} panicked: {}", job_id, e),
    }

    cleanup_old_jobs(state);
}

fn cleanup_old_jobs(state: &AppState) {
    let mut jobs = state.jobs.write();
    let mut finished: Vec<(String, i64)> = jobs
        .values()
        .filter(|j| j.status.is_finished())
        .map(|j| (j.id.clone(), j.completed_at.unwrap_or(0)))
        .collect();

    if finished.len() > MAX_FINISHED_JOBS {
        finished.sort_by_key(|(_, t)| *t);
        let remove_count = finished.len() - MAX_FINISHED_JOBS;
        for (id, _) in finished.into_iter().take(remove_count) {
            jobs.remove(&id);
        }
    }
}
