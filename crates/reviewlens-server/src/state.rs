//! Shared application state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use reviewlens_core::AppConfig;
use reviewlens_ingest::PipelineOptions;
use reviewlens_nlp::NlpEngine;

/// Pipeline job status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A background pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineJob {
    pub id: String,
    pub status: JobStatus,
    pub options: PipelineOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub queued_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

/// A request for the pipeline worker.
pub struct PipelineRequest {
    pub job_id: String,
    pub options: PipelineOptions,
}

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: AppConfig,
    pub engine: Arc<NlpEngine>,
    pub jobs: RwLock<HashMap<String, PipelineJob>>,
    pub job_tx: mpsc::UnboundedSender<PipelineRequest>,
    job_rx: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<PipelineRequest>>>,
}

impl AppState {
    pub fn new(config: AppConfig, engine: Arc<NlpEngine>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            engine,
            jobs: RwLock::new(HashMap::new()),
            job_tx: tx,
            job_rx: parking_lot::Mutex::new(Some(rx)),
        }
    }

    /// Take the job receiver (can only be called once, by the worker).
    pub fn take_job_rx(&self) -> Option<mpsc::UnboundedReceiver<PipelineRequest>> {
        self.job_rx.lock().take()
    }

    /// Record a queued job and hand it to the worker. Returns the job id.
    pub fn enqueue_pipeline(&self, options: PipelineOptions) -> String {
        let job_id = uuid::Uuid::new_v4().to_string();
        let job = PipelineJob {
            id: job_id.clone(),
            status: JobStatus::Queued,
            options: options.clone(),
            reviews: None,
            db_rows: None,
            error: None,
            queued_at: now_millis(),
            started_at: None,
            completed_at: None,
        };
        self.jobs.write().insert(job_id.clone(), job);

        if self
            .job_tx
            .send(PipelineRequest {
                job_id: job_id.clone(),
                options,
            })
            .is_err()
        {
            let mut jobs = self.jobs.write();
            if let Some(job) = jobs.get_mut(&job_id) {
                job.status = JobStatus::Failed;
                job.error = Some("Pipeline worker is not running".to_string());
                job.completed_at = Some(now_millis());
            }
        }
        job_id
    }

    /// A caller-supplied database path, or the configured one.
    pub fn db_path(&self, requested: Option<&str>) -> PathBuf {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => self.config.data_paths.db_path.clone(),
        }
    }

    pub fn export_path(&self, requested: Option<&str>) -> PathBuf {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => self.config.data_paths.export_csv.clone(),
        }
    }

    pub fn resources_dir(&self) -> &Path {
        &self.config.data_paths.resources
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
