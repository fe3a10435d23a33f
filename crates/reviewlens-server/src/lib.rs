//! ReviewLens server: HTTP API over the review database plus a background
//! pipeline worker.

pub mod jobs;
pub mod routes;
pub mod state;

pub use jobs::start_pipeline_worker;
pub use routes::build_router;
pub use state::AppState;
