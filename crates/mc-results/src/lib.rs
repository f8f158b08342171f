//! mc-results: snapshots, derived conversion metrics and run storage.

pub mod hash;
pub mod light_off;
pub mod recorder;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use light_off::{LightOffMetrics, light_off_metrics};
pub use recorder::{RecorderParams, ResultRecorder};
pub use store::RunStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Snapshot at t = {time_s} s is inconsistent: {message}")]
    Snapshot { time_s: f64, message: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
