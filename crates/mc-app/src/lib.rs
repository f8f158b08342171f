//! Application service layer for the monolith simulator.
//!
//! Frontends go through this crate for configuration handling, run
//! execution with caching, and loading stored results.

pub mod config_service;
pub mod error;
pub mod progress;
pub mod run_service;

pub use config_service::{ConfigSummary, load_config, save_config, summarize, validate_file};
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, TransientProgress};
pub use run_service::{
    RunOptions, RunResponse, list_runs, load_run, run, run_type_of, snapshots_from_record,
};
