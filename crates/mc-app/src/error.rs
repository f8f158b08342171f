//! Error types for the service layer.

use std::path::PathBuf;

/// Unified error for frontends; backend errors are flattened to messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read configuration file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    /// The run stopped early. Outputs up to `last_output_s` were recorded
    /// and, when a store was configured, saved under `run_id`.
    #[error("Run failed after t = {last_output_s:?} s: {message}")]
    RunFailed {
        message: String,
        last_output_s: Option<f64>,
        run_id: String,
        saved_to: Option<PathBuf>,
    },

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<mc_project::ProjectError> for AppError {
    fn from(err: mc_project::ProjectError) -> Self {
        match err {
            mc_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Config(other.to_string()),
        }
    }
}

impl From<mc_project::ValidationError> for AppError {
    fn from(err: mc_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<mc_sim::SimError> for AppError {
    fn from(err: mc_sim::SimError) -> Self {
        match err {
            mc_sim::SimError::Config { what } => AppError::Config(what),
            other => AppError::Simulation(other.to_string()),
        }
    }
}

impl From<mc_results::ResultsError> for AppError {
    fn from(err: mc_results::ResultsError) -> Self {
        match err {
            mc_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
