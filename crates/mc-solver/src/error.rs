//! Error types for integrator operations.

use thiserror::Error;

/// Errors raised by the integrator itself (as opposed to the right-hand side).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Step size {h:e} fell below the minimum at t = {t}")]
    StepSizeTooSmall { t: f64, h: f64 },

    #[error("Internal step budget of {max_steps} exhausted at t = {t}")]
    MaxStepsExceeded { t: f64, max_steps: usize },

    #[error("Singular iteration matrix at t = {t}")]
    Singular { t: f64 },

    #[error("Right-hand side error: {message}")]
    Rhs { message: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
