//! Property correlation errors.

use mc_core::McError;
use thiserror::Error;

/// Result type for property evaluations.
pub type PropsResult<T> = Result<T, PropsError>;

/// Errors that can occur during property evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropsError {
    /// Correlation evaluated outside its valid domain (non-positive temperature,
    /// zero Graetz number, non-positive conductivity...).
    #[error("Property domain error in {what}: {value}")]
    Domain { what: &'static str, value: f64 },
}

impl From<McError> for PropsError {
    fn from(err: McError) -> Self {
        PropsError::Domain {
            what: err.what(),
            value: err.value(),
        }
    }
}
