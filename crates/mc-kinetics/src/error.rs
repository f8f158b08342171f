//! Error types for rate evaluation.

use mc_core::McError;
use thiserror::Error;

/// Errors that can occur while evaluating reaction rates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KineticsError {
    #[error("Kinetics domain error in {what}: {value}")]
    Domain { what: &'static str, value: f64 },
}

pub type KineticsResult<T> = Result<T, KineticsError>;

impl From<McError> for KineticsError {
    fn from(e: McError) -> Self {
        KineticsError::Domain {
            what: e.what(),
            value: e.value(),
        }
    }
}
