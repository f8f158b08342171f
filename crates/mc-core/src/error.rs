use thiserror::Error;

/// A scalar input outside the range a correlation accepts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum McError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Non-positive value for {what}: {value}")]
    NonPositive { what: &'static str, value: f64 },
}

impl McError {
    pub fn what(&self) -> &'static str {
        match self {
            McError::NonFinite { what, .. } | McError::NonPositive { what, .. } => what,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            McError::NonFinite { value, .. } | McError::NonPositive { value, .. } => *value,
        }
    }
}
