//! Error types for simulation operations.

use crate::sim::SimRecord;
use mc_solver::SolverError;
use std::fmt;
use thiserror::Error;

/// Grid location of a failing evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeIndex {
    pub axial: usize,
    /// Washcoat or substrate radial index; `None` for gas-phase nodes.
    pub radial: Option<usize>,
}

impl NodeIndex {
    pub fn gas(axial: usize) -> Self {
        Self {
            axial,
            radial: None,
        }
    }

    pub fn layer(axial: usize, radial: usize) -> Self {
        Self {
            axial,
            radial: Some(radial),
        }
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radial {
            Some(j) => write!(f, "({}, {})", self.axial, j),
            None => write!(f, "({})", self.axial),
        }
    }
}

/// Errors encountered during transient simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Configuration error: {what}")]
    Config { what: String },

    #[error("Domain error in {field} at node {node}: {message}")]
    Domain {
        field: &'static str,
        node: NodeIndex,
        message: String,
    },

    #[error("Integration failed at t = {t_reached} s: {message}")]
    IntegrationFailed {
        t_reached: f64,
        /// Last accepted state vector
        state: Vec<f64>,
        message: String,
    },

    #[error("Internal step budget of {max_steps} exhausted at t = {t_reached} s")]
    BudgetExhausted { t_reached: f64, max_steps: usize },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<mc_project::ValidationError> for SimError {
    fn from(e: mc_project::ValidationError) -> Self {
        SimError::Config {
            what: e.to_string(),
        }
    }
}

/// A failed run: the error plus every output time recorded before it.
#[derive(Error, Debug, Clone)]
#[error("{error} ({} output times recorded)", .partial.t.len())]
pub struct SimFailure {
    #[source]
    pub error: SimError,
    pub partial: SimRecord,
}

impl SimFailure {
    /// Time of the last recorded output, if any.
    pub fn last_output_time(&self) -> Option<f64> {
        self.partial.t.last().copied()
    }
}
