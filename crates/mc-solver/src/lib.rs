//! Stiff time integration for semi-discretised transport problems.
//!
//! This crate provides a variable-order, variable-step BDF integrator for
//! `dy/dt = f(t, y)` together with the pieces it is built from: a forward
//! finite-difference Jacobian and a simplified Newton corrector that reuses an
//! LU factorisation of `I - c·J`.
//!
//! The right-hand side is any `FnMut(f64, &DVector<f64>) -> Result<DVector<f64>, E>`
//! whose error type can absorb a [`SolverError`]; model errors pass through the
//! integrator untouched.

pub mod bdf;
pub mod error;
pub mod jacobian;
pub mod newton;

pub use bdf::{Bdf, BdfOptions, BdfStats, MAX_ORDER};
pub use error::{SolverError, SolverResult};
pub use jacobian::finite_difference_jacobian;
pub use newton::{CorrectorOutcome, solve_bdf_corrector, weighted_rms_norm};
