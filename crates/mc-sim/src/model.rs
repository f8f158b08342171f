//! TransientModel trait for semi-discretised models.

use crate::error::SimResult;
use nalgebra::DVector;

/// A system `dx/dt = f(t, x)` over a flat state vector.
///
/// `rhs` takes `&self`: a model carries no state between evaluations, so the
/// integrator may call it for trial states in any order.
pub trait TransientModel {
    /// Length of the state vector.
    fn dimension(&self) -> usize;

    /// State at the start of the run.
    fn initial_state(&self) -> DVector<f64>;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>>;
}
