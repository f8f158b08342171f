//! Simplified Newton iteration for the BDF corrector.

use nalgebra::{DVector, Dyn, LU};

/// Maximum corrector iterations before the step is declared failed.
pub const NEWTON_MAXITER: usize = 4;

/// Result of one corrector solve.
#[derive(Debug, Clone)]
pub struct CorrectorOutcome {
    pub converged: bool,
    pub iterations: usize,
    /// Corrected state at `t_new`.
    pub y: DVector<f64>,
    /// Accumulated correction `y - y_predict`.
    pub d: DVector<f64>,
}

/// Root-mean-square norm of `v` weighted component-wise by `scale`.
pub fn weighted_rms_norm(v: &DVector<f64>, scale: &DVector<f64>) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v
        .iter()
        .zip(scale.iter())
        .map(|(x, s)| (x / s) * (x / s))
        .sum();
    (sum / v.len() as f64).sqrt()
}

/// Solve `d - c·f(t_new, y_predict + d) = -psi` for the correction `d`.
///
/// The iteration matrix `I - c·J` is supplied already factorised; it is not
/// updated during the iteration. Convergence is judged on the rate-scaled
/// increment norm against `tol`. A non-finite right-hand side or a singular
/// solve ends the iteration without convergence, leaving the caller to refresh
/// the Jacobian or shrink the step.
#[allow(clippy::too_many_arguments)]
pub fn solve_bdf_corrector<F, E>(
    f: &mut F,
    t_new: f64,
    y_predict: &DVector<f64>,
    c: f64,
    psi: &DVector<f64>,
    lu: &LU<f64, Dyn, Dyn>,
    scale: &DVector<f64>,
    tol: f64,
) -> Result<CorrectorOutcome, E>
where
    F: FnMut(f64, &DVector<f64>) -> Result<DVector<f64>, E>,
{
    let mut d = DVector::zeros(y_predict.len());
    let mut y = y_predict.clone();
    let mut dy_norm_old: Option<f64> = None;
    let mut converged = false;
    let mut iterations = 0;

    for k in 0..NEWTON_MAXITER {
        iterations = k + 1;
        let f_val = f(t_new, &y)?;
        if f_val.iter().any(|v| !v.is_finite()) {
            break;
        }

        let residual = &f_val * c - psi - &d;
        let Some(dy) = lu.solve(&residual) else {
            break;
        };
        let dy_norm = weighted_rms_norm(&dy, scale);

        let rate = dy_norm_old.map(|old| dy_norm / old);
        if let Some(rate) = rate {
            let remaining = NEWTON_MAXITER - k;
            if rate >= 1.0 || rate.powi(remaining as i32) / (1.0 - rate) * dy_norm > tol {
                break;
            }
        }

        y += &dy;
        d += &dy;

        let done = dy_norm == 0.0
            || rate.is_some_and(|r| r / (1.0 - r) * dy_norm < tol);
        if done {
            converged = true;
            break;
        }

        dy_norm_old = Some(dy_norm);
    }

    Ok(CorrectorOutcome {
        converged,
        iterations,
        y,
        d,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverResult;
    use nalgebra::DMatrix;

    #[test]
    fn rms_norm_of_unit_ratio_is_one() {
        let v = DVector::from_vec(vec![2.0, -3.0]);
        let s = DVector::from_vec(vec![2.0, 3.0]);
        assert!((weighted_rms_norm(&v, &s) - 1.0).abs() < 1e-14);
    }

    #[test]
    fn linear_corrector_converges_quickly() {
        // Backward Euler on y' = -y from y = 1 with h = 0.1: y1 = 1/1.1.
        let lambda = -1.0;
        let h = 0.1;
        let mut f = |_t: f64, y: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(y * lambda) };
        let y0 = DVector::from_element(1, 1.0);
        let iter = DMatrix::from_element(1, 1, 1.0 - h * lambda);
        let lu = iter.lu();
        let psi = DVector::zeros(1);
        let scale = DVector::from_element(1, 1e-8);
        let out = solve_bdf_corrector(&mut f, h, &y0, h, &psi, &lu, &scale, 1e-3).unwrap();
        assert!(out.converged);
        assert!((out.y[0] - 1.0 / 1.1).abs() < 1e-12);
    }

    #[test]
    fn non_finite_rhs_does_not_converge() {
        let mut f = |_t: f64, _y: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, f64::NAN))
        };
        let y0 = DVector::from_element(1, 1.0);
        let lu = DMatrix::from_element(1, 1, 1.0).lu();
        let psi = DVector::zeros(1);
        let scale = DVector::from_element(1, 1.0);
        let out = solve_bdf_corrector(&mut f, 0.1, &y0, 0.1, &psi, &lu, &scale, 1e-3).unwrap();
        assert!(!out.converged);
    }
}
