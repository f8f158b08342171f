//! Variable-order, variable-step BDF integrator in quasi-constant step form.
//!
//! The solution history is stored as a table of backward differences
//! `D[0..=MAX_ORDER + 2]` scaled to the current step. Step changes rescale the
//! table, so changing `h` never requires re-evaluating old points. Orders 1
//! through 5 are used; the order is re-selected once `order + 1` equal steps
//! have been taken.
//!
//! [`Bdf::integrate_to`] lands exactly on the requested time by clipping the
//! final step, which is what output sampling relies on.

use crate::error::SolverError;
use crate::jacobian::finite_difference_jacobian;
use crate::newton::{NEWTON_MAXITER, solve_bdf_corrector, weighted_rms_norm};
use mc_core::timing::AccumulatingTimer;
use nalgebra::{DMatrix, DVector, Dyn, LU};

pub const MAX_ORDER: usize = 5;

const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const SAFETY: f64 = 0.9;

/// Klopfenstein-Shampine NDF coefficients per order.
const KAPPA: [f64; MAX_ORDER + 1] = [0.0, -0.1850, -1.0 / 9.0, -0.0823, -0.0415, 0.0];

/// Options controlling accuracy and effort.
#[derive(Debug, Clone, PartialEq)]
pub struct BdfOptions {
    pub atol: f64,
    pub rtol: f64,
    /// Initial step; selected automatically when `None`.
    pub first_step: Option<f64>,
    pub max_step: f64,
    /// Budget of internal steps (accepted plus rejected) across the whole run.
    pub max_steps: usize,
}

impl Default for BdfOptions {
    fn default() -> Self {
        Self {
            atol: 1e-5,
            rtol: 1e-5,
            first_step: None,
            max_step: f64::INFINITY,
            max_steps: 500_000,
        }
    }
}

impl BdfOptions {
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.atol > 0.0 && self.atol.is_finite()) {
            return Err(SolverError::InvalidArg {
                what: format!("atol must be positive and finite, got {}", self.atol),
            });
        }
        if !(self.rtol > 0.0 && self.rtol.is_finite()) {
            return Err(SolverError::InvalidArg {
                what: format!("rtol must be positive and finite, got {}", self.rtol),
            });
        }
        if let Some(h) = self.first_step {
            if !(h > 0.0 && h.is_finite()) {
                return Err(SolverError::InvalidArg {
                    what: format!("first_step must be positive and finite, got {h}"),
                });
            }
        }
        if !(self.max_step > 0.0) {
            return Err(SolverError::InvalidArg {
                what: format!("max_step must be positive, got {}", self.max_step),
            });
        }
        if self.max_steps == 0 {
            return Err(SolverError::InvalidArg {
                what: "max_steps must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Work counters.
#[derive(Debug, Clone, Default)]
pub struct BdfStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evals: usize,
    pub jacobian_evals: usize,
    pub lu_decompositions: usize,
    pub newton_failures: usize,
    pub jacobian_time: AccumulatingTimer,
}

impl BdfStats {
    pub fn total_steps(&self) -> usize {
        self.accepted_steps + self.rejected_steps
    }
}

/// Integrator state. The right-hand side is passed to every call rather than
/// stored, so the caller keeps ownership of the model.
pub struct Bdf {
    t: f64,
    h_abs: f64,
    order: usize,
    n_equal_steps: usize,
    d: Vec<DVector<f64>>,
    jac: DMatrix<f64>,
    lu: Option<LU<f64, Dyn, Dyn>>,
    jac_current: bool,
    newton_tol: f64,
    gamma: [f64; MAX_ORDER + 2],
    alpha: [f64; MAX_ORDER + 2],
    error_const: [f64; MAX_ORDER + 2],
    opts: BdfOptions,
    stats: BdfStats,
}

impl std::fmt::Debug for Bdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdf")
            .field("t", &self.t)
            .field("h_abs", &self.h_abs)
            .field("order", &self.order)
            .field("n", &self.d[0].len())
            .finish()
    }
}

fn jacobian_epsilon() -> f64 {
    f64::EPSILON.sqrt()
}

/// `R` matrix used to rescale the difference table by `factor`.
fn compute_r(order: usize, factor: f64) -> DMatrix<f64> {
    let n = order + 1;
    let mut m = DMatrix::zeros(n, n);
    for j in 0..n {
        m[(0, j)] = 1.0;
    }
    for i in 1..n {
        for j in 1..n {
            m[(i, j)] = (i as f64 - 1.0 - factor * j as f64) / i as f64;
        }
    }
    // Cumulative product down each column.
    for j in 0..n {
        for i in 1..n {
            m[(i, j)] *= m[(i - 1, j)];
        }
    }
    m
}

fn change_d(d: &mut [DVector<f64>], order: usize, factor: f64) {
    let r = compute_r(order, factor);
    let u = compute_r(order, 1.0);
    let ru = r * u;
    let old: Vec<DVector<f64>> = d[..=order].to_vec();
    for (i, slot) in d.iter_mut().enumerate().take(order + 1) {
        let mut acc = DVector::zeros(slot.len());
        for (k, row) in old.iter().enumerate() {
            let w = ru[(k, i)];
            if w != 0.0 {
                acc.axpy(w, row, 1.0);
            }
        }
        *slot = acc;
    }
}

fn error_scale(y_a: &DVector<f64>, y_b: &DVector<f64>, atol: f64, rtol: f64) -> DVector<f64> {
    y_a.zip_map(y_b, |a, b| atol + rtol * a.abs().max(b.abs()))
}

impl Bdf {
    /// Set up the integrator at `(t0, y0)`. Evaluates `f` once, selects the
    /// first step and forms the initial Jacobian.
    pub fn new<F, E>(f: &mut F, t0: f64, y0: DVector<f64>, opts: BdfOptions) -> Result<Self, E>
    where
        F: FnMut(f64, &DVector<f64>) -> Result<DVector<f64>, E>,
        E: From<SolverError>,
    {
        opts.validate()?;
        if y0.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::InvalidArg {
                what: "initial state contains non-finite values".into(),
            }
            .into());
        }

        let n = y0.len();
        let mut stats = BdfStats::default();
        let f0 = f(t0, &y0)?;
        stats.rhs_evals += 1;

        let h_abs = match opts.first_step {
            Some(h) => h.min(opts.max_step),
            None => select_initial_step(f, t0, &y0, &f0, &opts, &mut stats)?,
        };

        let mut gamma = [0.0; MAX_ORDER + 2];
        let mut alpha = [0.0; MAX_ORDER + 2];
        let mut error_const = [0.0; MAX_ORDER + 2];
        for j in 1..=MAX_ORDER {
            gamma[j] = gamma[j - 1] + 1.0 / j as f64;
        }
        for j in 0..=MAX_ORDER {
            alpha[j] = (1.0 - KAPPA[j]) * gamma[j];
            error_const[j] = KAPPA[j] * gamma[j] + 1.0 / (j as f64 + 1.0);
        }

        let mut d = vec![DVector::zeros(n); MAX_ORDER + 3];
        d[1] = &f0 * h_abs;
        d[0] = y0;

        let jac = {
            let start = std::time::Instant::now();
            let y_ref = d[0].clone();
            let j = finite_difference_jacobian(&y_ref, &f0, |y| f(t0, y), jacobian_epsilon())?;
            stats.jacobian_time.record(start.elapsed());
            stats.jacobian_evals += 1;
            stats.rhs_evals += n;
            j
        };

        let newton_tol = (10.0 * f64::EPSILON / opts.rtol).max(0.03_f64.min(opts.rtol.sqrt()));

        Ok(Self {
            t: t0,
            h_abs,
            order: 1,
            n_equal_steps: 0,
            d,
            jac,
            lu: None,
            jac_current: true,
            newton_tol,
            gamma,
            alpha,
            error_const,
            opts,
            stats,
        })
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    /// Most recently accepted state.
    pub fn y(&self) -> &DVector<f64> {
        &self.d[0]
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn step_size(&self) -> f64 {
        self.h_abs
    }

    pub fn stats(&self) -> &BdfStats {
        &self.stats
    }

    fn min_step(&self, t: f64) -> f64 {
        10.0 * f64::EPSILON * t.abs().max(f64::MIN_POSITIVE)
    }

    fn rescale(&mut self, factor: f64) {
        change_d(&mut self.d, self.order, factor);
        self.h_abs *= factor;
        self.n_equal_steps = 0;
        self.lu = None;
    }

    fn refresh_jacobian<F, E>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(f64, &DVector<f64>) -> Result<DVector<f64>, E>,
    {
        let t = self.t;
        let y = self.d[0].clone();
        let f_y = f(t, &y)?;
        self.stats.rhs_evals += 1;
        let start = std::time::Instant::now();
        self.jac = finite_difference_jacobian(&y, &f_y, |yy| f(t, yy), jacobian_epsilon())?;
        self.stats.jacobian_time.record(start.elapsed());
        self.stats.jacobian_evals += 1;
        self.stats.rhs_evals += y.len();
        self.jac_current = true;
        self.lu = None;
        Ok(())
    }

    fn check_budget(&self) -> Result<(), SolverError> {
        if self.stats.total_steps() >= self.opts.max_steps {
            return Err(SolverError::MaxStepsExceeded {
                t: self.t,
                max_steps: self.opts.max_steps,
            });
        }
        Ok(())
    }

    /// Advance by one accepted step that does not pass `t_bound`.
    pub fn step<F, E>(&mut self, f: &mut F, t_bound: f64) -> Result<(), E>
    where
        F: FnMut(f64, &DVector<f64>) -> Result<DVector<f64>, E>,
        E: From<SolverError>,
    {
        let t = self.t;
        if t_bound <= t {
            return Err(SolverError::InvalidArg {
                what: format!("target time {t_bound} is not ahead of t = {t}"),
            }
            .into());
        }

        let min_step = self.min_step(t);
        let max_step = self.opts.max_step;
        if self.h_abs > max_step {
            self.rescale(max_step / self.h_abs);
        } else if self.h_abs < min_step {
            self.rescale(min_step / self.h_abs);
        }

        let atol = self.opts.atol;
        let rtol = self.opts.rtol;
        let order = self.order;
        let n = self.d[0].len();

        let (t_new, y_new, d_corr, safety, scale) = loop {
            self.check_budget()?;
            if self.h_abs < min_step {
                return Err(SolverError::StepSizeTooSmall { t, h: self.h_abs }.into());
            }

            let mut h = self.h_abs;
            let mut t_new = t + h;
            // Land on the bound exactly; absorb remainders too small to step over.
            let remainder = t_bound - t_new;
            if remainder < self.min_step(t_bound).max(1e-3 * h) {
                t_new = t_bound;
                h = t_new - t;
                let factor = h / self.h_abs;
                if factor != 1.0 {
                    self.rescale(factor);
                }
            }
            self.h_abs = h;

            let mut y_predict = DVector::zeros(n);
            for row in &self.d[..=order] {
                y_predict += row;
            }
            let scale = y_predict.map(|v| atol + rtol * v.abs());

            let mut psi = DVector::zeros(n);
            for j in 1..=order {
                psi.axpy(self.gamma[j], &self.d[j], 1.0);
            }
            psi /= self.alpha[order];

            let c = h / self.alpha[order];

            let mut converged = false;
            let mut outcome = None;
            while !converged {
                if self.lu.is_none() {
                    let iter = DMatrix::identity(n, n) - &self.jac * c;
                    self.lu = Some(iter.lu());
                    self.stats.lu_decompositions += 1;
                }
                let Some(lu) = self.lu.as_ref() else {
                    return Err(SolverError::Singular { t }.into());
                };
                let out = solve_bdf_corrector(
                    f,
                    t_new,
                    &y_predict,
                    c,
                    &psi,
                    lu,
                    &scale,
                    self.newton_tol,
                )?;
                self.stats.rhs_evals += out.iterations;
                converged = out.converged;
                let iterations = out.iterations;
                outcome = Some((out, iterations));
                if converged || self.jac_current {
                    break;
                }
                self.refresh_jacobian(f)?;
            }

            let Some((out, n_iter)) = outcome else {
                return Err(SolverError::Singular { t }.into());
            };

            if !converged {
                self.stats.newton_failures += 1;
                self.stats.rejected_steps += 1;
                tracing::trace!(t, h = self.h_abs, "corrector failed to converge, halving step");
                self.rescale(0.5);
                continue;
            }

            let safety =
                SAFETY * (2 * NEWTON_MAXITER + 1) as f64 / (2 * NEWTON_MAXITER + n_iter) as f64;
            let scale = error_scale(&out.y, &out.y, atol, rtol);
            let error = &out.d * self.error_const[order];
            let error_norm = weighted_rms_norm(&error, &scale);

            if error_norm > 1.0 {
                self.stats.rejected_steps += 1;
                let factor =
                    MIN_FACTOR.max(safety * error_norm.powf(-1.0 / (order as f64 + 1.0)));
                tracing::trace!(t, h = self.h_abs, error_norm, "step rejected");
                self.rescale(factor);
                continue;
            }

            break (t_new, out.y, out.d, safety, scale);
        };

        self.stats.accepted_steps += 1;
        self.n_equal_steps += 1;
        self.t = t_new;
        self.jac_current = false;

        // Update the difference table with the accepted correction.
        self.d[order + 2] = &d_corr - &self.d[order + 1];
        self.d[order + 1] = d_corr;
        for i in (0..=order).rev() {
            let next = self.d[i + 1].clone();
            self.d[i] += &next;
        }
        debug_assert!((&self.d[0] - &y_new).amax() <= 1e-9 * (1.0 + y_new.amax()));

        if self.n_equal_steps < order + 1 {
            return Ok(());
        }

        let error_m_norm = if order > 1 {
            let e = &self.d[order] * self.error_const[order - 1];
            weighted_rms_norm(&e, &scale)
        } else {
            f64::INFINITY
        };
        let error_norm = weighted_rms_norm(&(&self.d[order + 1] * self.error_const[order]), &scale);
        let error_p_norm = if order < MAX_ORDER {
            let e = &self.d[order + 2] * self.error_const[order + 1];
            weighted_rms_norm(&e, &scale)
        } else {
            f64::INFINITY
        };

        let factor_for = |norm: f64, k: f64| -> f64 {
            if norm == 0.0 {
                f64::INFINITY
            } else {
                norm.powf(-1.0 / k)
            }
        };
        let candidates = [
            factor_for(error_m_norm, order as f64),
            factor_for(error_norm, order as f64 + 1.0),
            factor_for(error_p_norm, order as f64 + 2.0),
        ];
        let (best, best_factor) = candidates
            .iter()
            .copied()
            .enumerate()
            .fold((1usize, candidates[1]), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc });

        // best is 0 (lower), 1 (same) or 2 (higher).
        self.order = order + best - 1;
        self.order = self.order.clamp(1, MAX_ORDER);
        let factor = MAX_FACTOR.min(safety * best_factor);
        self.rescale(factor);
        Ok(())
    }

    /// Integrate until `t()` equals `t_out` exactly.
    pub fn integrate_to<F, E>(&mut self, f: &mut F, t_out: f64) -> Result<(), E>
    where
        F: FnMut(f64, &DVector<f64>) -> Result<DVector<f64>, E>,
        E: From<SolverError>,
    {
        if t_out < self.t {
            return Err(SolverError::InvalidArg {
                what: format!("output time {t_out} precedes current time {}", self.t),
            }
            .into());
        }
        while self.t < t_out {
            self.step(f, t_out)?;
        }
        Ok(())
    }
}

/// Initial step heuristic (Hairer, Norsett and Wanner, order 1).
fn select_initial_step<F, E>(
    f: &mut F,
    t0: f64,
    y0: &DVector<f64>,
    f0: &DVector<f64>,
    opts: &BdfOptions,
    stats: &mut BdfStats,
) -> Result<f64, E>
where
    F: FnMut(f64, &DVector<f64>) -> Result<DVector<f64>, E>,
{
    if y0.is_empty() {
        return Ok(opts.max_step.min(1.0));
    }
    let scale = y0.map(|v| opts.atol + v.abs() * opts.rtol);
    let d0 = weighted_rms_norm(y0, &scale);
    let d1 = weighted_rms_norm(f0, &scale);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(opts.max_step);

    let y1 = y0 + f0 * h0;
    let f1 = f(t0 + h0, &y1)?;
    stats.rhs_evals += 1;
    let d2 = weighted_rms_norm(&(f1 - f0), &scale) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (1e-6_f64).max(h0 * 1e-3)
    } else {
        (0.01 / d1.max(d2)).powf(0.5)
    };
    Ok((100.0 * h0).min(h1).min(opts.max_step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverResult;

    #[test]
    fn compute_r_with_unit_factor_is_involutive() {
        // U·U = I for factor 1.
        for order in 1..=MAX_ORDER {
            let u = compute_r(order, 1.0);
            let uu = &u * &u;
            let id = DMatrix::<f64>::identity(order + 1, order + 1);
            assert!((uu - id).amax() < 1e-12, "order {order}");
        }
    }

    #[test]
    fn change_d_preserves_current_value() {
        let mut d: Vec<DVector<f64>> = (0..MAX_ORDER + 3)
            .map(|i| DVector::from_element(2, 1.0 / (i as f64 + 1.0)))
            .collect();
        let y = d[0].clone();
        change_d(&mut d, 3, 0.37);
        assert!((&d[0] - &y).amax() < 1e-15);
    }

    #[test]
    fn invalid_options_rejected() {
        let opts = BdfOptions {
            rtol: 0.0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
        let opts = BdfOptions {
            max_steps: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn non_finite_initial_state_rejected() {
        let mut f = |_t: f64, y: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(-y) };
        let y0 = DVector::from_vec(vec![1.0, f64::NAN]);
        let r = Bdf::new(&mut f, 0.0, y0, BdfOptions::default());
        assert!(matches!(r, Err(SolverError::InvalidArg { .. })));
    }

    #[test]
    fn backward_target_rejected() {
        let mut f = |_t: f64, y: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(-y) };
        let mut bdf = Bdf::new(&mut f, 1.0, DVector::from_element(1, 1.0), BdfOptions::default())
            .unwrap();
        assert!(bdf.integrate_to(&mut f, 0.5).is_err());
        // Zero-length interval is a no-op.
        bdf.integrate_to(&mut f, 1.0).unwrap();
        assert_eq!(bdf.t(), 1.0);
    }
}
