//! Finite difference Jacobian computation.

use nalgebra::{DMatrix, DVector};

/// Compute Jacobian using forward finite differences.
///
/// For each column j, perturbs x[j] by epsilon and computes (f(x+e) - f(x))/epsilon.
/// `f_x` is `f(x)`, already available to every caller in this crate.
pub fn finite_difference_jacobian<F, E>(
    x: &DVector<f64>,
    f_x: &DVector<f64>,
    mut f: F,
    epsilon: f64,
) -> Result<DMatrix<f64>, E>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
{
    let n = x.len();
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);
    let mut x_perturbed = x.clone();

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] = x[j] + dx;
        // Use the representable step, not the requested one.
        let dx = x_perturbed[j] - x[j];

        let f_perturbed = f(&x_perturbed)?;
        jac.set_column(j, &((f_perturbed - f_x) / dx));

        x_perturbed[j] = x[j];
    }

    Ok(jac)
}
