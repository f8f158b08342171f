//! Finite-difference stencils with their boundary closures.
//!
//! Every function reads node values through `at(k)` so the same stencil serves
//! contiguous gas arrays and strided washcoat columns.

use mc_project::AxialScheme;

/// Gas-phase axial curvature at node `i` of `n`.
///
/// The first node reaches back to the inlet value; the last is reflective.
pub fn gas_curvature(at: impl Fn(usize) -> f64, inlet: f64, n: usize, i: usize, dz: f64) -> f64 {
    let dz2 = dz * dz;
    if i == 0 {
        (at(1) - 2.0 * at(0) + inlet) / dz2
    } else if i < n - 1 {
        (at(i + 1) - 2.0 * at(i) + at(i - 1)) / dz2
    } else {
        2.0 * (at(i - 1) - at(i)) / dz2
    }
}

/// Gas-phase axial gradient at node `i` of `n`.
///
/// Boundary nodes are one-sided in both schemes.
pub fn gas_gradient(
    at: impl Fn(usize) -> f64,
    inlet: f64,
    n: usize,
    i: usize,
    dz: f64,
    scheme: AxialScheme,
) -> f64 {
    if i == 0 {
        return (at(0) - inlet) / dz;
    }
    match scheme {
        AxialScheme::Central if i < n - 1 => (at(i + 1) - at(i - 1)) / (2.0 * dz),
        _ => (at(i) - at(i - 1)) / dz,
    }
}

/// Curvature with zero-flux closures at both ends.
pub fn reflective_curvature(at: impl Fn(usize) -> f64, n: usize, i: usize, h: f64) -> f64 {
    let h2 = h * h;
    if i == 0 {
        2.0 * (at(1) - at(0)) / h2
    } else if i < n - 1 {
        (at(i + 1) - 2.0 * at(i) + at(i - 1)) / h2
    } else {
        2.0 * (at(i - 1) - at(i)) / h2
    }
}

/// Washcoat radial curvature-correction term `(1/s)·∂x/∂s` at an interior
/// node. The wall node carries its own transfer closure and the outer node is
/// impermeable, so both ends return zero here.
pub fn radial_gradient(at: impl Fn(usize) -> f64, n: usize, j: usize, ds: f64, s_j: f64) -> f64 {
    if j == 0 || j >= n - 1 {
        0.0
    } else {
        (at(j + 1) - at(j - 1)) / (2.0 * ds) / s_j
    }
}

/// Washcoat radial curvature: zero at the wall node (its diffusion is in the
/// wall closure), centred inside, reflective at the outer edge.
pub fn radial_curvature(at: impl Fn(usize) -> f64, n: usize, j: usize, ds: f64) -> f64 {
    if j == 0 {
        0.0
    } else {
        reflective_curvature(at, n, j, ds)
    }
}

/// Radial diffusion into the first washcoat control volume, `4·D·(x1 - x0)/ds²`.
pub fn wall_diffusion(at: impl Fn(usize) -> f64, diffusivity: f64, ds: f64) -> f64 {
    4.0 * diffusivity * (at(1) - at(0)) / (ds * ds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_profile_has_zero_interior_curvature() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let at = |k: usize| x[k];
        for i in 1..4 {
            assert_eq!(gas_curvature(at, 0.0, 5, i, 1.0), 0.0);
            assert_eq!(gas_gradient(at, 0.0, 5, i, 1.0, AxialScheme::Upwind), 1.0);
            assert_eq!(gas_gradient(at, 0.0, 5, i, 1.0, AxialScheme::Central), 1.0);
        }
        // Inlet continues the line.
        assert_eq!(gas_curvature(at, 0.0, 5, 0, 1.0), 0.0);
        assert_eq!(gas_gradient(at, 0.0, 5, 0, 1.0, AxialScheme::Upwind), 1.0);
    }

    #[test]
    fn reflective_end_pulls_towards_neighbour() {
        let x = [0.0, 1.0];
        let at = |k: usize| x[k];
        assert_eq!(reflective_curvature(at, 2, 0, 1.0), 2.0);
        assert_eq!(reflective_curvature(at, 2, 1, 1.0), -2.0);
    }

    #[test]
    fn radial_gradient_uses_depth_coordinate() {
        let x = [0.0, 1.0, 4.0];
        let at = |k: usize| x[k];
        assert_eq!(radial_gradient(at, 3, 1, 0.5, 0.5), 8.0);
        assert_eq!(radial_gradient(at, 3, 0, 0.5, 0.0), 0.0);
        assert_eq!(radial_gradient(at, 3, 2, 0.5, 1.0), 0.0);
    }
}
