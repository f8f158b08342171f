use approx::assert_relative_eq;
use mc_solver::{Bdf, BdfOptions, SolverError, SolverResult};
use nalgebra::DVector;

fn tight() -> BdfOptions {
    BdfOptions {
        atol: 1e-10,
        rtol: 1e-8,
        ..Default::default()
    }
}

#[test]
fn exponential_decay_matches_closed_form() {
    let mut f = |_t: f64, y: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(-y) };
    let mut bdf = Bdf::new(&mut f, 0.0, DVector::from_element(1, 1.0), tight()).unwrap();
    for k in 1..=5 {
        let t_out = k as f64;
        bdf.integrate_to(&mut f, t_out).unwrap();
        assert_eq!(bdf.t(), t_out);
        assert_relative_eq!(bdf.y()[0], (-t_out).exp(), max_relative = 1e-5);
    }
    assert!(bdf.stats().accepted_steps > 0);
}

#[test]
fn lands_exactly_on_fine_output_grid() {
    let mut f = |t: f64, _y: &DVector<f64>| -> SolverResult<DVector<f64>> {
        Ok(DVector::from_element(1, t.cos()))
    };
    let mut bdf = Bdf::new(&mut f, 0.0, DVector::zeros(1), tight()).unwrap();
    let outputs: Vec<f64> = (1..=40).map(|k| 0.05 * k as f64).collect();
    for &t_out in &outputs {
        bdf.integrate_to(&mut f, t_out).unwrap();
        assert_eq!(bdf.t(), t_out);
        assert!((bdf.y()[0] - t_out.sin()).abs() < 1e-6);
    }
}

#[test]
fn stiff_linear_system_is_stable_with_large_steps() {
    // Fast mode at -1e5 decays immediately; slow mode at -1 is tracked.
    let mut f = |_t: f64, y: &DVector<f64>| -> SolverResult<DVector<f64>> {
        Ok(DVector::from_vec(vec![-1e5 * (y[0] - y[1]), -y[1]]))
    };
    let opts = BdfOptions {
        atol: 1e-9,
        rtol: 1e-6,
        ..Default::default()
    };
    let y0 = DVector::from_vec(vec![0.0, 1.0]);
    let mut bdf = Bdf::new(&mut f, 0.0, y0, opts).unwrap();
    bdf.integrate_to(&mut f, 10.0).unwrap();
    let expected = (-10.0_f64).exp();
    assert!((bdf.y()[1] - expected).abs() < 1e-6);
    assert!((bdf.y()[0] - bdf.y()[1]).abs() < 1e-6);
    // An explicit method would need ~5e5 steps here.
    assert!(bdf.stats().accepted_steps < 2_000);
}

#[test]
fn robertson_conserves_mass() {
    let mut f = |_t: f64, y: &DVector<f64>| -> SolverResult<DVector<f64>> {
        let r1 = 0.04 * y[0];
        let r2 = 1e4 * y[1] * y[2];
        let r3 = 3e7 * y[1] * y[1];
        Ok(DVector::from_vec(vec![-r1 + r2, r1 - r2 - r3, r3]))
    };
    let opts = BdfOptions {
        atol: 1e-10,
        rtol: 1e-6,
        ..Default::default()
    };
    let y0 = DVector::from_vec(vec![1.0, 0.0, 0.0]);
    let mut bdf = Bdf::new(&mut f, 0.0, y0, opts).unwrap();
    bdf.integrate_to(&mut f, 40.0).unwrap();
    let y = bdf.y();
    assert!((y.sum() - 1.0).abs() < 1e-6);
    // Reference value y0(40) = 0.7158.
    assert!((y[0] - 0.7158).abs() < 1e-3);
}

#[test]
fn step_budget_is_enforced() {
    let mut f = |t: f64, _y: &DVector<f64>| -> SolverResult<DVector<f64>> {
        Ok(DVector::from_element(1, (50.0 * t).sin()))
    };
    let opts = BdfOptions {
        max_steps: 5,
        atol: 1e-12,
        rtol: 1e-10,
        ..Default::default()
    };
    let mut bdf = Bdf::new(&mut f, 0.0, DVector::zeros(1), opts).unwrap();
    let err = bdf.integrate_to(&mut f, 100.0).unwrap_err();
    assert!(matches!(err, SolverError::MaxStepsExceeded { max_steps: 5, .. }));
    assert!(bdf.t() < 100.0);
}

#[test]
fn rhs_errors_pass_through_unchanged() {
    #[derive(Debug, PartialEq)]
    enum ModelError {
        Domain(f64),
        Solver(SolverError),
    }
    impl From<SolverError> for ModelError {
        fn from(e: SolverError) -> Self {
            ModelError::Solver(e)
        }
    }

    let mut f = |t: f64, y: &DVector<f64>| -> Result<DVector<f64>, ModelError> {
        if t > 0.5 {
            Err(ModelError::Domain(t))
        } else {
            Ok(-y)
        }
    };
    let mut bdf = Bdf::new(&mut f, 0.0, DVector::from_element(1, 1.0), tight()).unwrap();
    let err = bdf.integrate_to(&mut f, 1.0).unwrap_err();
    assert!(matches!(err, ModelError::Domain(_)));
    assert!(bdf.t() <= 0.5);
}

#[test]
fn max_step_caps_step_size() {
    let mut f = |_t: f64, _y: &DVector<f64>| -> SolverResult<DVector<f64>> {
        Ok(DVector::zeros(1))
    };
    let opts = BdfOptions {
        max_step: 0.25,
        ..Default::default()
    };
    let mut bdf = Bdf::new(&mut f, 0.0, DVector::from_element(1, 3.0), opts).unwrap();
    bdf.integrate_to(&mut f, 2.0).unwrap();
    assert!(bdf.stats().accepted_steps >= 8);
    assert_eq!(bdf.y()[0], 3.0);
}
