//! Simulation runner: drives the BDF integrator through the output times.

use crate::error::{SimError, SimFailure, SimResult};
use crate::model::TransientModel;
use mc_core::timing::{PerfStats, Timer};
use mc_project::MonolithConfig;
use mc_solver::{Bdf, BdfOptions, BdfStats, SolverError};
use nalgebra::DVector;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Strictly increasing output times; the first is the initial time.
    pub output_times: Vec<f64>,
    pub bdf: BdfOptions,
}

impl SimOptions {
    pub fn from_config(config: &MonolithConfig) -> Self {
        let s = &config.solver;
        Self {
            output_times: config.time.output_times(),
            bdf: BdfOptions {
                atol: s.atol,
                rtol: s.rtol,
                first_step: s.first_step_s,
                max_step: s.max_step_s.unwrap_or(f64::INFINITY),
                max_steps: s.max_steps,
            },
        }
    }

    fn validate(&self) -> SimResult<()> {
        if self.output_times.is_empty() {
            return Err(SimError::Config {
                what: "at least one output time is required".into(),
            });
        }
        if self.output_times.iter().any(|t| !t.is_finite()) {
            return Err(SimError::Config {
                what: "output times must be finite".into(),
            });
        }
        if self.output_times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::Config {
                what: "output times must be strictly increasing".into(),
            });
        }
        self.bdf.validate()?;
        Ok(())
    }
}

/// Record of simulation results, one entry per output time.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<DVector<f64>>,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    fn push(&mut self, t: f64, x: DVector<f64>) {
        self.t.push(t);
        self.x.push(x);
    }
}

/// Progress after each output time.
#[derive(Clone, Debug)]
pub struct SimProgress {
    pub t: f64,
    pub t_end: f64,
    pub outputs_done: usize,
    pub outputs_total: usize,
    pub internal_steps: usize,
    pub rhs_evals: usize,
    pub order: usize,
    pub step_size: f64,
}

/// A successful run.
#[derive(Clone, Debug)]
pub struct SimOutcome {
    pub record: SimRecord,
    pub perf: PerfStats,
}

fn perf_from(stats: &BdfStats, integrate_time_s: f64, setup_time_s: f64) -> PerfStats {
    PerfStats {
        setup_time_s,
        integrate_time_s,
        internal_steps: stats.accepted_steps,
        rejected_steps: stats.rejected_steps,
        rhs_evals: stats.rhs_evals,
        jacobian_evals: stats.jacobian_evals,
        lu_decompositions: stats.lu_decompositions,
        jacobian_time_s: stats.jacobian_time.total_seconds(),
        ..Default::default()
    }
}

/// Classify an error raised inside the integrator, attaching the last
/// accepted time and state.
fn classify(error: SimError, bdf: &Bdf) -> SimError {
    match error {
        SimError::Solver(SolverError::MaxStepsExceeded { max_steps, .. }) => {
            SimError::BudgetExhausted {
                t_reached: bdf.t(),
                max_steps,
            }
        }
        SimError::Solver(e) => SimError::IntegrationFailed {
            t_reached: bdf.t(),
            state: bdf.y().as_slice().to_vec(),
            message: e.to_string(),
        },
        other => other,
    }
}

/// Run a transient simulation over `opts.output_times`.
pub fn run_sim<M: TransientModel>(model: &M, opts: &SimOptions) -> Result<SimOutcome, SimFailure> {
    run_sim_with_progress(model, opts, |_| {})
}

/// As [`run_sim`], calling `progress` after every recorded output time.
///
/// On failure the returned [`SimFailure`] holds every output recorded so far.
pub fn run_sim_with_progress<M, P>(
    model: &M,
    opts: &SimOptions,
    mut progress: P,
) -> Result<SimOutcome, SimFailure>
where
    M: TransientModel,
    P: FnMut(&SimProgress),
{
    let mut record = SimRecord::default();
    let fail = |error: SimError, partial: SimRecord| SimFailure { error, partial };

    if let Err(e) = opts.validate() {
        return Err(fail(e, record));
    }

    let setup = Timer::start();
    let t0 = opts.output_times[0];
    let t_end = opts.output_times[opts.output_times.len() - 1];
    let x0 = model.initial_state();
    if x0.len() != model.dimension() {
        return Err(fail(
            SimError::Config {
                what: "initial state does not match model dimension".into(),
            },
            record,
        ));
    }
    record.push(t0, x0.clone());

    tracing::info!(
        dimension = model.dimension(),
        t0,
        t_end,
        outputs = opts.output_times.len(),
        atol = opts.bdf.atol,
        rtol = opts.bdf.rtol,
        "starting transient run"
    );

    let mut f = |t: f64, y: &DVector<f64>| model.rhs(t, y);
    let mut bdf = match Bdf::new(&mut f, t0, x0, opts.bdf.clone()) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "integrator setup failed");
            return Err(fail(e, record));
        }
    };
    let setup_time_s = setup.stop();

    let integrate = Timer::start();
    let total = opts.output_times.len();
    for (k, &t_out) in opts.output_times.iter().enumerate().skip(1) {
        if let Err(e) = bdf.integrate_to(&mut f, t_out) {
            let error = classify(e, &bdf);
            tracing::warn!(error = %error, t = bdf.t(), "transient run failed");
            return Err(fail(error, record));
        }
        record.push(t_out, bdf.y().clone());

        let stats = bdf.stats();
        tracing::debug!(
            t = t_out,
            steps = stats.accepted_steps,
            rejected = stats.rejected_steps,
            rhs = stats.rhs_evals,
            jac = stats.jacobian_evals,
            order = bdf.order(),
            h = bdf.step_size(),
            "output recorded"
        );
        progress(&SimProgress {
            t: t_out,
            t_end,
            outputs_done: k + 1,
            outputs_total: total,
            internal_steps: stats.accepted_steps,
            rhs_evals: stats.rhs_evals,
            order: bdf.order(),
            step_size: bdf.step_size(),
        });
    }

    let perf = perf_from(bdf.stats(), integrate.stop(), setup_time_s);
    tracing::info!(
        steps = perf.internal_steps,
        rejected = perf.rejected_steps,
        rhs = perf.rhs_evals,
        jac = perf.jacobian_evals,
        seconds = perf.integrate_time_s,
        "transient run complete"
    );
    Ok(SimOutcome { record, perf })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Decay;

    impl TransientModel for Decay {
        fn dimension(&self) -> usize {
            1
        }
        fn initial_state(&self) -> DVector<f64> {
            DVector::from_element(1, 1.0)
        }
        fn rhs(&self, _t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
            Ok(-x)
        }
    }

    fn opts(times: Vec<f64>) -> SimOptions {
        SimOptions {
            output_times: times,
            bdf: BdfOptions {
                atol: 1e-10,
                rtol: 1e-8,
                ..Default::default()
            },
        }
    }

    #[test]
    fn records_every_output_time() {
        let out = run_sim(&Decay, &opts(vec![0.0, 0.5, 1.0, 2.0])).unwrap();
        assert_eq!(out.record.t, vec![0.0, 0.5, 1.0, 2.0]);
        assert!((out.record.x[3][0] - (-2.0f64).exp()).abs() < 1e-6);
        assert!(out.perf.internal_steps > 0);
    }

    #[test]
    fn rejects_non_increasing_times() {
        let err = run_sim(&Decay, &opts(vec![0.0, 1.0, 1.0])).unwrap_err();
        assert!(matches!(err.error, SimError::Config { .. }));
        assert!(err.partial.is_empty());
    }

    #[test]
    fn budget_exhaustion_keeps_partial_record() {
        let mut o = opts((0..=50).map(f64::from).collect());
        o.bdf.max_steps = 20;
        let err = run_sim(&Decay, &o).unwrap_err();
        match err.error {
            SimError::BudgetExhausted { max_steps, t_reached } => {
                assert_eq!(max_steps, 20);
                assert!(t_reached < 50.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!err.partial.is_empty());
        assert_eq!(err.partial.t[0], 0.0);
    }

    #[test]
    fn progress_reports_each_output() {
        let mut seen = Vec::new();
        run_sim_with_progress(&Decay, &opts(vec![0.0, 1.0, 2.0]), |p| seen.push(p.outputs_done))
            .unwrap();
        assert_eq!(seen, vec![2, 3]);
    }
}
