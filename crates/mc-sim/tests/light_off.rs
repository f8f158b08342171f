//! Light-off over the heating part of the reference schedule.

use mc_project::MonolithConfig;
use mc_sim::{MonolithModel, SimError, SimOptions, SimProgress, run_sim, run_sim_with_progress};

fn heating_config() -> MonolithConfig {
    let mut cfg = MonolithConfig::default();
    cfg.time.end_s = 700.0;
    cfg.time.output_interval_s = 25.0;
    cfg.solver.atol = 1e-10;
    cfg.solver.rtol = 1e-6;
    cfg
}

#[test]
fn conversion_rises_monotonically_while_heating() {
    let cfg = heating_config();
    let model = MonolithModel::from_config(&cfg).unwrap();
    let mut seen: Vec<SimProgress> = Vec::new();
    let outcome =
        run_sim_with_progress(&model, &SimOptions::from_config(&cfg), |p| seen.push(p.clone()))
            .unwrap();
    let record = &outcome.record;
    assert_eq!(record.len(), 29);
    assert_eq!(seen.len(), 28);
    assert_eq!(seen.last().unwrap().outputs_done, 29);
    assert!(outcome.perf.internal_steps > 0);
    assert!(outcome.perf.rhs_evals >= outcome.perf.internal_steps);

    let l = *model.layout();
    let outlet = l.gas(0, l.nz - 1);
    let outlet_hc = l.gas(2, l.nz - 1);
    let inlet = model.inlet_composition();
    let conversion: Vec<f64> = record
        .x
        .iter()
        .map(|x| (inlet[0] - x[outlet]) / inlet[0])
        .collect();

    assert_eq!(conversion[0], 0.0);
    for w in conversion.windows(2) {
        assert!(w[1] >= w[0] - 1e-6, "conversion fell: {} -> {}", w[0], w[1]);
    }
    let last = *conversion.last().unwrap();
    assert!(last > 0.01 && last < 1.0, "final CO conversion {last}");

    let hc = (inlet[2] - record.x.last().unwrap()[outlet_hc]) / inlet[2];
    assert!(hc > 0.0 && hc < last, "final HC conversion {hc}");

    // Inlet program drives the first gas node upwards.
    let t_gas0 = |x: &nalgebra::DVector<f64>| x[l.gas(mc_sim::TEMPERATURE, 0)];
    assert!(t_gas0(record.x.last().unwrap()) > t_gas0(&record.x[0]) + 50.0);
}

#[test]
fn exhausted_budget_keeps_recorded_outputs() {
    let mut cfg = heating_config();
    cfg.solver.max_steps = 10;
    let model = MonolithModel::from_config(&cfg).unwrap();
    let failure = run_sim(&model, &SimOptions::from_config(&cfg)).unwrap_err();
    match failure.error {
        SimError::BudgetExhausted { max_steps, .. } => assert_eq!(max_steps, 10),
        ref other => panic!("expected budget exhaustion, got {other:?}"),
    }
    assert!(!failure.partial.is_empty());
    assert_eq!(failure.partial.t[0], 0.0);
    assert_eq!(failure.last_output_time(), failure.partial.t.last().copied());
}
