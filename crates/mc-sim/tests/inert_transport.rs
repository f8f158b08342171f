//! Without chemistry the channel is a pure transport problem: the inlet
//! composition fills gas and washcoat without overshoot, and a step in inlet
//! temperature relaxes to a uniform field at the inlet value.

use mc_project::{CompositionDef, MonolithConfig};
use mc_sim::{MonolithModel, SimOptions, TEMPERATURE, TransientModel, run_sim};

const INLET_CO: f64 = 3000e-6;
const INLET_HC: f64 = 500e-6;

fn inert_fill_config() -> MonolithConfig {
    let mut cfg = MonolithConfig::default();
    cfg.kinetics.enabled = false;
    cfg.operating.initial = CompositionDef {
        co: 0.0,
        co2: 0.0,
        hydrocarbon: 0.0,
    };
    cfg.operating.inlet = CompositionDef {
        co: INLET_CO,
        co2: 0.0,
        hydrocarbon: INLET_HC,
    };
    cfg.schedule.segments.clear();
    cfg.time.end_s = 2.0;
    cfg.time.output_interval_s = 0.05;
    cfg.solver.atol = 1e-12;
    cfg.solver.rtol = 1e-6;
    cfg
}

#[test]
fn step_inlet_fills_channel_without_overshoot() {
    let cfg = inert_fill_config();
    let model = MonolithModel::from_config(&cfg).unwrap();
    assert_eq!(model.rate_law_name(), "inert");
    let outcome = run_sim(&model, &SimOptions::from_config(&cfg)).unwrap();
    assert_eq!(outcome.record.len(), 41);

    let slack = 1e-6;
    for x in &outcome.record.x {
        let f = model.fields(x).unwrap();
        for (v, inlet) in [(0, INLET_CO), (2, INLET_HC)] {
            for &y in f.gas[v].iter().chain(f.washcoat[v].iter()) {
                assert!(y <= inlet * (1.0 + slack), "overshoot {y} > {inlet}");
                assert!(y >= -inlet * slack, "undershoot {y}");
            }
        }
        assert!(f.gas[1].iter().chain(f.washcoat[1].iter()).all(|&y| y.abs() < 1e-15));
        for &t in f.gas[TEMPERATURE].iter().chain(f.washcoat[TEMPERATURE].iter()) {
            assert!((t - 417.0).abs() < 1e-9, "T = {t}");
        }
    }

    let last = model.fields(outcome.record.x.last().unwrap()).unwrap();
    for (v, inlet) in [(0, INLET_CO), (2, INLET_HC)] {
        for &y in last.gas[v].iter().chain(last.washcoat[v].iter()) {
            assert!((y - inlet).abs() < 1e-4 * inlet, "not filled: {y}");
        }
    }
}

#[test]
fn outlet_lags_inlet_during_fill() {
    let mut cfg = inert_fill_config();
    cfg.time.end_s = 2e-3;
    cfg.time.output_interval_s = 5e-4;
    let model = MonolithModel::from_config(&cfg).unwrap();
    let outcome = run_sim(&model, &SimOptions::from_config(&cfg)).unwrap();
    let l = *model.layout();
    let early = &outcome.record.x[1];
    assert!(early[l.gas(0, 0)] > early[l.gas(0, l.nz - 1)]);
    assert!(early[l.gas(0, 0)] > early[l.washcoat(0, 0, l.ns - 1)]);
    assert_eq!(model.dimension(), l.len());
}

#[test]
fn hotter_inlet_settles_to_uniform_inlet_temperature() {
    let mut cfg = MonolithConfig::default();
    cfg.kinetics.enabled = false;
    cfg.operating.initial = cfg.operating.inlet;
    cfg.operating.initial_temperature_k = 417.0;
    cfg.operating.inlet_temperature_k = 500.0;
    cfg.schedule.segments.clear();
    cfg.time.end_s = 5.0;
    cfg.time.output_interval_s = 0.25;
    cfg.solver.atol = 1e-10;
    cfg.solver.rtol = 1e-7;
    let model = MonolithModel::from_config(&cfg).unwrap();
    let outcome = run_sim(&model, &SimOptions::from_config(&cfg)).unwrap();
    assert_eq!(outcome.record.len(), 21);

    let l = *model.layout();
    let outlet_t: Vec<f64> = outcome
        .record
        .x
        .iter()
        .map(|x| x[l.gas(TEMPERATURE, l.nz - 1)])
        .collect();
    assert_eq!(outlet_t[0], 417.0);
    for w in outlet_t.windows(2) {
        assert!(w[1] >= w[0] - 1e-6, "outlet cooled: {} -> {}", w[0], w[1]);
    }

    for x in &outcome.record.x {
        let f = model.fields(x).unwrap();
        for &t in f.gas[TEMPERATURE].iter().chain(f.washcoat[TEMPERATURE].iter()) {
            assert!((417.0 - 1e-6..=500.0 + 1e-3).contains(&t), "T = {t} outside the step");
        }
    }

    let last = model.fields(outcome.record.x.last().unwrap()).unwrap();
    for &t in last.gas[TEMPERATURE].iter().chain(last.washcoat[TEMPERATURE].iter()) {
        assert!((t - 500.0).abs() < 1e-2, "not settled: T = {t}");
    }
    let inlet = model.inlet_composition();
    for v in [0, 2] {
        for &y in last.gas[v].iter().chain(last.washcoat[v].iter()) {
            assert!((y - inlet[v]).abs() <= 1e-9 * inlet[v].max(1e-12), "species moved: {y}");
        }
    }
}
