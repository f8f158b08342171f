use mc_app::{RunOptions, RunProgressEvent, RunStage, run};
use mc_project::MonolithConfig;

#[test]
fn stages_and_transient_progress_are_reported() {
    let mut cfg = MonolithConfig::default();
    cfg.time.end_s = 10.0;
    cfg.time.output_interval_s = 2.0;

    let mut events: Vec<RunProgressEvent> = Vec::new();
    let response = run(&cfg, &RunOptions::default(), Some(&mut |e| events.push(e)))
        .expect("run should succeed");
    assert_eq!(response.records.len(), 6);
    assert!(response.saved_to.is_none());

    let stages: Vec<RunStage> = events.iter().map(|e| e.stage).collect();
    assert_eq!(stages.first(), Some(&RunStage::Validating));
    assert_eq!(stages.last(), Some(&RunStage::Completed));
    assert!(!stages.contains(&RunStage::CheckingCache));
    assert!(!stages.contains(&RunStage::SavingResults));
    assert!(stages.contains(&RunStage::Recording));

    let transient: Vec<_> = events.iter().filter_map(|e| e.transient.as_ref()).collect();
    assert_eq!(transient.len(), 5);
    assert!(transient.windows(2).all(|w| w[1].sim_time_s > w[0].sim_time_s));
    let last = transient.last().unwrap();
    assert_eq!(last.outputs_done, 6);
    assert!((last.fraction_complete - 1.0).abs() < 1e-12);
}
