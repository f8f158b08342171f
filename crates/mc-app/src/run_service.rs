//! Run execution, caching and result loading.

use std::path::{Path, PathBuf};
use std::time::Instant;

use mc_core::timing::{PerfStats, Timer};
use mc_project::{MonolithConfig, validate_config};
use mc_results::{
    GasSnapshot, GridShape, LayerSnapshot, LightOffMetrics, RecorderParams, ResultRecorder,
    RunManifest, RunStatus, RunStore, RunType, Snapshot, TimeseriesRecord, compute_run_id,
    light_off_metrics,
};
use mc_sim::{Fields, MonolithModel, SimError, SimOptions, SimRecord, run_sim_with_progress};

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage, TransientProgress};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Reuse a completed run with the same id from the store.
    pub use_cache: bool,
    pub solver_version: String,
    /// Where runs are persisted; `None` keeps results in memory only.
    pub store_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
            store_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub records: Vec<TimeseriesRecord>,
    pub light_off: LightOffMetrics,
    pub loaded_from_cache: bool,
    pub saved_to: Option<PathBuf>,
}

type ProgressCb<'a> = Option<&'a mut dyn FnMut(RunProgressEvent)>;

fn emit(cb: &mut ProgressCb<'_>, stage: RunStage, started: Instant, message: &str) {
    if let Some(cb) = cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

pub fn run_type_of(config: &MonolithConfig) -> RunType {
    RunType::Transient {
        t_start_s: config.time.start_s,
        t_end_s: config.time.end_s,
        output_interval_s: config.time.output_interval_s,
        outputs: config.time.output_times().len(),
    }
}

/// Convert each recorded state into a [`Snapshot`].
pub fn snapshots_from_record(model: &MonolithModel, record: &SimRecord) -> AppResult<Vec<Snapshot>> {
    record
        .t
        .iter()
        .zip(&record.x)
        .map(|(&t, x)| -> AppResult<Snapshot> {
            let Fields {
                gas,
                washcoat,
                substrate,
            } = model.fields(x)?;
            let [gco, gco2, ghc, gt] = gas;
            let [wco, wco2, whc, wt] = washcoat;
            Ok(Snapshot {
                time_s: t,
                inlet_temperature_k: model.program().temperature(t),
                gas: GasSnapshot {
                    co: gco,
                    co2: gco2,
                    hydrocarbon: ghc,
                    temperature_k: gt,
                },
                washcoat: LayerSnapshot {
                    co: wco,
                    co2: wco2,
                    hydrocarbon: whc,
                    temperature_k: wt,
                },
                substrate_temperature_k: substrate,
            })
        })
        .collect()
}

/// Time reached by a failed run, falling back to its last output.
fn failure_time(error: &SimError, last_output: Option<f64>) -> f64 {
    match error {
        SimError::IntegrationFailed { t_reached, .. } | SimError::BudgetExhausted { t_reached, .. } => {
            *t_reached
        }
        _ => last_output.unwrap_or(f64::NAN),
    }
}

/// Run `config` to completion, or load it from the store when cached.
///
/// A run that fails part way still records and saves what it reached, then
/// returns [`AppError::RunFailed`].
pub fn run(
    config: &MonolithConfig,
    options: &RunOptions,
    mut progress: ProgressCb<'_>,
) -> AppResult<RunResponse> {
    let started = Instant::now();

    emit(&mut progress, RunStage::Validating, started, "Validating configuration");
    validate_config(config)?;

    let run_type = run_type_of(config);
    let run_id = compute_run_id(config, &run_type, &options.solver_version);
    let store = options
        .store_dir
        .as_ref()
        .map(|dir| RunStore::new(dir.clone()))
        .transpose()?;

    if let Some(store) = &store {
        emit(&mut progress, RunStage::CheckingCache, started, "Checking run cache");
        if options.use_cache && store.has_run(&run_id) {
            let manifest = store.load_manifest(&run_id)?;
            if manifest.status == RunStatus::Completed {
                emit(&mut progress, RunStage::LoadingCachedResult, started, "Loading cached run");
                let records = store.load_timeseries(&run_id)?;
                let light_off = light_off_of(&records);
                emit(&mut progress, RunStage::Completed, started, "Loaded cached run");
                return Ok(RunResponse {
                    run_id,
                    manifest,
                    records,
                    light_off,
                    loaded_from_cache: true,
                    saved_to: None,
                });
            }
        }
    }

    emit(&mut progress, RunStage::BuildingModel, started, "Building channel model");
    let setup = Timer::start();
    let model = MonolithModel::from_config(config)?;
    let sim_options = SimOptions::from_config(config);
    let build_time_s = setup.stop();
    tracing::info!(run_id = %run_id, rate_law = model.rate_law_name(), "run starting");

    emit(&mut progress, RunStage::Integrating, started, "Integrating");
    let result = run_sim_with_progress(&model, &sim_options, |p| {
        if let Some(cb) = progress.as_deref_mut() {
            let span = p.t_end - sim_options.output_times[0];
            cb(RunProgressEvent {
                stage: RunStage::Integrating,
                elapsed_wall_s: started.elapsed().as_secs_f64(),
                message: None,
                transient: Some(TransientProgress {
                    sim_time_s: p.t,
                    t_end_s: p.t_end,
                    fraction_complete: if span > 0.0 {
                        (p.t - sim_options.output_times[0]) / span
                    } else {
                        1.0
                    },
                    outputs_done: p.outputs_done,
                    outputs_total: p.outputs_total,
                    internal_steps: p.internal_steps,
                    rhs_evals: p.rhs_evals,
                    order: p.order,
                    step_size_s: p.step_size,
                }),
            });
        }
    });

    let (record, status, mut perf) = match result {
        Ok(outcome) => (outcome.record, RunStatus::Completed, outcome.perf),
        Err(failure) => {
            let t_reached_s = failure_time(&failure.error, failure.last_output_time());
            tracing::warn!(error = %failure.error, t_reached_s, "run stopped early");
            let status = RunStatus::Failed {
                t_reached_s,
                message: failure.error.to_string(),
            };
            (failure.partial, status, PerfStats::default())
        }
    };
    perf.setup_time_s += build_time_s;

    emit(&mut progress, RunStage::Recording, started, "Deriving conversion metrics");
    let record_timer = Timer::start();
    let mut recorder = ResultRecorder::new(RecorderParams::from_config(config));
    for snapshot in snapshots_from_record(&model, &record)? {
        recorder.record(snapshot)?;
    }
    let records = recorder.records();
    let light_off = light_off_of(&records);
    perf.record_time_s = record_timer.stop();

    let layout = model.layout();
    let mut manifest = RunManifest {
        run_id: run_id.clone(),
        config_name: config.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        run_type,
        status: status.clone(),
        solver_version: options.solver_version.clone(),
        grid: GridShape {
            nz: layout.nz,
            ns: layout.ns,
            nu: layout.nu,
        },
        perf,
    };

    let saved_to = match &store {
        Some(store) => {
            emit(&mut progress, RunStage::SavingResults, started, "Saving results");
            let save_timer = Timer::start();
            let dir = store.save_run(&manifest, &records)?;
            manifest.perf.save_time_s = save_timer.stop();
            Some(dir)
        }
        None => None,
    };

    if let RunStatus::Failed { message, .. } = status {
        emit(&mut progress, RunStage::Failed, started, &message);
        return Err(AppError::RunFailed {
            message,
            last_output_s: records.last().map(|r| r.snapshot.time_s),
            run_id,
            saved_to,
        });
    }

    emit(&mut progress, RunStage::Completed, started, "Run completed");
    Ok(RunResponse {
        run_id,
        manifest,
        records,
        light_off,
        loaded_from_cache: false,
        saved_to,
    })
}

fn light_off_of(records: &[TimeseriesRecord]) -> LightOffMetrics {
    let snapshots: Vec<Snapshot> = records.iter().map(|r| r.snapshot.clone()).collect();
    let metrics: Vec<_> = records.iter().map(|r| r.metrics).collect();
    light_off_metrics(&snapshots, &metrics)
}

/// Load a stored run.
pub fn load_run(store_dir: &Path, run_id: &str) -> AppResult<(RunManifest, Vec<TimeseriesRecord>)> {
    let store = RunStore::new(store_dir.to_path_buf())?;
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;
    Ok((manifest, records))
}

pub fn list_runs(store_dir: &Path, config_name: Option<&str>) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::new(store_dir.to_path_buf())?;
    Ok(store.list_runs(config_name)?)
}
