use clap::{Parser, Subcommand};
use mc_app::{AppError, AppResult, RunOptions, RunProgressEvent, RunStage, config_service, run_service};
use mc_project::MonolithConfig;
use mc_results::{RunManifest, RunStatus, RunStore, RunType, TimeseriesRecord};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mc-cli")]
#[command(about = "Transient catalytic monolith channel simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and summarise the model it builds
    Validate {
        /// Path to the YAML or JSON configuration
        config_path: PathBuf,
    },
    /// Run a transient simulation
    Run {
        /// Path to the YAML or JSON configuration
        config_path: PathBuf,
        /// Run store directory (defaults to .monolith/runs next to the config)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Override the end of the simulated horizon [s]
        #[arg(long)]
        t_end: Option<f64>,
        /// Override the output interval [s]
        #[arg(long)]
        output_interval: Option<f64>,
        /// Skip the cache and force a re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List stored runs
    Runs {
        /// Run store directory
        store: PathBuf,
        /// Only runs of this configuration name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show details of a stored run
    Show {
        /// Run store directory
        store: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export the outlet conversion history of a run as CSV
    Export {
        /// Run store directory
        store: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the reference configuration as YAML
    DefaultConfig,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run {
            config_path,
            out,
            t_end,
            output_interval,
            no_cache,
        } => cmd_run(&config_path, out, t_end, output_interval, !no_cache),
        Commands::Runs { store, name } => cmd_runs(&store, name.as_deref()),
        Commands::Show { store, run_id } => cmd_show(&store, &run_id),
        Commands::Export {
            store,
            run_id,
            output,
        } => cmd_export(&store, &run_id, output.as_deref()),
        Commands::DefaultConfig => cmd_default_config(),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let s = config_service::validate_file(config_path)?;
    println!("✓ Configuration is valid");
    println!("  Name: {}", s.name);
    println!("  Grid: nz={} ns={} nu={}", s.nz, s.ns, s.nu);
    println!(
        "  State dimension: {} (substrate {})",
        s.state_dimension,
        if s.substrate_integrated { "integrated" } else { "held" }
    );
    println!("  Rate law: {}", s.rate_law);
    println!(
        "  Horizon: {:.1} - {:.1} s, {} outputs",
        s.t_start_s, s.t_end_s, s.outputs
    );
    println!("  Inlet schedule: {:.1} s", s.schedule_duration_s);
    Ok(())
}

fn cmd_run(
    config_path: &Path,
    out: Option<PathBuf>,
    t_end: Option<f64>,
    output_interval: Option<f64>,
    use_cache: bool,
) -> AppResult<()> {
    let mut config = config_service::load_config(config_path)?;
    if let Some(t) = t_end {
        config.time.end_s = t;
    }
    if let Some(dt) = output_interval {
        config.time.output_interval_s = dt;
    }
    let store_dir = match out {
        Some(dir) => dir,
        None => RunStore::for_config(config_path)?.root_dir().to_path_buf(),
    };
    tracing::debug!(store = %store_dir.display(), use_cache, "run store selected");

    println!("Running transient simulation: {}", config.name);
    println!(
        "  t = {:.1} - {:.1} s, output every {:.3} s",
        config.time.start_s, config.time.end_s, config.time.output_interval_s
    );

    let options = RunOptions {
        use_cache,
        store_dir: Some(store_dir),
        ..Default::default()
    };

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let result = run_service::run(
        &config,
        &options,
        Some(&mut |event: RunProgressEvent| {
            let fraction = event
                .transient
                .as_ref()
                .map(|t| t.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_emit = Instant::now();
            }
        }),
    );
    clear_progress_line();

    let response = match result {
        Ok(response) => response,
        Err(AppError::RunFailed {
            message,
            last_output_s,
            run_id,
            saved_to,
        }) => {
            println!("✗ Run failed: {message}");
            match last_output_s {
                Some(t) => println!("  Last valid output: t = {t:.3} s"),
                None => println!("  No output recorded"),
            }
            if let Some(dir) = &saved_to {
                println!("  Partial results: {} ({})", dir.display(), run_id);
            }
            return Err(AppError::Simulation(message));
        }
        Err(e) => return Err(e),
    };

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
        print_timing_summary(&response.manifest);
    }
    if let Some(dir) = &response.saved_to {
        println!("  Saved to: {}", dir.display());
    }
    print_conversion_summary(&response.records);
    print_light_off(&response.light_off);
    Ok(())
}

/// Progress output is best effort; a failed flush is logged, not fatal.
fn flush_or_log(out: &mut impl Write) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "stdout flush failed");
            false
        }
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    flush_or_log(&mut io::stdout());
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.transient) {
        (RunStage::Integrating, Some(t)) => {
            let width = 28usize;
            let filled = ((t.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.1}/{:.1}s  steps={}  order={}  h={:.2e}s  elapsed={:.1}s",
                bar,
                t.fraction_complete * 100.0,
                t.sim_time_s,
                t.t_end_s,
                t.internal_steps,
                t.order,
                t.step_size_s,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    flush_or_log(&mut io::stdout());
}

fn print_timing_summary(manifest: &RunManifest) {
    let p = &manifest.perf;
    let total = p.total_time_s().max(1.0e-12);
    println!("\nTiming summary:");
    println!("  Setup:     {:.3}s", p.setup_time_s);
    println!(
        "  Integrate: {:.3}s ({:.1}%)",
        p.integrate_time_s,
        100.0 * p.integrate_time_s / total
    );
    println!("  Jacobian:  {:.3}s", p.jacobian_time_s);
    println!("  Record:    {:.3}s", p.record_time_s);
    println!("  Save:      {:.3}s", p.save_time_s);
    println!("  Total:     {:.3}s", p.total_time_s());
    println!(
        "  Steps: {} accepted, {} rejected; {} RHS, {} Jacobians, {} LU",
        p.internal_steps, p.rejected_steps, p.rhs_evals, p.jacobian_evals, p.lu_decompositions
    );
}

fn print_conversion_summary(records: &[TimeseriesRecord]) {
    let Some(last) = records.last() else {
        println!("  No outputs");
        return;
    };
    println!("  Time points: {}", records.len());
    println!(
        "  Final (t = {:.1} s, inlet {:.1} K): CO conversion {:.4}, HC conversion {:.4}",
        last.metrics.time_s,
        last.snapshot.inlet_temperature_k,
        last.metrics.co_conversion,
        last.metrics.hydrocarbon_conversion
    );
}

fn print_light_off(lo: &mc_results::LightOffMetrics) {
    match (lo.co_t50_s, lo.co_t50_inlet_k) {
        (Some(t), Some(k)) => println!("  CO light-off (50%): t = {t:.1} s at inlet {k:.1} K"),
        _ => println!("  CO light-off not reached (peak {:.4})", lo.peak_co_conversion),
    }
    match (lo.hydrocarbon_t50_s, lo.hydrocarbon_t50_inlet_k) {
        (Some(t), Some(k)) => println!("  HC light-off (50%): t = {t:.1} s at inlet {k:.1} K"),
        _ => println!(
            "  HC light-off not reached (peak {:.4})",
            lo.peak_hydrocarbon_conversion
        ),
    }
}

fn cmd_runs(store: &Path, name: Option<&str>) -> AppResult<()> {
    let runs = run_service::list_runs(store, name)?;
    if runs.is_empty() {
        println!("No stored runs in {}", store.display());
        return Ok(());
    }
    println!("Stored runs in {}:", store.display());
    for m in runs {
        let status = match &m.status {
            RunStatus::Completed => "completed".to_string(),
            RunStatus::Failed { t_reached_s, .. } => format!("failed at {t_reached_s:.3} s"),
        };
        println!("  {} {} ({}, {})", m.run_id, m.config_name, m.timestamp, status);
    }
    Ok(())
}

fn cmd_show(store: &Path, run_id: &str) -> AppResult<()> {
    let (manifest, records) = run_service::load_run(store, run_id)?;

    println!("Run {}", manifest.run_id);
    println!("  Config: {}", manifest.config_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Solver version: {}", manifest.solver_version);
    println!(
        "  Grid: nz={} ns={} nu={}",
        manifest.grid.nz, manifest.grid.ns, manifest.grid.nu
    );
    let RunType::Transient {
        t_start_s,
        t_end_s,
        output_interval_s,
        outputs,
    } = manifest.run_type;
    println!(
        "  Horizon: {t_start_s:.1} - {t_end_s:.1} s every {output_interval_s:.3} s ({outputs} outputs)"
    );
    match &manifest.status {
        RunStatus::Completed => println!("  Status: completed"),
        RunStatus::Failed {
            t_reached_s,
            message,
        } => println!("  Status: failed at t = {t_reached_s:.3} s: {message}"),
    }

    print_conversion_summary(&records);
    let snapshots: Vec<_> = records.iter().map(|r| r.snapshot.clone()).collect();
    let metrics: Vec<_> = records.iter().map(|r| r.metrics).collect();
    print_light_off(&mc_results::light_off_metrics(&snapshots, &metrics));
    Ok(())
}

fn cmd_export(store: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(store, run_id)?;

    let mut csv = String::from(
        "time_s,inlet_temperature_k,outlet_temperature_k,co_conversion,hc_conversion,co_rate_mol_s,hc_rate_mol_s,co_rate_per_volume,hc_rate_per_volume\n",
    );
    for r in &records {
        let m = &r.metrics;
        let outlet_t = r.snapshot.gas.temperature_k.last().copied().unwrap_or(f64::NAN);
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            m.time_s,
            r.snapshot.inlet_temperature_k,
            outlet_t,
            m.co_conversion,
            m.hydrocarbon_conversion,
            m.co_rate_mol_s,
            m.hydrocarbon_rate_mol_s,
            m.co_rate_per_volume,
            m.hydrocarbon_rate_per_volume
        ));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} rows to {}", records.len(), path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_default_config() -> AppResult<()> {
    let yaml = serde_yaml::to_string(&MonolithConfig::default())
        .map_err(|e| AppError::Config(format!("failed to serialise default config: {e}")))?;
    print!("{}", yaml);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn failed_flush_is_reported_not_fatal() {
        assert!(!flush_or_log(&mut BrokenPipe));
        assert!(flush_or_log(&mut Vec::<u8>::new()));
    }
}
