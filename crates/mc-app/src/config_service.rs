//! Configuration loading, saving and introspection.

use std::path::Path;

use mc_project::{MonolithConfig, ProjectError, SubstrateCoupling};
use mc_sim::{MonolithModel, TransientModel};

use crate::error::{AppError, AppResult};

/// What a configuration will run, for listing and confirmation.
#[derive(Debug, Clone)]
pub struct ConfigSummary {
    pub name: String,
    pub nz: usize,
    pub ns: usize,
    pub nu: usize,
    /// Length of the integrated state vector
    pub state_dimension: usize,
    pub substrate_integrated: bool,
    pub rate_law: String,
    pub t_start_s: f64,
    pub t_end_s: f64,
    pub outputs: usize,
    pub schedule_duration_s: f64,
}

/// Load and validate a configuration; `.json` files are JSON, others YAML.
pub fn load_config(path: &Path) -> AppResult<MonolithConfig> {
    mc_project::load(path).map_err(|e| match e {
        ProjectError::Io(source) => AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

pub fn save_config(path: &Path, config: &MonolithConfig) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => mc_project::save_json(path, config)?,
        _ => mc_project::save_yaml(path, config)?,
    }
    Ok(())
}

/// Validate `config` by building the model it describes.
pub fn summarize(config: &MonolithConfig) -> AppResult<ConfigSummary> {
    mc_project::validate_config(config)?;
    let model = MonolithModel::from_config(config)?;
    let layout = model.layout();
    Ok(ConfigSummary {
        name: config.name.clone(),
        nz: layout.nz,
        ns: layout.ns,
        nu: layout.nu,
        state_dimension: model.dimension(),
        substrate_integrated: config.substrate.coupling == SubstrateCoupling::Conduction,
        rate_law: model.rate_law_name().to_string(),
        t_start_s: config.time.start_s,
        t_end_s: config.time.end_s,
        outputs: config.time.output_times().len(),
        schedule_duration_s: config.schedule.total_duration_s(),
    })
}

pub fn validate_file(path: &Path) -> AppResult<ConfigSummary> {
    summarize(&load_config(path)?)
}
