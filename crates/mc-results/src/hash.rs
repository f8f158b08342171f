//! Content-based hashing for run IDs.

use crate::types::RunType;
use mc_project::MonolithConfig;
use sha2::{Digest, Sha256};

/// SHA-256 over the configuration, the run type and the solver version.
pub fn compute_run_id(config: &MonolithConfig, run_type: &RunType, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    let run_type_json = serde_json::to_string(run_type).unwrap_or_default();
    hasher.update(run_type_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    format!("{:x}", hasher.finalize())
}
