//! Result data types.

use mc_core::timing::PerfStats;
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub config_name: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub run_type: RunType,
    pub status: RunStatus,
    pub solver_version: String,
    pub grid: GridShape,
    #[serde(default)]
    pub perf: PerfStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunType {
    Transient {
        t_start_s: f64,
        t_end_s: f64,
        output_interval_s: f64,
        outputs: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    /// The run stopped early; the stored timeseries ends at the last output
    /// reached.
    Failed { t_reached_s: f64, message: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridShape {
    pub nz: usize,
    pub ns: usize,
    pub nu: usize,
}

/// Gas-phase fields along the channel, one value per axial node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GasSnapshot {
    pub co: Vec<f64>,
    pub co2: Vec<f64>,
    pub hydrocarbon: Vec<f64>,
    pub temperature_k: Vec<f64>,
}

impl GasSnapshot {
    /// Outlet (last axial node) values of CO and hydrocarbon.
    pub fn outlet(&self) -> Option<(f64, f64)> {
        Some((*self.co.last()?, *self.hydrocarbon.last()?))
    }
}

/// A two-dimensional field stored row-major as `[axial][radial]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LayerSnapshot {
    pub co: Vec<f64>,
    pub co2: Vec<f64>,
    pub hydrocarbon: Vec<f64>,
    pub temperature_k: Vec<f64>,
}

/// Every field at one output time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub time_s: f64,
    pub inlet_temperature_k: f64,
    pub gas: GasSnapshot,
    pub washcoat: LayerSnapshot,
    /// Substrate temperature, row-major `[axial][radial]`
    pub substrate_temperature_k: Vec<f64>,
}

/// Outlet-based aggregates at one output time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct DerivedMetrics {
    pub time_s: f64,
    /// `F·(Y_in − Y_out)` [mol/s]
    pub co_rate_mol_s: f64,
    pub hydrocarbon_rate_mol_s: f64,
    /// Rate per slice volume [mol/(s·m³)]
    pub co_rate_per_volume: f64,
    pub hydrocarbon_rate_per_volume: f64,
    pub co_conversion: f64,
    pub hydrocarbon_conversion: f64,
}

/// One line of `timeseries.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesRecord {
    pub snapshot: Snapshot,
    pub metrics: DerivedMetrics,
}
