//! Collects snapshots in output order and derives outlet metrics from them.

use crate::types::{DerivedMetrics, Snapshot, TimeseriesRecord};
use crate::{ResultsError, ResultsResult};
use mc_project::MonolithConfig;
use std::f64::consts::PI;

/// Constants the derived metrics depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecorderParams {
    pub inlet_co: f64,
    pub inlet_hydrocarbon: f64,
    /// Total molar flow through the slice [mol/s]
    pub molar_flow_mol_s: f64,
    /// Slice volume including voidage [m³]
    pub slice_volume_m3: f64,
}

impl RecorderParams {
    pub fn from_config(config: &MonolithConfig) -> Self {
        let g = &config.geometry;
        let area = PI * (g.monolith_diameter_m / 2.0).powi(2);
        Self {
            inlet_co: config.operating.inlet.co,
            inlet_hydrocarbon: config.operating.inlet.hydrocarbon,
            molar_flow_mol_s: config.operating.molar_flow_mol_s,
            slice_volume_m3: area * g.channel_length_m,
        }
    }
}

/// `(inlet − outlet)/inlet`, or zero for an absent species.
fn conversion(inlet: f64, outlet: f64) -> f64 {
    if inlet == 0.0 { 0.0 } else { (inlet - outlet) / inlet }
}

#[derive(Debug, Clone)]
pub struct ResultRecorder {
    params: RecorderParams,
    snapshots: Vec<Snapshot>,
}

impl ResultRecorder {
    pub fn new(params: RecorderParams) -> Self {
        Self {
            params,
            snapshots: Vec::new(),
        }
    }

    pub fn params(&self) -> &RecorderParams {
        &self.params
    }

    /// Append a snapshot. Times must be strictly increasing and the gas
    /// fields non-empty.
    pub fn record(&mut self, snapshot: Snapshot) -> ResultsResult<()> {
        if snapshot.gas.outlet().is_none() {
            return Err(ResultsError::Snapshot {
                time_s: snapshot.time_s,
                message: "gas fields are empty".into(),
            });
        }
        if let Some(last) = self.snapshots.last() {
            if snapshot.time_s <= last.time_s {
                return Err(ResultsError::Snapshot {
                    time_s: snapshot.time_s,
                    message: format!("not after previous output at {} s", last.time_s),
                });
            }
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Metrics of one snapshot; a pure function of its outlet values.
    pub fn metrics(&self, snapshot: &Snapshot) -> DerivedMetrics {
        let p = &self.params;
        let (co_out, hc_out) = snapshot.gas.outlet().unwrap_or((p.inlet_co, p.inlet_hydrocarbon));
        let co_rate = p.molar_flow_mol_s * (p.inlet_co - co_out);
        let hc_rate = p.molar_flow_mol_s * (p.inlet_hydrocarbon - hc_out);
        DerivedMetrics {
            time_s: snapshot.time_s,
            co_rate_mol_s: co_rate,
            hydrocarbon_rate_mol_s: hc_rate,
            co_rate_per_volume: co_rate / p.slice_volume_m3,
            hydrocarbon_rate_per_volume: hc_rate / p.slice_volume_m3,
            co_conversion: conversion(p.inlet_co, co_out),
            hydrocarbon_conversion: conversion(p.inlet_hydrocarbon, hc_out),
        }
    }

    pub fn derive_all(&self) -> Vec<DerivedMetrics> {
        self.snapshots.iter().map(|s| self.metrics(s)).collect()
    }

    /// Pair every snapshot with its metrics, in output order.
    pub fn records(&self) -> Vec<TimeseriesRecord> {
        self.snapshots
            .iter()
            .map(|s| TimeseriesRecord {
                snapshot: s.clone(),
                metrics: self.metrics(s),
            })
            .collect()
    }
}
