//! Light-off summary of a conversion history.

use crate::types::{DerivedMetrics, Snapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct LightOffMetrics {
    /// First time CO conversion reaches 50% [s]
    pub co_t50_s: Option<f64>,
    /// Inlet temperature at that time [K]
    pub co_t50_inlet_k: Option<f64>,
    pub hydrocarbon_t50_s: Option<f64>,
    pub hydrocarbon_t50_inlet_k: Option<f64>,
    pub peak_co_conversion: f64,
    pub peak_hydrocarbon_conversion: f64,
}

/// Linear interpolation of the first upward crossing of `level` in
/// `(x, y, z)` samples, returning the interpolated `(x, z)`.
fn first_crossing(samples: &[(f64, f64, f64)], level: f64) -> Option<(f64, f64)> {
    let first = samples.first()?;
    if first.1 >= level {
        return Some((first.0, first.2));
    }
    samples.windows(2).find_map(|w| {
        let (a, b) = (w[0], w[1]);
        if a.1 < level && b.1 >= level {
            let f = (level - a.1) / (b.1 - a.1);
            Some((a.0 + f * (b.0 - a.0), a.2 + f * (b.2 - a.2)))
        } else {
            None
        }
    })
}

/// Summarise `metrics` against the matching `snapshots` (for inlet
/// temperatures). Both slices are in output order and of equal length.
pub fn light_off_metrics(snapshots: &[Snapshot], metrics: &[DerivedMetrics]) -> LightOffMetrics {
    let n = snapshots.len().min(metrics.len());
    let series = |pick: fn(&DerivedMetrics) -> f64| -> Vec<(f64, f64, f64)> {
        (0..n)
            .map(|k| (metrics[k].time_s, pick(&metrics[k]), snapshots[k].inlet_temperature_k))
            .collect()
    };
    let co = series(|m| m.co_conversion);
    let hc = series(|m| m.hydrocarbon_conversion);
    let peak = |s: &[(f64, f64, f64)]| s.iter().map(|p| p.1).fold(0.0, f64::max);

    let co_t50 = first_crossing(&co, 0.5);
    let hc_t50 = first_crossing(&hc, 0.5);
    LightOffMetrics {
        co_t50_s: co_t50.map(|p| p.0),
        co_t50_inlet_k: co_t50.map(|p| p.1),
        hydrocarbon_t50_s: hc_t50.map(|p| p.0),
        hydrocarbon_t50_inlet_k: hc_t50.map(|p| p.1),
        peak_co_conversion: peak(&co),
        peak_hydrocarbon_conversion: peak(&hc),
    }
}
