//! Lightweight performance timing utilities.
//!
//! Counters are owned by the run that collects them; nothing here is global.

use std::time::{Duration, Instant};

/// A simple timer that measures elapsed time.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create and start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time in seconds without stopping.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Stop the timer and return elapsed time in seconds.
    pub fn stop(self) -> f64 {
        self.elapsed_s()
    }
}

/// Accumulating timer for tracking total time across multiple calls.
#[derive(Clone, Debug, Default)]
pub struct AccumulatingTimer {
    total: Duration,
    count: u64,
}

impl AccumulatingTimer {
    /// Record a timing measurement.
    pub fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.count += 1;
    }

    /// Time a closure and record it.
    pub fn time<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record(start.elapsed());
        out
    }

    /// Get total time spent (in seconds).
    pub fn total_seconds(&self) -> f64 {
        self.total.as_secs_f64()
    }

    /// Get number of calls.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Get average time per call (in seconds).
    pub fn average_seconds(&self) -> f64 {
        if self.count > 0 {
            self.total_seconds() / self.count as f64
        } else {
            0.0
        }
    }
}

/// Performance statistics collected over one simulation run.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerfStats {
    pub setup_time_s: f64,
    pub integrate_time_s: f64,
    pub record_time_s: f64,
    pub save_time_s: f64,
    pub internal_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evals: usize,
    pub jacobian_evals: usize,
    pub lu_decompositions: usize,
    /// Wall time spent forming finite-difference Jacobians
    pub jacobian_time_s: f64,
}

impl PerfStats {
    pub fn total_time_s(&self) -> f64 {
        self.setup_time_s + self.integrate_time_s + self.record_time_s + self.save_time_s
    }
}
