//! Piecewise-linear inlet gas temperature program.

use crate::error::{SimError, SimResult};
use mc_project::{MonolithConfig, SegmentDef};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Leg {
    start_s: f64,
    end_s: f64,
    start_temperature_k: f64,
    slope_k_per_s: f64,
}

/// Maps simulated time to the inlet gas temperature.
///
/// Legs are half-open `[start, end)` in time since `origin_s`; the final leg
/// also includes its end. Outside the program the inlet holds at the nominal
/// temperature.
#[derive(Clone, Debug, PartialEq)]
pub struct InletTemperatureProgram {
    origin_s: f64,
    nominal_k: f64,
    legs: Vec<Leg>,
}

impl InletTemperatureProgram {
    /// Build the program starting from `nominal_k`. Slopes are fixed here.
    pub fn new(origin_s: f64, nominal_k: f64, segments: &[SegmentDef]) -> SimResult<Self> {
        let mut legs = Vec::with_capacity(segments.len());
        let mut t = 0.0;
        let mut temperature = nominal_k;
        for (k, seg) in segments.iter().enumerate() {
            if !(seg.duration_s.is_finite() && seg.duration_s > 0.0) {
                return Err(SimError::Config {
                    what: format!("schedule segment {k} has non-positive duration"),
                });
            }
            legs.push(Leg {
                start_s: t,
                end_s: t + seg.duration_s,
                start_temperature_k: temperature,
                slope_k_per_s: (seg.end_temperature_k - temperature) / seg.duration_s,
            });
            t += seg.duration_s;
            temperature = seg.end_temperature_k;
        }
        Ok(Self {
            origin_s,
            nominal_k,
            legs,
        })
    }

    pub fn from_config(config: &MonolithConfig) -> SimResult<Self> {
        Self::new(
            config.time.start_s,
            config.operating.inlet_temperature_k,
            &config.schedule.segments,
        )
    }

    /// Total programmed duration [s].
    pub fn duration_s(&self) -> f64 {
        self.legs.last().map_or(0.0, |leg| leg.end_s)
    }

    /// Inlet temperature at absolute simulated time `t` [K].
    pub fn temperature(&self, t: f64) -> f64 {
        let elapsed = t - self.origin_s;
        if elapsed < 0.0 {
            return self.nominal_k;
        }
        let last = self.legs.len().saturating_sub(1);
        for (k, leg) in self.legs.iter().enumerate() {
            let inside = elapsed < leg.end_s || (k == last && elapsed <= leg.end_s);
            if elapsed >= leg.start_s && inside {
                return leg.start_temperature_k + leg.slope_k_per_s * (elapsed - leg.start_s);
            }
        }
        self.nominal_k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> InletTemperatureProgram {
        InletTemperatureProgram::from_config(&MonolithConfig::default()).unwrap()
    }

    #[test]
    fn reference_breakpoints() {
        let p = reference();
        assert_eq!(p.temperature(0.0), 417.0);
        assert_relative_eq!(p.temperature(200.0), 505.0, epsilon = 1e-12);
        assert_relative_eq!(p.temperature(700.0), 543.0, epsilon = 1e-12);
        assert_relative_eq!(p.temperature(1000.0), 543.0, epsilon = 1e-12);
        assert_relative_eq!(p.temperature(1800.0), 417.0, epsilon = 1e-12);
        assert_eq!(p.temperature(2500.0), 417.0);
        assert_eq!(p.duration_s(), 1800.0);
    }

    #[test]
    fn midpoints_interpolate() {
        let p = reference();
        assert_relative_eq!(p.temperature(100.0), 461.0, epsilon = 1e-12);
        assert_relative_eq!(p.temperature(850.0), 543.0, epsilon = 1e-12);
        assert_relative_eq!(p.temperature(1050.0), 514.0, epsilon = 1e-12);
    }

    #[test]
    fn breakpoint_uses_next_leg() {
        // 200 s is the first instant of the second leg; both formulas agree.
        let p = reference();
        let below = p.temperature(200.0 - 1e-9);
        let at = p.temperature(200.0);
        assert!((below - at).abs() < 1e-6);
    }

    #[test]
    fn holds_nominal_before_origin() {
        let p = InletTemperatureProgram::new(
            10.0,
            400.0,
            &[SegmentDef {
                duration_s: 10.0,
                end_temperature_k: 500.0,
            }],
        )
        .unwrap();
        assert_eq!(p.temperature(5.0), 400.0);
        assert_relative_eq!(p.temperature(15.0), 450.0, epsilon = 1e-12);
        assert_eq!(p.temperature(20.0), 500.0);
        assert_eq!(p.temperature(20.5), 400.0);
    }

    #[test]
    fn empty_program_is_constant() {
        let p = InletTemperatureProgram::new(0.0, 417.0, &[]).unwrap();
        assert_eq!(p.temperature(123.0), 417.0);
    }
}
