//! Configuration schema definitions.
//!
//! Every section implements `Default` with the reference operating point, and
//! every struct is `#[serde(default)]`, so a file only needs to name the values
//! it changes.

use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonolithConfig {
    pub version: u32,
    pub name: String,
    pub geometry: GeometryDef,
    pub operating: OperatingDef,
    pub catalyst: CatalystDef,
    pub porous: PorousDef,
    pub kinetics: KineticsDef,
    pub grid: GridDef,
    pub schedule: ScheduleDef,
    pub time: TimeDef,
    pub solver: SolverDef,
    pub substrate: SubstrateDef,
}

impl Default for MonolithConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            name: "reference".to_string(),
            geometry: GeometryDef::default(),
            operating: OperatingDef::default(),
            catalyst: CatalystDef::default(),
            porous: PorousDef::default(),
            kinetics: KineticsDef::default(),
            grid: GridDef::default(),
            schedule: ScheduleDef::default(),
            time: TimeDef::default(),
            solver: SolverDef::default(),
            substrate: SubstrateDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryDef {
    pub channel_radius_m: f64,
    pub washcoat_thickness_m: f64,
    pub substrate_thickness_m: f64,
    /// Length of the simulated slice
    pub channel_length_m: f64,
    pub monolith_diameter_m: f64,
    pub cells_per_square_inch: f64,
    pub hydraulic_diameter_m: f64,
    /// Mass of the slice, reported only
    pub slice_mass_g: f64,
}

impl Default for GeometryDef {
    fn default() -> Self {
        Self {
            channel_radius_m: 5.45e-4,
            washcoat_thickness_m: 20e-6,
            substrate_thickness_m: 90e-6,
            channel_length_m: 0.005,
            monolith_diameter_m: 0.106,
            cells_per_square_inch: 400.0,
            hydraulic_diameter_m: 1.09e-3,
            slice_mass_g: 27.6316,
        }
    }
}

/// Mole fractions of the tracked species.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompositionDef {
    pub co: f64,
    pub co2: f64,
    pub hydrocarbon: f64,
}

impl Default for CompositionDef {
    fn default() -> Self {
        Self {
            co: 3000e-6,
            co2: 0.0,
            hydrocarbon: 500e-6,
        }
    }
}

impl CompositionDef {
    pub fn as_array(&self) -> [f64; 3] {
        [self.co, self.co2, self.hydrocarbon]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OperatingDef {
    /// Composition filling the channel and washcoat at t = start
    pub initial: CompositionDef,
    /// Composition entering the channel, constant over the run
    pub inlet: CompositionDef,
    pub initial_temperature_k: f64,
    /// Nominal inlet temperature; the schedule starts and ends here
    pub inlet_temperature_k: f64,
    pub pressure_pa: f64,
    pub mean_velocity_m_s: f64,
    pub molar_flow_mol_s: f64,
    pub o2_mole_fraction: f64,
    pub prandtl: f64,
}

impl Default for OperatingDef {
    fn default() -> Self {
        Self {
            initial: CompositionDef::default(),
            inlet: CompositionDef::default(),
            initial_temperature_k: 417.0,
            inlet_temperature_k: 417.0,
            pressure_pa: 101_325.0,
            mean_velocity_m_s: 2.4,
            molar_flow_mol_s: 0.64,
            o2_mole_fraction: 0.0933,
            prandtl: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalystDef {
    /// Pt loading from chemisorption [mol Pt / g cat]
    pub pt_loading_mol_per_g: f64,
    /// BET surface [m² / g cat]
    pub bet_area_m2_per_g: f64,
    /// Washcoat bulk density [g/m³]
    pub washcoat_density_g_m3: f64,
    /// Substrate density [g/m³]
    pub substrate_density_g_m3: f64,
    /// Pt mass fraction by weighing [g Pt / g cat]
    pub pt_mass_fraction: f64,
    pub pt_molar_mass_g_mol: f64,
    /// Area occupied by one surface Pt atom [m²]
    pub pt_atom_area_m2: f64,
    pub substrate_conductivity_w_m_k: f64,
    pub substrate_heat_capacity_j_kg_k: f64,
}

impl Default for CatalystDef {
    fn default() -> Self {
        Self {
            pt_loading_mol_per_g: 2.0e-6,
            bet_area_m2_per_g: 100.0,
            washcoat_density_g_m3: 1.3e6,
            substrate_density_g_m3: 2.5e6,
            pt_mass_fraction: 0.005468,
            pt_molar_mass_g_mol: 195.08,
            pt_atom_area_m2: 8.07e-20,
            substrate_conductivity_w_m_k: 2.5,
            substrate_heat_capacity_j_kg_k: 900.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PorousDef {
    pub pore_radius_m: f64,
    pub porosity: f64,
    pub tortuosity: f64,
    pub constrictivity: f64,
}

impl Default for PorousDef {
    fn default() -> Self {
        Self {
            pore_radius_m: 13.3e-9,
            porosity: 0.5,
            tortuosity: 4.0,
            constrictivity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KineticsDef {
    /// When false every rate is zero and the model is pure transport.
    pub enabled: bool,
    /// Pre-exponential factors of k1..k5
    pub pre_exponential: [f64; 5],
    /// Signed activation temperatures of k1..k5 [K]; `k = A·exp(E/T)`
    pub activation_k: [f64; 5],
    pub co_heat_of_reaction_j_mol: f64,
}

impl Default for KineticsDef {
    fn default() -> Self {
        Self {
            enabled: true,
            pre_exponential: [0.729e21, 965.5, 4.042e15, 2080.0, 3.98],
            activation_k: [-12_556.0, 961.0, -1.08e4, 361.0, 11_611.0],
            co_heat_of_reaction_j_mol: -282.55e3,
        }
    }
}

/// Discretisation of the gas-phase convective term.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxialScheme {
    /// `(x[i] - x[i-1]) / dz`
    #[default]
    Upwind,
    /// `(x[i+1] - x[i-1]) / (2 dz)` in the interior
    Central,
}

/// Treatment of the gas/washcoat interface node and the radial operator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WashcoatClosure {
    /// Wall node `4D(x1-x0)/ds²` plus film flux over a full cell, with the
    /// `(1/s)·∂x/∂s` term measured from the wall. Does not converge under
    /// radial refinement.
    #[default]
    Reference,
    /// Planar finite volume: half cells at both faces, film flux over `ds/2`.
    Slab,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridDef {
    pub nz: usize,
    pub ns: usize,
    pub nu: usize,
    pub axial_scheme: AxialScheme,
    pub washcoat_closure: WashcoatClosure,
}

impl Default for GridDef {
    fn default() -> Self {
        Self {
            nz: 5,
            ns: 5,
            nu: 3,
            axial_scheme: AxialScheme::Upwind,
            washcoat_closure: WashcoatClosure::Reference,
        }
    }
}

/// One leg of the inlet temperature program: a linear ramp from the previous
/// end temperature to `end_temperature_k` over `duration_s`. A leg whose end
/// temperature equals the previous one is a hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    pub duration_s: f64,
    pub end_temperature_k: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleDef {
    pub segments: Vec<SegmentDef>,
}

impl Default for ScheduleDef {
    fn default() -> Self {
        let legs = [
            (200.0, 505.0),
            (500.0, 543.0),
            (300.0, 543.0),
            (100.0, 485.0),
            (200.0, 445.0),
            (500.0, 417.0),
        ];
        Self {
            segments: legs
                .iter()
                .map(|&(duration_s, end_temperature_k)| SegmentDef {
                    duration_s,
                    end_temperature_k,
                })
                .collect(),
        }
    }
}

impl ScheduleDef {
    pub fn total_duration_s(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_s).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeDef {
    pub start_s: f64,
    pub end_s: f64,
    pub output_interval_s: f64,
}

impl Default for TimeDef {
    fn default() -> Self {
        Self {
            start_s: 0.0,
            end_s: 1800.0,
            output_interval_s: 1.0,
        }
    }
}

impl TimeDef {
    /// Output times `start, start + dt, ..., end`. The last interval is
    /// shortened when the horizon is not a whole number of intervals.
    pub fn output_times(&self) -> Vec<f64> {
        let span = self.end_s - self.start_s;
        if !(span > 0.0 && self.output_interval_s > 0.0) {
            return vec![self.start_s];
        }
        let n = (span / self.output_interval_s + 1e-9).floor() as usize;
        let mut times: Vec<f64> = (0..=n)
            .map(|k| self.start_s + k as f64 * self.output_interval_s)
            .collect();
        let tol = 1e-6 * self.output_interval_s;
        match times.last_mut() {
            Some(last) if (self.end_s - *last).abs() <= tol => *last = self.end_s,
            Some(_) => times.push(self.end_s),
            None => {}
        }
        times
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverDef {
    pub atol: f64,
    pub rtol: f64,
    /// Budget of internal steps over the whole run
    pub max_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_step_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_step_s: Option<f64>,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            atol: 1e-5,
            rtol: 1e-5,
            max_steps: 500_000,
            first_step_s: None,
            max_step_s: None,
        }
    }
}

/// How the substrate layer takes part in the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubstrateCoupling {
    /// Field is reported, held at the initial temperature, never integrated.
    #[default]
    Inactive,
    /// Field is integrated with radial and axial conduction and exchanges
    /// heat with the washcoat outer node.
    Conduction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SubstrateDef {
    pub coupling: SubstrateCoupling,
}
