//! Solid-phase thermal correlations.

use crate::PropsResult;
use mc_core::ensure_positive;

/// Alumina washcoat solid.
#[derive(Clone, Debug, PartialEq)]
pub struct WashcoatSolid {
    /// Bulk density [kg/m³]
    pub density_kg_m3: f64,
}

impl Default for WashcoatSolid {
    fn default() -> Self {
        Self {
            density_kg_m3: 1300.0,
        }
    }
}

impl WashcoatSolid {
    /// Thermal conductivity [W/(m·K)], linear in temperature.
    pub fn conductivity(&self, t_k: f64) -> PropsResult<f64> {
        let t = ensure_positive(t_k, "washcoat conductivity temperature")?;
        Ok(ensure_positive(0.9558 - 2.09e-4 * t, "washcoat conductivity")?)
    }

    /// Heat capacity [J/(kg·K)], linear in temperature.
    pub fn heat_capacity(&self, t_k: f64) -> PropsResult<f64> {
        let t = ensure_positive(t_k, "washcoat heat capacity temperature")?;
        Ok(948.0 + 0.2268 * t)
    }
}

/// Cordierite substrate with temperature-independent properties.
#[derive(Clone, Debug, PartialEq)]
pub struct SubstrateSolid {
    pub density_kg_m3: f64,
    pub conductivity: f64,
    pub heat_capacity: f64,
}

impl Default for SubstrateSolid {
    fn default() -> Self {
        Self {
            density_kg_m3: 2500.0,
            conductivity: 2.5,
            heat_capacity: 900.0,
        }
    }
}

impl SubstrateSolid {
    pub fn thermal_diffusivity(&self) -> f64 {
        self.conductivity / (self.density_kg_m3 * self.heat_capacity)
    }
}
