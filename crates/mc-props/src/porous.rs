//! Diffusion through the porous washcoat.

use crate::gas::binary_diffusivity;
use crate::solid::WashcoatSolid;
use crate::species::{Species, TRACKED};
use crate::PropsResult;
use mc_core::ensure_positive;

/// Knudsen prefactor for a cylindrical pore, `Dk = 97·r·sqrt(T/M)` (SI, M in g/mol).
const KNUDSEN_PREFACTOR: f64 = 97.0;

/// Parallel-pore description of the washcoat.
#[derive(Clone, Debug, PartialEq)]
pub struct PorousMedium {
    /// Equivalent pore radius [m]
    pub pore_radius_m: f64,
    /// Gas volume per washcoat volume [-]
    pub porosity: f64,
    /// Tortuosity [-]
    pub tortuosity: f64,
    /// Constrictivity factor [-]
    pub constrictivity: f64,
}

impl Default for PorousMedium {
    fn default() -> Self {
        Self {
            pore_radius_m: 13.3e-9,
            porosity: 0.5,
            tortuosity: 4.0,
            constrictivity: 1.0,
        }
    }
}

/// Knudsen diffusivity in a pore of radius `pore_radius` [m²/s].
pub fn knudsen_diffusivity(species: Species, t_k: f64, pore_radius: f64) -> PropsResult<f64> {
    let t = ensure_positive(t_k, "Knudsen diffusivity temperature")?;
    Ok(KNUDSEN_PREFACTOR * pore_radius * (t / species.molar_mass()).sqrt())
}

/// Molecular and Knudsen resistances in series.
pub fn pore_diffusivity(molecular: f64, knudsen: f64) -> f64 {
    1.0 / (1.0 / molecular + 1.0 / knudsen)
}

impl PorousMedium {
    /// Pore diffusivity scaled by porosity, constrictivity and tortuosity.
    pub fn effective_diffusivity(&self, pore_diffusivity: f64) -> f64 {
        self.constrictivity * self.porosity * pore_diffusivity / self.tortuosity
    }
}

/// All washcoat-phase quantities needed at one (axial, radial) node.
#[derive(Clone, Debug, PartialEq)]
pub struct WashcoatProperties {
    /// Effective diffusivity per tracked species [m²/s]
    pub effective_diffusivity: [f64; 3],
    pub conductivity: f64,
    pub density: f64,
    pub heat_capacity: f64,
    /// k/(ρ·cp) of the solid [m²/s]
    pub thermal_diffusivity: f64,
}

impl WashcoatProperties {
    pub fn evaluate(
        medium: &PorousMedium,
        solid: &WashcoatSolid,
        pressure_pa: f64,
        t_k: f64,
    ) -> PropsResult<Self> {
        let mut effective_diffusivity = [0.0; 3];
        for (k, species) in TRACKED.iter().enumerate() {
            let dm = binary_diffusivity(*species, t_k, pressure_pa)?;
            let dk = knudsen_diffusivity(*species, t_k, medium.pore_radius_m)?;
            effective_diffusivity[k] = medium.effective_diffusivity(pore_diffusivity(dm, dk));
        }
        let conductivity = solid.conductivity(t_k)?;
        let heat_capacity = solid.heat_capacity(t_k)?;
        let density = solid.density_kg_m3;
        Ok(Self {
            effective_diffusivity,
            conductivity,
            density,
            heat_capacity,
            thermal_diffusivity: conductivity / (density * heat_capacity),
        })
    }
}
