//! Quantities derived once per run from the catalyst and geometry inputs.

use mc_core::constants::{AVOGADRO, M2_PER_IN2};
use mc_project::MonolithConfig;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalystDerived {
    pub cells_per_m2: f64,
    /// Monolith cross-section [m²]
    pub cross_section_m2: f64,
    pub cell_count: f64,
    /// Volume of the slice including voidage [m³]
    pub slice_volume_m3: f64,
    /// Active-site density `H` [mol Pt / m² cat]
    pub site_density_mol_m2: f64,
    /// Internal surface per washcoat volume `Av` [m² / m³]
    pub surface_per_volume_m2_m3: f64,
    /// Gas to solid volume ratio within the washcoat
    pub gas_to_solid_ratio: f64,
    pub pt_atoms_deposited: f64,
    pub pt_surface_atoms: f64,
    pub dispersion: f64,
    /// Specific Pt surface [m² / g Pt]
    pub specific_surface_m2_g: f64,
    /// `1 / (Ssp · MPt)` [mol / m²]
    pub surface_inverse: f64,
}

impl CatalystDerived {
    pub fn from_config(config: &MonolithConfig) -> Self {
        let g = &config.geometry;
        let c = &config.catalyst;
        let por = config.porous.porosity;

        let cells_per_m2 = g.cells_per_square_inch / M2_PER_IN2;
        let cross_section_m2 = PI * (g.monolith_diameter_m / 2.0).powi(2);
        let pt_atoms_deposited = c.pt_mass_fraction * AVOGADRO / c.pt_molar_mass_g_mol;
        let pt_surface_atoms = c.pt_loading_mol_per_g * AVOGADRO;
        let dispersion = pt_surface_atoms / pt_atoms_deposited;
        let specific_surface_m2_g = c.pt_atom_area_m2 * AVOGADRO * dispersion / c.pt_molar_mass_g_mol;

        Self {
            cells_per_m2,
            cross_section_m2,
            cell_count: cells_per_m2 * cross_section_m2,
            slice_volume_m3: cross_section_m2 * g.channel_length_m,
            site_density_mol_m2: c.pt_loading_mol_per_g / c.bet_area_m2_per_g,
            surface_per_volume_m2_m3: c.bet_area_m2_per_g * c.washcoat_density_g_m3,
            gas_to_solid_ratio: por / (1.0 - por),
            pt_atoms_deposited,
            pt_surface_atoms,
            dispersion,
            specific_surface_m2_g,
            surface_inverse: 1.0 / (specific_surface_m2_g * c.pt_molar_mass_g_mol),
        }
    }

    /// `H·Av / r_gtc`: converts a site rate into a washcoat-gas source.
    pub fn species_source_factor(&self) -> f64 {
        self.site_density_mol_m2 * self.surface_per_volume_m2_m3 / self.gas_to_solid_ratio
    }

    /// `H·Av`: converts a site rate into a volumetric rate.
    pub fn volumetric_factor(&self) -> f64 {
        self.site_density_mol_m2 * self.surface_per_volume_m2_m3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_values() {
        let d = CatalystDerived::from_config(&MonolithConfig::default());
        assert_relative_eq!(d.site_density_mol_m2, 2e-8, max_relative = 1e-12);
        assert_relative_eq!(d.surface_per_volume_m2_m3, 1.3e8, max_relative = 1e-12);
        assert_relative_eq!(d.gas_to_solid_ratio, 1.0, max_relative = 1e-12);
        assert_relative_eq!(d.slice_volume_m3, PI * 0.053 * 0.053 * 0.005, max_relative = 1e-12);
        assert_relative_eq!(d.cells_per_m2, 400.0 / 0.000645, max_relative = 1e-12);
        assert!(d.dispersion > 0.0 && d.dispersion < 1.0);
        assert_relative_eq!(
            d.surface_inverse * d.specific_surface_m2_g * 195.08,
            1.0,
            max_relative = 1e-12
        );
    }
}
