//! Optional conduction through the cordierite substrate.
//!
//! Substrate node `k` sits at depth `(k+1)·du` behind the washcoat outer edge,
//! so node 0 sees the washcoat outer temperature one spacing away. The outer
//! face is insulated and axial conduction is reflective at both ends.

use crate::grid::Grid;
use crate::layout::{StateLayout, TEMPERATURE};
use crate::stencil::{gas_curvature, reflective_curvature};
use mc_props::SubstrateSolid;

#[derive(Clone, Debug, PartialEq)]
pub struct SubstrateConduction {
    pub solid: SubstrateSolid,
}

impl SubstrateConduction {
    pub fn new(solid: SubstrateSolid) -> Self {
        Self { solid }
    }

    /// Heat flux from the substrate into the washcoat outer node [W/m²].
    pub fn interface_flux(&self, t_washcoat_k: f64, t_substrate_k: f64, du: f64) -> f64 {
        self.solid.conductivity * (t_substrate_k - t_washcoat_k) / du
    }

    /// Rate of temperature change the interface flux causes in the washcoat
    /// outer half-cell.
    pub fn washcoat_heating(&self, flux: f64, ds: f64, rho_cp: f64) -> f64 {
        2.0 * flux / (ds * rho_cp)
    }

    /// Write substrate temperature derivatives into `dx`.
    pub fn rhs(&self, xs: &[f64], layout: &StateLayout, grid: &Grid, dx: &mut [f64]) {
        let alpha = self.solid.thermal_diffusivity();
        let (nz, ns, nu) = (layout.nz, layout.ns, layout.nu);
        let du = grid.substrate.spacing;
        let dz = grid.axial.spacing;
        for i in 0..nz {
            let t_interface = xs[layout.washcoat(TEMPERATURE, i, ns - 1)];
            for k in 0..nu {
                let radial = gas_curvature(|m| xs[layout.substrate(i, m)], t_interface, nu, k, du);
                let axial = reflective_curvature(|m| xs[layout.substrate(m, k)], nz, i, dz);
                dx[layout.substrate(i, k)] = alpha * (radial + axial);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuilder;
    use mc_project::MonolithConfig;

    #[test]
    fn isothermal_substrate_is_at_rest() {
        let grid = GridBuilder::from_config(&MonolithConfig::default())
            .build()
            .unwrap();
        let layout = StateLayout::new(grid.nz(), grid.ns(), grid.nu(), true);
        let xs = vec![450.0; layout.len()];
        let mut dx = vec![1.0; layout.len()];
        let cond = SubstrateConduction::new(SubstrateSolid::default());
        cond.rhs(&xs, &layout, &grid, &mut dx);
        for i in 0..layout.nz {
            for k in 0..layout.nu {
                assert_eq!(dx[layout.substrate(i, k)], 0.0);
            }
        }
        assert_eq!(cond.interface_flux(450.0, 450.0, grid.substrate.spacing), 0.0);
    }

    #[test]
    fn hot_washcoat_heats_substrate() {
        let grid = GridBuilder::from_config(&MonolithConfig::default())
            .build()
            .unwrap();
        let layout = StateLayout::new(grid.nz(), grid.ns(), grid.nu(), true);
        let mut xs = vec![400.0; layout.len()];
        for i in 0..layout.nz {
            xs[layout.washcoat(TEMPERATURE, i, layout.ns - 1)] = 500.0;
        }
        let mut dx = vec![0.0; layout.len()];
        let cond = SubstrateConduction::new(SubstrateSolid::default());
        cond.rhs(&xs, &layout, &grid, &mut dx);
        assert!(dx[layout.substrate(0, 0)] > 0.0);
        assert_eq!(dx[layout.substrate(0, layout.nu - 1)], 0.0);
        // Washcoat loses what the substrate gains.
        assert!(cond.interface_flux(500.0, 400.0, grid.substrate.spacing) < 0.0);
    }
}
