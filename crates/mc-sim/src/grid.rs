//! Coordinate arrays for the gas channel, washcoat and substrate.

use crate::error::{SimError, SimResult};
use mc_core::linspace;
use mc_project::MonolithConfig;

/// A uniform 1-D coordinate array.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub coords: Vec<f64>,
    pub spacing: f64,
}

impl Axis {
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// The three independent grids of the channel slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Cell-end positions `dz, 2dz, ..., L`; node `i` sits at `(i+1)·dz`.
    pub axial: Axis,
    /// `0 ..= s0` from the channel wall to the washcoat outer edge.
    pub washcoat: Axis,
    /// `du ..= u0` measured from the washcoat/substrate interface.
    pub substrate: Axis,
}

impl Grid {
    pub fn nz(&self) -> usize {
        self.axial.len()
    }

    pub fn ns(&self) -> usize {
        self.washcoat.len()
    }

    pub fn nu(&self) -> usize {
        self.substrate.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridBuilder {
    pub channel_length_m: f64,
    pub washcoat_thickness_m: f64,
    pub substrate_thickness_m: f64,
    pub nz: usize,
    pub ns: usize,
    pub nu: usize,
}

impl GridBuilder {
    pub fn from_config(config: &MonolithConfig) -> Self {
        Self {
            channel_length_m: config.geometry.channel_length_m,
            washcoat_thickness_m: config.geometry.washcoat_thickness_m,
            substrate_thickness_m: config.geometry.substrate_thickness_m,
            nz: config.grid.nz,
            ns: config.grid.ns,
            nu: config.grid.nu,
        }
    }

    pub fn build(&self) -> SimResult<Grid> {
        for (what, n) in [("nz", self.nz), ("ns", self.ns), ("nu", self.nu)] {
            if n < 2 {
                return Err(SimError::Config {
                    what: format!("{what} must be at least 2, got {n}"),
                });
            }
        }
        for (what, len) in [
            ("channel length", self.channel_length_m),
            ("washcoat thickness", self.washcoat_thickness_m),
            ("substrate thickness", self.substrate_thickness_m),
        ] {
            if !(len.is_finite() && len > 0.0) {
                return Err(SimError::Config {
                    what: format!("{what} must be positive, got {len}"),
                });
            }
        }

        let dz = self.channel_length_m / self.nz as f64;
        let ds = self.washcoat_thickness_m / (self.ns - 1) as f64;
        let du = self.substrate_thickness_m / self.nu as f64;

        Ok(Grid {
            axial: Axis {
                coords: linspace(dz, self.channel_length_m, self.nz),
                spacing: dz,
            },
            washcoat: Axis {
                coords: linspace(0.0, self.washcoat_thickness_m, self.ns),
                spacing: ds,
            },
            substrate: Axis {
                coords: linspace(du, self.substrate_thickness_m, self.nu),
                spacing: du,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_grid_spacings() {
        let grid = GridBuilder::from_config(&MonolithConfig::default())
            .build()
            .unwrap();
        assert_relative_eq!(grid.axial.spacing, 0.001, max_relative = 1e-12);
        assert_relative_eq!(grid.washcoat.spacing, 5e-6, max_relative = 1e-12);
        assert_relative_eq!(grid.substrate.spacing, 30e-6, max_relative = 1e-12);
        assert_relative_eq!(grid.axial.coords[0], 0.001, max_relative = 1e-12);
        assert_relative_eq!(grid.axial.coords[4], 0.005, max_relative = 1e-12);
        assert_eq!(grid.washcoat.coords[0], 0.0);
        assert_relative_eq!(grid.washcoat.coords[4], 20e-6, max_relative = 1e-12);
        assert_eq!((grid.nz(), grid.ns(), grid.nu()), (5, 5, 3));
    }

    #[test]
    fn rejects_single_point_axis() {
        let mut b = GridBuilder::from_config(&MonolithConfig::default());
        b.nu = 1;
        assert!(matches!(b.build(), Err(SimError::Config { .. })));
    }

    #[test]
    fn rejects_zero_thickness() {
        let mut b = GridBuilder::from_config(&MonolithConfig::default());
        b.washcoat_thickness_m = 0.0;
        assert!(matches!(b.build(), Err(SimError::Config { .. })));
    }
}
