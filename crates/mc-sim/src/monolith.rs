//! The monolith channel model: grid, properties, kinetics and stencils
//! assembled into `dx/dt`.
//!
//! Properties and rates are recomputed from the state on every call. Gas-phase
//! properties are evaluated per axial node, then each axial row of the washcoat
//! is evaluated independently on the rayon pool.

use crate::catalyst::CatalystDerived;
use crate::error::{NodeIndex, SimError, SimResult};
use crate::grid::{Grid, GridBuilder};
use crate::layout::{Field, Fields, StateLayout, TEMPERATURE, VARIABLES};
use crate::model::TransientModel;
use crate::schedule::InletTemperatureProgram;
use crate::stencil::{
    gas_curvature, gas_gradient, radial_curvature, radial_gradient, reflective_curvature,
    wall_diffusion,
};
use crate::substrate::SubstrateConduction;
use mc_core::constants::GAS_CONSTANT;
use mc_kinetics::{
    Arrhenius, InertRateLaw, KineticsError, LhhwParameters, LhhwRateLaw, RateLaw,
};
use mc_project::{
    AxialScheme, MonolithConfig, SubstrateCoupling, WashcoatClosure, validate_config,
};
use mc_props::{
    GasConditions, GasProperties, PorousMedium, PropsError, SubstrateSolid, WashcoatProperties,
    WashcoatSolid,
};
use nalgebra::DVector;
use rayon::prelude::*;

const SPECIES: usize = 3;

fn props_domain(field: &'static str, node: NodeIndex, e: PropsError) -> SimError {
    SimError::Domain {
        field,
        node,
        message: e.to_string(),
    }
}

fn kinetics_domain(node: NodeIndex, e: KineticsError) -> SimError {
    let KineticsError::Domain { what, .. } = e;
    SimError::Domain {
        field: what,
        node,
        message: e.to_string(),
    }
}

/// Build the rate law a configuration asks for.
pub fn rate_law_from_config(config: &MonolithConfig) -> Box<dyn RateLaw> {
    let k = &config.kinetics;
    if !k.enabled {
        return Box::new(InertRateLaw);
    }
    let arr = |n: usize| Arrhenius::new(k.pre_exponential[n], k.activation_k[n]);
    Box::new(LhhwRateLaw::new(LhhwParameters {
        k1: arr(0),
        k2: arr(1),
        k3: arr(2),
        k4: arr(3),
        k5: arr(4),
        o2_mole_fraction: config.operating.o2_mole_fraction,
        pressure_pa: config.operating.pressure_pa,
        co_heat_of_reaction: k.co_heat_of_reaction_j_mol,
    }))
}

pub struct MonolithModel {
    grid: Grid,
    layout: StateLayout,
    gas: GasConditions,
    medium: PorousMedium,
    washcoat_solid: WashcoatSolid,
    substrate: Option<SubstrateConduction>,
    rate_law: Box<dyn RateLaw>,
    program: InletTemperatureProgram,
    inlet: [f64; SPECIES],
    initial: [f64; SPECIES],
    initial_temperature_k: f64,
    catalyst: CatalystDerived,
    scheme: AxialScheme,
    closure: WashcoatClosure,
    porosity: f64,
}

impl std::fmt::Debug for MonolithModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonolithModel")
            .field("layout", &self.layout)
            .field("rate_law", &self.rate_law.name())
            .field("scheme", &self.scheme)
            .field("closure", &self.closure)
            .field("substrate", &self.substrate.is_some())
            .finish()
    }
}

impl MonolithModel {
    /// Validate `config` and build the model. Fails before any integration
    /// with [`SimError::Config`].
    pub fn from_config(config: &MonolithConfig) -> SimResult<Self> {
        validate_config(config)?;
        let grid = GridBuilder::from_config(config).build()?;
        let substrate = match config.substrate.coupling {
            SubstrateCoupling::Inactive => None,
            SubstrateCoupling::Conduction => Some(SubstrateConduction::new(SubstrateSolid {
                density_kg_m3: config.catalyst.substrate_density_g_m3 / 1000.0,
                conductivity: config.catalyst.substrate_conductivity_w_m_k,
                heat_capacity: config.catalyst.substrate_heat_capacity_j_kg_k,
            })),
        };
        let layout = StateLayout::new(grid.nz(), grid.ns(), grid.nu(), substrate.is_some());
        let op = &config.operating;

        Ok(Self {
            layout,
            gas: GasConditions {
                pressure_pa: op.pressure_pa,
                mean_velocity_m_s: op.mean_velocity_m_s,
                channel_radius_m: config.geometry.channel_radius_m,
                hydraulic_diameter_m: config.geometry.hydraulic_diameter_m,
                prandtl: op.prandtl,
            },
            medium: PorousMedium {
                pore_radius_m: config.porous.pore_radius_m,
                porosity: config.porous.porosity,
                tortuosity: config.porous.tortuosity,
                constrictivity: config.porous.constrictivity,
            },
            washcoat_solid: WashcoatSolid {
                density_kg_m3: config.catalyst.washcoat_density_g_m3 / 1000.0,
            },
            substrate,
            rate_law: rate_law_from_config(config),
            program: InletTemperatureProgram::from_config(config)?,
            inlet: op.inlet.as_array(),
            initial: op.initial.as_array(),
            initial_temperature_k: op.initial_temperature_k,
            catalyst: CatalystDerived::from_config(config),
            scheme: config.grid.axial_scheme,
            closure: config.grid.washcoat_closure,
            porosity: config.porous.porosity,
            grid,
        })
    }

    /// Replace the rate law.
    pub fn with_rate_law(mut self, rate_law: Box<dyn RateLaw>) -> Self {
        self.rate_law = rate_law;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    pub fn program(&self) -> &InletTemperatureProgram {
        &self.program
    }

    pub fn catalyst(&self) -> &CatalystDerived {
        &self.catalyst
    }

    pub fn rate_law_name(&self) -> &str {
        self.rate_law.name()
    }

    /// Inlet mole fractions of CO, CO2 and hydrocarbon.
    pub fn inlet_composition(&self) -> [f64; SPECIES] {
        self.inlet
    }

    /// Unpack `x` for reporting. The substrate field is always filled: with
    /// integrated values under conduction, otherwise held at the initial
    /// temperature.
    pub fn fields(&self, x: &DVector<f64>) -> SimResult<Fields> {
        let mut fields = self.layout.unpack(x)?;
        if self.substrate.is_none() {
            fields.substrate = vec![self.initial_temperature_k; self.layout.nz * self.layout.nu];
        }
        Ok(fields)
    }

    /// Radial diffusion into the wall node with diffusivity `d`.
    fn wall_term(&self, at: &impl Fn(usize) -> f64, d: f64, ds: f64) -> f64 {
        match self.closure {
            WashcoatClosure::Reference => wall_diffusion(at, d, ds),
            WashcoatClosure::Slab => d * reflective_curvature(at, 2, 0, ds),
        }
    }

    /// Radial operator at an interior or outer washcoat node.
    fn radial_term(&self, at: &impl Fn(usize) -> f64, ns: usize, j: usize, ds: f64, s_j: f64) -> f64 {
        let curvature = radial_curvature(at, ns, j, ds);
        match self.closure {
            WashcoatClosure::Reference => radial_gradient(at, ns, j, ds, s_j) + curvature,
            WashcoatClosure::Slab => curvature,
        }
    }

    /// Derivatives of one axial row of the washcoat, written as
    /// `row[v * ns + j]`.
    fn washcoat_row(
        &self,
        xs: &[f64],
        i: usize,
        gas: &GasProperties,
        row: &mut [f64],
    ) -> SimResult<()> {
        let l = &self.layout;
        let (nz, ns) = (l.nz, l.ns);
        let ds = self.grid.washcoat.spacing;
        let dz = self.grid.axial.spacing;
        let depth = &self.grid.washcoat.coords;
        let pressure = self.gas.pressure_pa;
        let por = self.porosity;
        let film_scale = match self.closure {
            WashcoatClosure::Reference => 1.0,
            WashcoatClosure::Slab => 2.0,
        };

        for j in 0..ns {
            let node = NodeIndex::layer(i, j);
            let tw = xs[l.washcoat(TEMPERATURE, i, j)];
            let props = WashcoatProperties::evaluate(&self.medium, &self.washcoat_solid, pressure, tw)
                .map_err(|e| props_domain("washcoat temperature", node, e))?;
            let rates = self
                .rate_law
                .rates(tw, xs[l.washcoat(0, i, j)], xs[l.washcoat(2, i, j)])
                .map_err(|e| kinetics_domain(node, e))?;

            let source = self.catalyst.species_source_factor() * GAS_CONSTANT * tw / pressure;
            let production = [-rates.co, rates.co2, -rates.hydrocarbon];

            for v in 0..SPECIES {
                let at = |k: usize| xs[l.washcoat(v, i, k)];
                let axial = reflective_curvature(|m| xs[l.washcoat(v, m, j)], nz, i, dz);
                let de = props.effective_diffusivity[v];
                let reaction = production[v] * source;
                row[v * ns + j] = if j == 0 {
                    let film = film_scale * gas.mass_transfer[v] * (xs[l.gas(v, i)] - at(0)) / ds;
                    (self.wall_term(&at, de, ds) + film) / por + (de * axial + reaction) / por
                } else {
                    let radial = self.radial_term(&at, ns, j, ds, depth[j]);
                    (de * (radial + axial) + reaction) / por
                };
            }

            let at = |k: usize| xs[l.washcoat(TEMPERATURE, i, k)];
            let axial = reflective_curvature(|m| xs[l.washcoat(TEMPERATURE, m, j)], nz, i, dz);
            let rho_cp = props.density * props.heat_capacity;
            let alpha = props.thermal_diffusivity;
            let heat = rates.heat_release() * self.catalyst.volumetric_factor() / rho_cp;

            let mut dtdt = if j == 0 {
                let film = film_scale * gas.heat_transfer * (at(0) - xs[l.gas(TEMPERATURE, i)])
                    / (ds * rho_cp);
                self.wall_term(&at, alpha, ds) - film + alpha * axial + heat
            } else {
                alpha * (self.radial_term(&at, ns, j, ds, depth[j]) + axial) + heat
            };
            if j == ns - 1 {
                if let Some(sub) = &self.substrate {
                    let flux = sub.interface_flux(tw, xs[l.substrate(i, 0)], self.grid.substrate.spacing);
                    dtdt += sub.washcoat_heating(flux, ds, rho_cp);
                }
            }
            row[TEMPERATURE * ns + j] = dtdt;
        }
        Ok(())
    }
}

impl TransientModel for MonolithModel {
    fn dimension(&self) -> usize {
        self.layout.len()
    }

    fn initial_state(&self) -> DVector<f64> {
        let l = &self.layout;
        let mut x = DVector::zeros(l.len());
        let t0 = self.initial_temperature_k;
        let values = [self.initial[0], self.initial[1], self.initial[2], t0];
        for (v, value) in values.iter().enumerate() {
            for field in [Field::Gas(v), Field::Washcoat(v)] {
                x.rows_mut(l.offset(field), l.extent(field)).fill(*value);
            }
        }
        let sub = Field::SubstrateTemperature;
        x.rows_mut(l.offset(sub), l.extent(sub)).fill(t0);
        x
    }

    fn rhs(&self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
        self.layout.ensure_len(x)?;
        let l = &self.layout;
        let xs = x.as_slice();
        let (nz, ns) = (l.nz, l.ns);
        let dz = self.grid.axial.spacing;
        let dh = self.gas.hydraulic_diameter_m;

        let boundary = [self.inlet[0], self.inlet[1], self.inlet[2], self.program.temperature(t)];

        let gas_props: Vec<GasProperties> = (0..nz)
            .into_par_iter()
            .map(|i| {
                GasProperties::evaluate(&self.gas, xs[l.gas(TEMPERATURE, i)], self.grid.axial.coords[i])
                    .map_err(|e| props_domain("gas temperature", NodeIndex::gas(i), e))
            })
            .collect::<SimResult<Vec<_>>>()?;

        let row_len = VARIABLES * ns;
        let mut rows = vec![0.0; nz * row_len];
        rows.par_chunks_mut(row_len)
            .enumerate()
            .try_for_each(|(i, row)| self.washcoat_row(xs, i, &gas_props[i], row))?;

        let mut dx = DVector::zeros(l.len());
        for (i, p) in gas_props.iter().enumerate() {
            for v in 0..SPECIES {
                let at = |k: usize| xs[l.gas(v, k)];
                let zz = gas_curvature(at, boundary[v], nz, i, dz);
                let z = gas_gradient(at, boundary[v], nz, i, dz, self.scheme);
                let exchange = 4.0 * p.mass_transfer[v] * (at(i) - xs[l.washcoat(v, i, 0)]) / dh;
                dx[l.gas(v, i)] = p.axial_diffusivity[v] * zz - p.velocity * z - exchange;
            }
            let at = |k: usize| xs[l.gas(TEMPERATURE, k)];
            let zz = gas_curvature(at, boundary[TEMPERATURE], nz, i, dz);
            let z = gas_gradient(at, boundary[TEMPERATURE], nz, i, dz, self.scheme);
            let exchange = 4.0 * p.heat_transfer * (xs[l.washcoat(TEMPERATURE, i, 0)] - at(i))
                / (dh * p.heat_capacity * p.density);
            dx[l.gas(TEMPERATURE, i)] = p.axial_thermal_diffusivity * zz - p.velocity * z + exchange;
        }

        for (i, row) in rows.chunks(row_len).enumerate() {
            for v in 0..VARIABLES {
                for j in 0..ns {
                    dx[l.washcoat(v, i, j)] = row[v * ns + j];
                }
            }
        }

        if let Some(sub) = &self.substrate {
            sub.rhs(xs, l, &self.grid, dx.as_mut_slice());
        }

        Ok(dx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> MonolithModel {
        MonolithModel::from_config(&MonolithConfig::default()).unwrap()
    }

    #[test]
    fn dimension_follows_layout() {
        let m = reference();
        assert_eq!(m.dimension(), 4 * 5 + 4 * 5 * 5);
        assert_eq!(m.initial_state().len(), m.dimension());
    }

    #[test]
    fn initial_state_is_uniform_feed() {
        let m = reference();
        let x = m.initial_state();
        let f = m.fields(&x).unwrap();
        assert!(f.gas[0].iter().all(|&v| v == 3000e-6));
        assert!(f.washcoat[2].iter().all(|&v| v == 500e-6));
        assert!(f.washcoat[TEMPERATURE].iter().all(|&v| v == 417.0));
        assert_eq!(f.substrate.len(), 5 * 3);
    }

    #[test]
    fn inert_uniform_state_is_stationary() {
        let m = reference().with_rate_law(Box::new(InertRateLaw));
        let x = m.initial_state();
        let dx = m.rhs(0.0, &x).unwrap();
        assert!(dx.amax() < 1e-20, "max |dx| = {}", dx.amax());
    }

    #[test]
    fn reaction_consumes_co_in_washcoat() {
        let m = reference();
        let x = m.initial_state();
        let dx = m.rhs(0.0, &x).unwrap();
        let l = m.layout();
        for i in 0..l.nz {
            for j in 0..l.ns {
                assert!(dx[l.washcoat(0, i, j)] < 0.0);
                assert!(dx[l.washcoat(1, i, j)] > 0.0);
                assert!(dx[l.washcoat(TEMPERATURE, i, j)] > 0.0);
            }
        }
    }

    #[test]
    fn hotter_inlet_heats_first_gas_node_only() {
        let m = reference().with_rate_law(Box::new(InertRateLaw));
        let x = m.initial_state();
        let dx = m.rhs(100.0, &x).unwrap();
        let l = m.layout();
        assert!(dx[l.gas(TEMPERATURE, 0)] > 0.0);
        for i in 1..l.nz {
            assert_eq!(dx[l.gas(TEMPERATURE, i)], 0.0);
        }
    }

    #[test]
    fn negative_temperature_reports_node() {
        let m = reference();
        let mut x = m.initial_state();
        let l = *m.layout();
        x[l.washcoat(TEMPERATURE, 2, 3)] = -5.0;
        match m.rhs(0.0, &x) {
            Err(SimError::Domain { node, .. }) => assert_eq!(node, NodeIndex::layer(2, 3)),
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn negative_gas_temperature_reports_gas_node() {
        let m = reference();
        let mut x = m.initial_state();
        let l = *m.layout();
        x[l.gas(TEMPERATURE, 4)] = 0.0;
        match m.rhs(0.0, &x) {
            Err(SimError::Domain { field, node, .. }) => {
                assert_eq!(field, "gas temperature");
                assert_eq!(node, NodeIndex::gas(4));
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn substrate_block_appended_under_conduction() {
        let mut cfg = MonolithConfig::default();
        cfg.substrate.coupling = SubstrateCoupling::Conduction;
        let m = MonolithModel::from_config(&cfg)
            .unwrap()
            .with_rate_law(Box::new(InertRateLaw));
        assert_eq!(m.dimension(), 120 + 15);
        let dx = m.rhs(0.0, &m.initial_state()).unwrap();
        assert!(dx.amax() < 1e-20);
    }

    #[test]
    fn slab_closure_doubles_wall_film_exchange() {
        let mut cfg = MonolithConfig::default();
        cfg.grid.washcoat_closure = WashcoatClosure::Slab;
        let slab = MonolithModel::from_config(&cfg)
            .unwrap()
            .with_rate_law(Box::new(InertRateLaw));
        let reference = reference().with_rate_law(Box::new(InertRateLaw));
        assert!(slab.rhs(0.0, &slab.initial_state()).unwrap().amax() < 1e-20);

        // A gas-only perturbation isolates the film term at the wall node.
        let l = *slab.layout();
        let mut x = slab.initial_state();
        x[l.gas(0, 1)] += 1e-4;
        let a = reference.rhs(0.0, &x).unwrap()[l.washcoat(0, 1, 0)];
        let b = slab.rhs(0.0, &x).unwrap()[l.washcoat(0, 1, 0)];
        assert!(a > 0.0);
        assert!((b / a - 2.0).abs() < 1e-12, "ratio = {}", b / a);
    }

    #[test]
    fn invalid_config_is_rejected_before_building() {
        let mut cfg = MonolithConfig::default();
        cfg.grid.nz = 1;
        assert!(matches!(
            MonolithModel::from_config(&cfg),
            Err(SimError::Config { .. })
        ));
    }
}
