//! Gas-phase correlations for the channel core.

use crate::species::{Species, TRACKED};
use crate::transfer;
use crate::PropsResult;
use mc_core::ensure_positive;
use mc_core::constants::{GAS_CONSTANT, REFERENCE_TEMPERATURE_K};

/// Prefactor of the Fuller binary diffusivity correlation (SI, Pa).
const FULLER_PREFACTOR: f64 = 1.013e-2;
const FULLER_TEMPERATURE_EXPONENT: f64 = 1.75;
const FULLER_VOLUME_EXPONENT: f64 = 0.3333;

/// Fixed parameters of the gas stream, constant over a run.
#[derive(Clone, Debug, PartialEq)]
pub struct GasConditions {
    /// Absolute pressure [Pa]
    pub pressure_pa: f64,
    /// Mean linear velocity at the reference temperature [m/s]
    pub mean_velocity_m_s: f64,
    /// Channel radius used for Taylor dispersion [m]
    pub channel_radius_m: f64,
    /// Hydraulic diameter of the channel [m]
    pub hydraulic_diameter_m: f64,
    /// Prandtl number [-]
    pub prandtl: f64,
}

impl Default for GasConditions {
    fn default() -> Self {
        Self {
            pressure_pa: 101_325.0,
            mean_velocity_m_s: 2.4,
            channel_radius_m: 5.45e-4,
            hydraulic_diameter_m: 1.09e-3,
            prandtl: 0.7,
        }
    }
}

/// Binary diffusivity of `species` in air [m²/s] (Fuller correlation).
pub fn binary_diffusivity(species: Species, t_k: f64, pressure_pa: f64) -> PropsResult<f64> {
    let t = ensure_positive(t_k, "binary diffusivity temperature")?;
    let p = ensure_positive(pressure_pa, "binary diffusivity pressure")?;
    let air = Species::Air;
    let mass_term = (1.0 / species.molar_mass() + 1.0 / air.molar_mass()).sqrt();
    let volume_term = species.diffusion_volume().powf(FULLER_VOLUME_EXPONENT)
        + air.diffusion_volume().powf(FULLER_VOLUME_EXPONENT);
    Ok(FULLER_PREFACTOR * t.powf(FULLER_TEMPERATURE_EXPONENT) * mass_term
        / (p * volume_term * volume_term))
}

/// Taylor–Aris dispersion: molecular diffusivity augmented by the laminar
/// velocity profile, `D + (v·r0)²/(48·D)`.
pub fn taylor_dispersion(diffusivity: f64, velocity: f64, channel_radius: f64) -> f64 {
    let vr = velocity * channel_radius;
    diffusivity + vr * vr / (48.0 * diffusivity)
}

/// Local velocity, scaled from the mean velocity at the reference temperature [m/s].
pub fn velocity(mean_velocity: f64, t_k: f64) -> PropsResult<f64> {
    let t = ensure_positive(t_k, "gas velocity temperature")?;
    Ok(mean_velocity * t / REFERENCE_TEMPERATURE_K)
}

/// Thermal conductivity of air [W/(m·K)].
pub fn conductivity(t_k: f64) -> PropsResult<f64> {
    let t = ensure_positive(t_k, "gas conductivity temperature")?;
    Ok(1.679e-2 + 5.073e-5 * t)
}

/// Ideal-gas density of air [kg/m³].
pub fn density(pressure_pa: f64, t_k: f64) -> PropsResult<f64> {
    let t = ensure_positive(t_k, "gas density temperature")?;
    Ok(pressure_pa * Species::Air.molar_mass() / (1000.0 * GAS_CONSTANT * t))
}

/// Heat capacity of air [J/(kg·K)], molar polynomial over the molar mass.
pub fn heat_capacity(t_k: f64) -> PropsResult<f64> {
    let t = ensure_positive(t_k, "gas heat capacity temperature")?;
    let molar = 28.09 + 1.965e-3 * t + 4.799e-6 * t * t - 1.965e-9 * t * t * t;
    Ok(molar / (Species::Air.molar_mass() / 1000.0))
}

/// Dynamic viscosity of air [Pa·s].
pub fn viscosity(t_k: f64) -> PropsResult<f64> {
    let t = ensure_positive(t_k, "gas viscosity temperature")?;
    Ok(ensure_positive(7.701e-6 + 4.166e-8 * t - 7.531e-12 * t * t, "gas viscosity")?)
}

/// All gas-phase quantities needed at one axial node.
#[derive(Clone, Debug, PartialEq)]
pub struct GasProperties {
    /// Local velocity [m/s]
    pub velocity: f64,
    /// Molecular diffusivity in air, per tracked species [m²/s]
    pub molecular_diffusivity: [f64; 3],
    /// Dispersion-augmented axial diffusivity, per tracked species [m²/s]
    pub axial_diffusivity: [f64; 3],
    pub conductivity: f64,
    pub density: f64,
    pub heat_capacity: f64,
    /// k/(ρ·cp) [m²/s]
    pub thermal_diffusivity: f64,
    /// Dispersion-augmented thermal diffusivity [m²/s]
    pub axial_thermal_diffusivity: f64,
    pub viscosity: f64,
    pub reynolds: f64,
    pub graetz: f64,
    pub nusselt: f64,
    pub sherwood: f64,
    /// Gas-to-wall mass transfer coefficient, per tracked species [m/s]
    pub mass_transfer: [f64; 3],
    /// Gas-to-wall heat transfer coefficient [W/(m²·K)]
    pub heat_transfer: f64,
}

impl GasProperties {
    /// Evaluate every gas-phase property at temperature `t_k` and axial
    /// position `z_m` (distance from the channel entrance, > 0).
    pub fn evaluate(cond: &GasConditions, t_k: f64, z_m: f64) -> PropsResult<Self> {
        let velocity = velocity(cond.mean_velocity_m_s, t_k)?;

        let mut molecular_diffusivity = [0.0; 3];
        let mut axial_diffusivity = [0.0; 3];
        for (k, species) in TRACKED.iter().enumerate() {
            let d = binary_diffusivity(*species, t_k, cond.pressure_pa)?;
            molecular_diffusivity[k] = d;
            axial_diffusivity[k] = taylor_dispersion(d, velocity, cond.channel_radius_m);
        }

        let conductivity = conductivity(t_k)?;
        let density = density(cond.pressure_pa, t_k)?;
        let heat_capacity = heat_capacity(t_k)?;
        let thermal_diffusivity = conductivity / (density * heat_capacity);
        let axial_thermal_diffusivity =
            taylor_dispersion(thermal_diffusivity, velocity, cond.channel_radius_m);
        let viscosity = viscosity(t_k)?;

        let dh = cond.hydraulic_diameter_m;
        // Re is based on the feed velocity, not the thermally expanded one.
        let reynolds = transfer::reynolds(density, cond.mean_velocity_m_s, dh, viscosity);
        let graetz = transfer::graetz(reynolds, cond.prandtl, dh, z_m)?;
        let nusselt = transfer::combined_nusselt(graetz)?;
        let sherwood = transfer::sherwood(nusselt);

        let mut mass_transfer = [0.0; 3];
        for (k, d) in molecular_diffusivity.iter().enumerate() {
            mass_transfer[k] = transfer::mass_transfer_coefficient(sherwood, *d, dh);
        }
        let heat_transfer = transfer::heat_transfer_coefficient(nusselt, conductivity, dh);

        Ok(Self {
            velocity,
            molecular_diffusivity,
            axial_diffusivity,
            conductivity,
            density,
            heat_capacity,
            thermal_diffusivity,
            axial_thermal_diffusivity,
            viscosity,
            reynolds,
            graetz,
            nusselt,
            sherwood,
            mass_transfer,
            heat_transfer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn co_diffusivity_magnitude() {
        // CO in air near 417 K and 1 atm is of order 4e-5 m²/s.
        let d = binary_diffusivity(Species::CO, 417.0, 101_325.0).unwrap();
        assert!(d > 2e-5 && d < 8e-5, "d = {d}");
    }

    #[test]
    fn heavier_species_diffuse_slower() {
        let d_co = binary_diffusivity(Species::CO, 500.0, 101_325.0).unwrap();
        let d_hc = binary_diffusivity(Species::C3H8, 500.0, 101_325.0).unwrap();
        assert!(d_hc < d_co);
    }

    #[test]
    fn ideal_gas_density_of_air() {
        let rho = density(101_325.0, 298.0).unwrap();
        assert_relative_eq!(rho, 1.184, max_relative = 1e-2);
    }

    #[test]
    fn air_heat_capacity_near_one_kilojoule() {
        let cp = heat_capacity(417.0).unwrap();
        assert!(cp > 950.0 && cp < 1100.0, "cp = {cp}");
    }

    #[test]
    fn velocity_scales_with_temperature() {
        assert_relative_eq!(velocity(2.4, 298.0).unwrap(), 2.4);
        assert_relative_eq!(velocity(2.4, 596.0).unwrap(), 4.8);
    }

    #[test]
    fn taylor_dispersion_exceeds_molecular() {
        let d = 5e-5;
        assert!(taylor_dispersion(d, 3.0, 5.45e-4) > d);
        assert_eq!(taylor_dispersion(d, 0.0, 5.45e-4), d);
    }

    #[test]
    fn non_positive_temperature_is_domain_error() {
        assert!(binary_diffusivity(Species::CO, 0.0, 101_325.0).is_err());
        assert!(density(101_325.0, -10.0).is_err());
        let cond = GasConditions::default();
        assert!(GasProperties::evaluate(&cond, f64::NAN, 1e-3).is_err());
    }

    #[test]
    fn node_properties_are_consistent() {
        let cond = GasConditions::default();
        let p = GasProperties::evaluate(&cond, 450.0, 2e-3).unwrap();
        assert_relative_eq!(
            p.thermal_diffusivity,
            p.conductivity / (p.density * p.heat_capacity)
        );
        assert_eq!(p.sherwood, p.nusselt);
        for k in 0..3 {
            assert!(p.axial_diffusivity[k] > p.molecular_diffusivity[k]);
            assert_relative_eq!(
                p.mass_transfer[k],
                p.sherwood * p.molecular_diffusivity[k] / cond.hydraulic_diameter_m
            );
        }
    }
}
