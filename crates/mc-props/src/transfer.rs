//! Dimensionless groups and wall transfer coefficients for a developing
//! laminar channel flow.

use crate::PropsResult;
use mc_core::ensure_positive;

/// Added to the mean of the two asymptotic Nusselt numbers to account for
/// the developing velocity profile.
pub const DEVELOPING_FLOW_CORRECTION: f64 = 2.0;

pub fn reynolds(density: f64, velocity: f64, length: f64, viscosity: f64) -> f64 {
    density * velocity * length / viscosity
}

/// Graetz number at distance `z` from the entrance.
pub fn graetz(reynolds: f64, prandtl: f64, hydraulic_diameter: f64, z: f64) -> PropsResult<f64> {
    let z = ensure_positive(z, "Graetz axial position")?;
    Ok(ensure_positive(reynolds * prandtl * hydraulic_diameter / z, "Graetz number")?)
}

/// Local Nusselt number for a constant wall temperature.
pub fn nusselt_constant_wall_temperature(graetz: f64) -> PropsResult<f64> {
    let gz = ensure_positive(graetz, "Graetz number")?;
    Ok(3.657 + 8.827 * (1000.0 / gz).powf(-0.545) * (-48.2 / gz).exp())
}

/// Local Nusselt number for a constant wall heat flux.
pub fn nusselt_constant_wall_flux(graetz: f64) -> PropsResult<f64> {
    let gz = ensure_positive(graetz, "Graetz number")?;
    Ok(4.367 + 13.18 * (1000.0 / gz).powf(-0.524) * (-60.2 / gz).exp())
}

/// Mean of the two asymptotes plus the developing-flow correction.
pub fn combined_nusselt(graetz: f64) -> PropsResult<f64> {
    let nu_t = nusselt_constant_wall_temperature(graetz)?;
    let nu_h = nusselt_constant_wall_flux(graetz)?;
    Ok(0.5 * (nu_t + nu_h) + DEVELOPING_FLOW_CORRECTION)
}

/// Heat/mass transfer analogy.
pub fn sherwood(nusselt: f64) -> f64 {
    nusselt
}

pub fn mass_transfer_coefficient(sherwood: f64, diffusivity: f64, hydraulic_diameter: f64) -> f64 {
    sherwood * diffusivity / hydraulic_diameter
}

pub fn heat_transfer_coefficient(nusselt: f64, conductivity: f64, hydraulic_diameter: f64) -> f64 {
    nusselt * conductivity / hydraulic_diameter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_developed_limits() {
        // Small Graetz numbers recover the classical asymptotes.
        let nu_t = nusselt_constant_wall_temperature(1.0).unwrap();
        let nu_h = nusselt_constant_wall_flux(1.0).unwrap();
        assert!((nu_t - 3.657).abs() < 1e-6);
        assert!((nu_h - 4.367).abs() < 1e-6);
        let nu = combined_nusselt(1.0).unwrap();
        assert!((nu - (0.5 * (3.657 + 4.367) + 2.0)).abs() < 1e-6);
    }

    #[test]
    fn entrance_region_enhances_transfer() {
        let developed = combined_nusselt(1.0).unwrap();
        let entrance = combined_nusselt(200.0).unwrap();
        assert!(entrance > developed);
    }

    #[test]
    fn zero_position_is_rejected() {
        assert!(graetz(50.0, 0.7, 1e-3, 0.0).is_err());
        assert!(combined_nusselt(0.0).is_err());
    }
}
