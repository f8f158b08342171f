//! Inhibited (LHHW) rate law for CO and hydrocarbon oxidation over Pt.

use crate::arrhenius::Arrhenius;
use crate::error::KineticsResult;
use crate::thermo::{CO_HEAT_OF_REACTION, hydrocarbon_heat_of_reaction};
use crate::traits::{RateLaw, ReactionRates};
use mc_core::constants::GAS_CONSTANT;
use mc_core::ensure_positive;

/// Parameters of the LHHW rate law.
///
/// `k1` and `k3` are the CO and hydrocarbon rate constants, `k2` and `k4` their
/// adsorption constants and `k5` the CO–hydrocarbon interaction constant.
#[derive(Clone, Debug, PartialEq)]
pub struct LhhwParameters {
    pub k1: Arrhenius,
    pub k2: Arrhenius,
    pub k3: Arrhenius,
    pub k4: Arrhenius,
    pub k5: Arrhenius,
    /// Gas-phase O2 mole fraction, held fixed
    pub o2_mole_fraction: f64,
    pub pressure_pa: f64,
    /// Heat of CO oxidation [J/mol]
    pub co_heat_of_reaction: f64,
}

impl Default for LhhwParameters {
    fn default() -> Self {
        Self {
            k1: Arrhenius::new(0.729e21, -12_556.0),
            k2: Arrhenius::new(965.5, 961.0),
            k3: Arrhenius::new(4.042e15, -1.08e4),
            k4: Arrhenius::new(2080.0, 361.0),
            k5: Arrhenius::new(3.98, 11_611.0),
            o2_mole_fraction: 0.0933,
            pressure_pa: 101_325.0,
            co_heat_of_reaction: CO_HEAT_OF_REACTION,
        }
    }
}

/// The five rate constants at one temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateConstants {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
    pub k5: f64,
}

#[derive(Clone, Debug, Default)]
pub struct LhhwRateLaw {
    pub params: LhhwParameters,
}

impl LhhwRateLaw {
    pub fn new(params: LhhwParameters) -> Self {
        Self { params }
    }

    pub fn rate_constants(&self, t_k: f64) -> RateConstants {
        let p = &self.params;
        RateConstants {
            k1: p.k1.rate_constant(t_k),
            k2: p.k2.rate_constant(t_k),
            k3: p.k3.rate_constant(t_k),
            k4: p.k4.rate_constant(t_k),
            k5: p.k5.rate_constant(t_k),
        }
    }

    /// `T·(1 + k2·Y_CO + k4·Y_HC)²·(1 + k5·Y_CO²·Y_HC²)`.
    pub fn inhibition(k: &RateConstants, t_k: f64, y_co: f64, y_hc: f64) -> f64 {
        let adsorption = 1.0 + k.k2 * y_co + k.k4 * y_hc;
        t_k * adsorption * adsorption * (1.0 + k.k5 * y_co * y_co * y_hc * y_hc)
    }
}

impl RateLaw for LhhwRateLaw {
    fn name(&self) -> &str {
        "lhhw"
    }

    fn rates(&self, t_k: f64, y_co: f64, y_hc: f64) -> KineticsResult<ReactionRates> {
        let t_k = ensure_positive(t_k, "washcoat temperature")?;
        let k = self.rate_constants(t_k);
        let inhibition = ensure_positive(
            Self::inhibition(&k, t_k, y_co, y_hc),
            "inhibition factor",
        )?;

        let y_o2 = self.params.o2_mole_fraction;
        let co_turnover = k.k1 * y_co * y_o2 / inhibition;
        let hydrocarbon_turnover = k.k3 * y_hc * y_o2 / inhibition;
        let to_mole_fraction = GAS_CONSTANT * t_k / self.params.pressure_pa;
        let co = co_turnover * to_mole_fraction;
        let hydrocarbon = hydrocarbon_turnover * to_mole_fraction;

        Ok(ReactionRates {
            co,
            hydrocarbon,
            co2: co + hydrocarbon,
            co_turnover,
            hydrocarbon_turnover,
            inhibition,
            co_heat_of_reaction: self.params.co_heat_of_reaction,
            hydrocarbon_heat_of_reaction: hydrocarbon_heat_of_reaction(t_k),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KineticsError;
    use approx::assert_relative_eq;

    #[test]
    fn rates_vanish_without_reactants() {
        let law = LhhwRateLaw::default();
        let r = law.rates(500.0, 0.0, 0.0).unwrap();
        assert_eq!(r.co, 0.0);
        assert_eq!(r.hydrocarbon, 0.0);
        assert_relative_eq!(r.inhibition, 500.0);
    }

    #[test]
    fn co2_is_sum_of_oxidations() {
        let law = LhhwRateLaw::default();
        let r = law.rates(520.0, 3e-3, 5e-4).unwrap();
        assert!(r.co > 0.0 && r.hydrocarbon > 0.0);
        assert_relative_eq!(r.co2, r.co + r.hydrocarbon);
        let scale = GAS_CONSTANT * 520.0 / 101_325.0;
        assert_relative_eq!(r.co, r.co_turnover * scale);
    }

    #[test]
    fn inhibition_matches_closed_form() {
        let law = LhhwRateLaw::default();
        let t = 450.0;
        let (yco, yhc) = (3e-3, 5e-4);
        let k = law.rate_constants(t);
        let expected =
            t * (1.0 + k.k2 * yco + k.k4 * yhc).powi(2) * (1.0 + k.k5 * yco.powi(2) * yhc.powi(2));
        let r = law.rates(t, yco, yhc).unwrap();
        assert_relative_eq!(r.inhibition, expected, max_relative = 1e-12);
    }

    #[test]
    fn heats_of_reaction_are_reported() {
        let law = LhhwRateLaw::default();
        let r = law.rates(500.0, 3e-3, 5e-4).unwrap();
        assert_eq!(r.co_heat_of_reaction, CO_HEAT_OF_REACTION);
        assert_relative_eq!(
            r.hydrocarbon_heat_of_reaction,
            hydrocarbon_heat_of_reaction(500.0)
        );
        assert!(r.heat_release() > 0.0);
    }

    #[test]
    fn non_positive_temperature_is_domain_error() {
        let law = LhhwRateLaw::default();
        assert!(matches!(
            law.rates(0.0, 3e-3, 5e-4),
            Err(KineticsError::Domain { .. })
        ));
        assert!(law.rates(-300.0, 3e-3, 5e-4).is_err());
        assert!(matches!(
            law.rates(f64::NAN, 3e-3, 5e-4),
            Err(KineticsError::Domain {
                what: "washcoat temperature",
                ..
            })
        ));
    }

    #[test]
    fn non_finite_inhibition_is_domain_error() {
        let law = LhhwRateLaw::default();
        assert!(matches!(
            law.rates(500.0, f64::NAN, 5e-4),
            Err(KineticsError::Domain {
                what: "inhibition factor",
                ..
            })
        ));
    }
}
