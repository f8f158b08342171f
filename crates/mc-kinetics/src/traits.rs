//! The rate-law seam used by the channel model.

use crate::error::KineticsResult;

/// Reaction rates at one washcoat node.
///
/// `co`, `hydrocarbon` and `co2` are on the mole-fraction basis (the turnover
/// scaled by `R·T/P`) and drive both the species sinks and the heat release;
/// `*_turnover` are the unscaled LHHW rates, kept for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReactionRates {
    pub co: f64,
    pub hydrocarbon: f64,
    /// CO2 production, the sum of both oxidations.
    pub co2: f64,
    pub co_turnover: f64,
    pub hydrocarbon_turnover: f64,
    /// LHHW inhibition denominator (zero for an inert law)
    pub inhibition: f64,
    /// Heat of reaction of CO oxidation [J/mol]
    pub co_heat_of_reaction: f64,
    /// Heat of reaction of hydrocarbon oxidation [J/mol]
    pub hydrocarbon_heat_of_reaction: f64,
}

impl ReactionRates {
    /// `-(r_CO·ΔH_CO + r_HC·ΔH_HC)`, positive for exothermic chemistry.
    pub fn heat_release(&self) -> f64 {
        -(self.co * self.co_heat_of_reaction
            + self.hydrocarbon * self.hydrocarbon_heat_of_reaction)
    }
}

/// A catalytic rate law evaluated node by node.
///
/// Implementations are pure functions of their inputs so they can be evaluated
/// in parallel across washcoat nodes.
pub trait RateLaw: Send + Sync {
    /// Name for diagnostics.
    fn name(&self) -> &str;

    /// Rates at washcoat temperature `t_k` for CO and hydrocarbon mole
    /// fractions `y_co`, `y_hc`.
    fn rates(&self, t_k: f64, y_co: f64, y_hc: f64) -> KineticsResult<ReactionRates>;
}

/// No chemistry: every rate is zero.
#[derive(Clone, Debug, Default)]
pub struct InertRateLaw;

impl RateLaw for InertRateLaw {
    fn name(&self) -> &str {
        "inert"
    }

    fn rates(&self, _t_k: f64, _y_co: f64, _y_hc: f64) -> KineticsResult<ReactionRates> {
        Ok(ReactionRates::default())
    }
}
