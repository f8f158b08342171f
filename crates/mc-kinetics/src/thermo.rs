//! Heats of reaction [J/mol].

/// Heat of CO oxidation, taken as temperature independent.
pub const CO_HEAT_OF_REACTION: f64 = -282.55e3;

/// Heat of propane oxidation, quartic in temperature.
pub fn hydrocarbon_heat_of_reaction(t_k: f64) -> f64 {
    let t = t_k;
    -2.059e6 + 72.3 * t - 9.69e-2 * t * t + 4.34e-5 * t * t * t + 7.56e-9 * t * t * t * t
}
