//! Physical constants in SI units.

/// Universal gas constant [J/(mol·K)] (equivalently m³·Pa/(mol·K)).
pub const GAS_CONSTANT: f64 = 8.314;

/// Avogadro number [1/mol].
pub const AVOGADRO: f64 = 6.022e23;

/// Reference temperature for the velocity scaling of the feed [K].
pub const REFERENCE_TEMPERATURE_K: f64 = 298.0;

/// Square metres per square inch, used to convert cell densities.
pub const M2_PER_IN2: f64 = 0.000_645;
