//! mc-kinetics: surface reaction rates for CO and hydrocarbon oxidation.
//!
//! The washcoat chemistry is two global reactions,
//!
//! ```text
//! CO   + ½ O2 → CO2
//! C3H8 + 5 O2 → 3 CO2 + 4 H2O
//! ```
//!
//! with an LHHW rate law whose inhibition denominator couples the two through
//! competitive adsorption. [`RateLaw`] is the seam the channel model calls;
//! [`InertRateLaw`] switches chemistry off for transport-only runs.

pub mod arrhenius;
pub mod error;
pub mod lhhw;
pub mod thermo;
pub mod traits;

pub use arrhenius::Arrhenius;
pub use error::{KineticsError, KineticsResult};
pub use lhhw::{LhhwParameters, LhhwRateLaw};
pub use traits::{InertRateLaw, RateLaw, ReactionRates};
