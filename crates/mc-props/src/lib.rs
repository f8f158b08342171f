//! mc-props: transport and thermal property correlations for the monolith channel.
//!
//! Provides:
//! - Species data (molar masses, Fuller diffusion volumes)
//! - Gas-phase correlations (Fuller diffusivity, Taylor dispersion, viscosity,
//!   ideal-gas density, heat capacity, conductivity)
//! - Porous washcoat diffusion (Knudsen, parallel-resistance pore, effective)
//! - Washcoat solid correlations (conductivity, heat capacity, density)
//! - Channel transfer coefficients (Reynolds, Graetz, Nusselt, Sherwood)
//!
//! Every function is a closed-form expression of the local temperature. A
//! temperature that is non-positive or non-finite is a [`PropsError::Domain`]
//! error; callers treat it as fatal.
//!
//! # Example
//!
//! ```
//! use mc_props::{GasConditions, GasProperties};
//!
//! let cond = GasConditions::default();
//! let props = GasProperties::evaluate(&cond, 417.0, 1e-3).unwrap();
//! assert!(props.density > 0.0);
//! ```

pub mod error;
pub mod gas;
pub mod porous;
pub mod solid;
pub mod species;
pub mod transfer;

pub use error::{PropsError, PropsResult};
pub use gas::{GasConditions, GasProperties};
pub use porous::{PorousMedium, WashcoatProperties};
pub use solid::{SubstrateSolid, WashcoatSolid};
pub use species::{Species, TRACKED};
