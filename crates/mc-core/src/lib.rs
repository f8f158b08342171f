//! mc-core: stable foundation for the monolith channel simulator.
//!
//! Contains:
//! - numeric (finiteness/positivity checks, linspace)
//! - constants (physical constants shared by the property and kinetics crates)
//! - timing (wall-clock instrumentation for solver runs)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::McError;
pub use numeric::*;
