//! Transient simulation of a single catalytic monolith channel slice.
//!
//! Provides:
//! - Grid construction for the gas channel, washcoat and substrate
//! - A state layout descriptor shared by packing, the RHS and reporting
//! - The piecewise-linear inlet temperature program
//! - Finite-difference stencils with their boundary closures
//! - The reaction-diffusion-convection RHS ([`MonolithModel`])
//! - Optional substrate conduction
//! - An output-time driver over the BDF integrator

pub mod catalyst;
pub mod error;
pub mod grid;
pub mod layout;
pub mod model;
pub mod monolith;
pub mod schedule;
pub mod sim;
pub mod stencil;
pub mod substrate;

pub use catalyst::CatalystDerived;
pub use error::{NodeIndex, SimError, SimFailure, SimResult};
pub use grid::{Axis, Grid, GridBuilder};
pub use layout::{Field, Fields, StateLayout, TEMPERATURE, VARIABLES};
pub use model::TransientModel;
pub use monolith::{MonolithModel, rate_law_from_config};
pub use schedule::InletTemperatureProgram;
pub use sim::{SimOptions, SimOutcome, SimProgress, SimRecord, run_sim, run_sim_with_progress};
pub use substrate::SubstrateConduction;
