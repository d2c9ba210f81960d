//! Capability traits used to query and construct thermodynamic states.
//!
//! Stages name the capabilities they need as trait bounds, so a model only has
//! to implement what it supports. A calorically perfect gas can drive a
//! compressor but not a reacting stirred reactor, and the compiler says so.

mod base;
mod equilibrium;
mod kinetics;
mod mixing;
mod properties;
mod state_from;

pub use base::ThermoModel;
pub use equilibrium::{Equilibrate, EquilibriumConstraint};
pub use kinetics::HasReactionRates;
pub use mixing::MixFluids;
pub use properties::*;
pub use state_from::StateFrom;
