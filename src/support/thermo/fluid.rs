//! Fluid identifiers and mixture compositions.
//!
//! A fluid type names what a state is made of. [`Air`] is a plain marker used
//! with the [`PerfectGas`](super::model::PerfectGas) model. [`Composition`]
//! carries the species mass fractions of a combustion gas and is the fluid of
//! the [`IdealGasMixture`](super::model::IdealGasMixture) model.

mod air;
mod composition;
mod species;

pub use air::Air;
pub use composition::{Composition, CompositionError};
pub use species::Species;
