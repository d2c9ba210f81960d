//! Thermodynamic state provider.
//!
//! A model implements the [`capability`] traits it can support for its
//! [`ThermoModel::Fluid`](capability::ThermoModel). Stages are written against
//! those traits, so the same stage runs on the closed-form
//! [`PerfectGas`](model::PerfectGas) in tests and on the
//! [`IdealGasMixture`](model::IdealGasMixture) in a real cycle.

mod error;
mod properties;
mod state;

pub mod capability;
pub mod fluid;
pub mod model;

pub use error::PropertyError;
pub use properties::StateProperties;
pub use state::State;
