//! # Twine Microturbine
//!
//! Staged micro gas-turbine models for
//! [Twine](https://github.com/isentropic-dev/twine): a compressor, a
//! combustor, and a turbine, plus the stirred, plug-flow, and mixing reactors
//! used to study the combustor on its own.
//!
//! ## Crate layout
//!
//! - [`models`]: [`twine_core::Model`] implementations and the pipelines that
//!   chain them.
//! - [`support`]: units, numeric constraints, streams, and the thermodynamic
//!   state provider the models are written against.
//!
//! ## Thermodynamic state provider
//!
//! Models never evaluate properties directly. They ask a thermo model for
//! what they need through the capability traits in [`support::thermo`], so
//! the same stage runs on the closed-form
//! [`PerfectGas`](support::thermo::model::PerfectGas) and on the
//! [`IdealGasMixture`](support::thermo::model::IdealGasMixture), which adds
//! NASA polynomial species data, hydrogen-oxygen equilibrium, and a one-step
//! oxidation rate.
//!
//! Note: [`support`] APIs are public because the models expose them, but they
//! are not yet stable.

pub mod models;
pub mod support;
