//! Micro gas-turbine stages and the pipelines built from them.
//!
//! # Organization
//!
//! - [`turbomachinery`]: compressor and turbine.
//! - [`flow`]: steady stream mixer.
//! - [`reactor`]: well-mixed reactors (stirred reactor, mixing vessel) and
//!   plug-flow ducts.
//! - [`combustion`]: equilibrium and staged combustors, and the residence-time
//!   extinction sweep.
//! - [`cycle`]: the compressor, combustor, turbine, and optional recuperator
//!   wired into one run.
//!
//! # Model structure
//!
//! Domain logic lives in plain functions and types written against the
//! thermodynamic capability traits in [`crate::support::thermo`]. Where a
//! module has a private `core`, it is an implementation detail and is not
//! re-exported as a module.
//!
//! The [`twine_core::Model`] implementations are thin adapters that delegate to
//! that logic, so a single computation can be reached both from a solver and
//! from a larger pipeline.

mod error;

pub mod combustion;
pub mod cycle;
pub mod flow;
pub mod reactor;
pub mod turbomachinery;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ConfigError, StageError};
