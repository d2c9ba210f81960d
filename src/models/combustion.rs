//! Combustor stages and the residence-time extinction sweep.
//!
//! - [`EquilibriumCombustor`]: adiabatic, constant-pressure equilibrium of a
//!   premixed inlet.
//! - [`StagedCombustor`]: a primary zone followed by dilution sections.
//! - [`sweep`]: shortens the residence time of a reactor model step by step,
//!   warm-starting each solve, until the flame goes out.

mod equilibrium;
mod extinction;
mod staged;

pub use equilibrium::{EquilibriumCombustor, burn, premixed_inlet};
pub use extinction::{
    ContinuationAction, ContinuationError, ContinuationEvent, ContinuationRun, ExtinctionConfig,
    ExtinctionProblem, PsrExtinction, RunSeries, Sample, Termination, sweep,
};
pub use staged::{
    PrimaryZone, StagedCombustor, StagedCombustorConfig, StagedCombustorInput,
    StagedCombustorResults, StagedThermoModel,
};
