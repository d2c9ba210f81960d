use std::error::Error as StdError;

use thiserror::Error;
use uom::si::f64::Pressure;

use crate::support::{constraint::ConstraintError, thermo::fluid::CompositionError};

/// A stage configuration or input that was rejected before any property call.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A parameter is outside its allowed range.
    #[error("invalid {parameter}: {source}")]
    Parameter {
        parameter: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// A pressure ratio is on the wrong side of one for the machine.
    #[error("{machine} pressure ratio {ratio} is outside {allowed}")]
    PressureRatio {
        machine: &'static str,
        ratio: f64,
        allowed: &'static str,
    },

    /// Streams that must share a pressure do not.
    #[error("pressure mismatch: expected {expected:?}, found {found:?}")]
    PressureMismatch { expected: Pressure, found: Pressure },

    /// A stage that needs at least one inlet received none.
    #[error("no inlet streams")]
    NoInlets,

    /// The inlet streams carry no mass.
    #[error("total inlet mass flow is zero")]
    ZeroFlow,

    /// A mixture could not be assembled from its parts.
    #[error("invalid composition: {0}")]
    Composition(#[from] CompositionError),
}

impl ConfigError {
    pub(crate) fn parameter(parameter: &'static str) -> impl FnOnce(ConstraintError) -> Self {
        move |source| Self::Parameter { parameter, source }
    }
}

/// Errors that can occur while evaluating a steady stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A thermodynamic model operation failed.
    ///
    /// This failure can be from property evaluation or state construction.
    #[error("thermodynamic model failed: {context}")]
    ThermoModelFailed {
        /// Operation context for the thermodynamic model failure.
        context: String,

        /// Underlying thermodynamic model error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl StageError {
    /// Creates a thermo model failure error with context.
    pub(crate) fn thermo_failed(
        context: impl Into<String>,
        err: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::ThermoModelFailed {
            context: context.into(),
            source: Box::new(err),
        }
    }
}
