use std::error::Error as StdError;

use thiserror::Error;
use twine_solvers::transient::euler;
use uom::si::f64::Time;

use crate::models::{ConfigError, StageError};

/// Errors that can occur while driving a reactor to steady state.
#[derive(Debug, Error)]
pub enum ReactorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A thermodynamic model operation failed.
    #[error("thermodynamic model failed: {context}")]
    ThermoModelFailed {
        context: String,

        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The time integration failed.
    #[error("integration failed")]
    Integration(#[source] euler::Error),

    /// The contents were still changing at the end of the time horizon.
    #[error("no steady state after {time:?} ({residence_times} residence times)")]
    NotConverged { time: Time, residence_times: f64 },
}

impl ReactorError {
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

impl From<StageError> for ReactorError {
    fn from(err: StageError) -> Self {
        match err {
            StageError::Config(err) => Self::Config(err),
            StageError::ThermoModelFailed { context, source } => {
                Self::ThermoModelFailed { context, source }
            }
        }
    }
}
