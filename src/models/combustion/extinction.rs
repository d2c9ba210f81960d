//! Residence-time continuation toward flame extinction.
//!
//! Starting from a long residence time, [`sweep`] solves a reactor model,
//! records the outlet temperature, and shortens the residence time by a
//! constant factor. Each solve starts from the previous accepted solution, so
//! the sweep follows the burning branch until it no longer exists. The first
//! solve at or below the minimum temperature ends the sweep as
//! [`Termination::Extinguished`] and is not recorded.
//!
//! # Example
//!
//! ```
//! use std::convert::Infallible;
//!
//! use twine_core::Model;
//! use twine_microturbine::models::combustion::{
//!     ExtinctionConfig, ExtinctionProblem, Termination, sweep,
//! };
//! use uom::si::{
//!     f64::{ThermodynamicTemperature, Time},
//!     thermodynamic_temperature::kelvin,
//!     time::second,
//! };
//!
//! /// Burns at 2000 K for residence times above one millisecond.
//! struct Toy;
//!
//! impl Model for Toy {
//!     type Input = Time;
//!     type Output = ThermodynamicTemperature;
//!     type Error = Infallible;
//!
//!     fn call(&self, tau: &Time) -> Result<Self::Output, Self::Error> {
//!         let t = if tau.get::<second>() > 1e-3 { 2000.0 } else { 700.0 };
//!         Ok(ThermodynamicTemperature::new::<kelvin>(t))
//!     }
//! }
//!
//! struct ToyProblem;
//!
//! impl ExtinctionProblem for ToyProblem {
//!     type Input = Time;
//!     type Output = ThermodynamicTemperature;
//!
//!     fn input(&self, residence_time: Time, _previous: Option<&Self::Output>) -> Time {
//!         residence_time
//!     }
//!
//!     fn temperature(&self, output: &Self::Output) -> ThermodynamicTemperature {
//!         *output
//!     }
//! }
//!
//! let run = sweep(&Toy, &ToyProblem, &ExtinctionConfig::default(), ()).unwrap();
//!
//! // 0.1 s · 0.9ⁿ stays above 1 ms for n = 0..=43.
//! assert_eq!(run.samples().len(), 44);
//! assert!(matches!(run.termination(), Termination::Extinguished { .. }));
//! ```

use std::error::Error as StdError;

use thiserror::Error;
use twine_core::{Model, Observer};
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature, Time},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::{
    models::{
        ConfigError,
        reactor::{SteadyState, StirredReactorInput},
    },
    support::{
        constraint::{StrictlyPositive, UnitIntervalOpen},
        thermo::{State, fluid::Composition},
    },
};

/// Continuation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtinctionConfig {
    initial_residence_time: Time,
    decay: f64,
    min_temperature: ThermodynamicTemperature,
    max_iters: usize,
}

impl ExtinctionConfig {
    /// Creates a continuation configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parameter`] if the initial residence time is not
    /// strictly positive or if `decay` is outside `(0, 1)`.
    pub fn new(
        initial_residence_time: Time,
        decay: f64,
        min_temperature: ThermodynamicTemperature,
        max_iters: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            initial_residence_time: StrictlyPositive::new(initial_residence_time)
                .map_err(ConfigError::parameter("initial residence time"))?
                .into_inner(),
            decay: UnitIntervalOpen::new(decay)
                .map_err(ConfigError::parameter("residence time decay"))?
                .into_inner(),
            min_temperature,
            max_iters,
        })
    }

    #[must_use]
    pub fn initial_residence_time(&self) -> Time {
        self.initial_residence_time
    }

    #[must_use]
    pub fn decay(&self) -> f64 {
        self.decay
    }

    #[must_use]
    pub fn min_temperature(&self) -> ThermodynamicTemperature {
        self.min_temperature
    }

    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }
}

impl Default for ExtinctionConfig {
    /// Start at 0.1 s, shorten by 10 % per step, and call anything at or
    /// below 700 K extinguished, for at most 500 solves.
    fn default() -> Self {
        Self {
            initial_residence_time: Time::new::<second>(0.1),
            decay: 0.9,
            min_temperature: ThermodynamicTemperature::new::<kelvin>(700.0),
            max_iters: 500,
        }
    }
}

/// Connects a reactor model to the sweep.
pub trait ExtinctionProblem {
    type Input;
    type Output;

    /// Builds the model input for `residence_time`, warm-started from the
    /// last accepted output when there is one.
    fn input(&self, residence_time: Time, previous: Option<&Self::Output>) -> Self::Input;

    /// Temperature that decides whether the flame is still burning.
    fn temperature(&self, output: &Self::Output) -> ThermodynamicTemperature;

    /// Pressure reported alongside each sample, if the model has one.
    fn pressure(&self, _output: &Self::Output) -> Option<Pressure> {
        None
    }
}

/// One accepted solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<Output> {
    pub residence_time: Time,
    pub temperature: ThermodynamicTemperature,
    pub output: Output,
}

/// Why a sweep ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// The solve at `residence_time` fell to or below the minimum temperature.
    Extinguished {
        residence_time: Time,
        temperature: ThermodynamicTemperature,
    },
    /// Every allowed solve kept burning.
    MaxIters,
    /// The observer asked to stop.
    StoppedByObserver,
}

/// The accepted samples of a sweep, in order of decreasing residence time.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationRun<Output> {
    samples: Vec<Sample<Output>>,
    termination: Termination,
}

/// Equal-length SI columns of a [`ContinuationRun`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSeries {
    /// Seconds.
    pub residence_time: Vec<f64>,
    /// Kelvin.
    pub temperature: Vec<f64>,
}

impl<Output> ContinuationRun<Output> {
    #[must_use]
    pub fn samples(&self) -> &[Sample<Output>] {
        &self.samples
    }

    #[must_use]
    pub fn termination(&self) -> Termination {
        self.termination
    }

    #[must_use]
    pub fn is_extinguished(&self) -> bool {
        matches!(self.termination, Termination::Extinguished { .. })
    }

    /// The shortest residence time that still burned.
    #[must_use]
    pub fn last_burning(&self) -> Option<&Sample<Output>> {
        self.samples.last()
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<Sample<Output>> {
        self.samples
    }

    #[must_use]
    pub fn series(&self) -> RunSeries {
        RunSeries {
            residence_time: self
                .samples
                .iter()
                .map(|s| s.residence_time.get::<second>())
                .collect(),
            temperature: self
                .samples
                .iter()
                .map(|s| s.temperature.get::<kelvin>())
                .collect(),
        }
    }
}

/// Reported to the observer after each accepted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuationEvent {
    /// Zero-based index of the sample.
    pub iteration: usize,
    pub residence_time: Time,
    pub temperature: ThermodynamicTemperature,
    pub pressure: Option<Pressure>,
}

/// Observer responses during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationAction {
    StopEarly,
}

/// A solve failed and the sweep was abandoned.
#[derive(Debug, Error)]
#[error("solve failed at residence time {residence_time:?}")]
pub struct ContinuationError {
    pub residence_time: Time,
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

/// Runs the extinction sweep.
///
/// # Errors
///
/// Returns [`ContinuationError`] if any solve fails. Extinction itself is not
/// an error.
pub fn sweep<M, P, Obs>(
    model: &M,
    problem: &P,
    config: &ExtinctionConfig,
    mut observer: Obs,
) -> Result<ContinuationRun<M::Output>, ContinuationError>
where
    M: Model,
    P: ExtinctionProblem<Input = M::Input, Output = M::Output>,
    Obs: Observer<ContinuationEvent, ContinuationAction>,
{
    let mut samples: Vec<Sample<M::Output>> = Vec::new();
    let mut residence_time = config.initial_residence_time();

    for iteration in 0..config.max_iters {
        let input = problem.input(residence_time, samples.last().map(|s| &s.output));
        let output = model.call(&input).map_err(|err| ContinuationError {
            residence_time,
            source: Box::new(err),
        })?;
        let temperature = problem.temperature(&output);

        // NaN is not burning.
        let burning = temperature > config.min_temperature;
        if !burning {
            tracing::info!(
                iteration,
                residence_time_s = residence_time.get::<second>(),
                temperature_k = temperature.get::<kelvin>(),
                "extinguished"
            );
            return Ok(ContinuationRun {
                samples,
                termination: Termination::Extinguished {
                    residence_time,
                    temperature,
                },
            });
        }

        let pressure = problem.pressure(&output);
        tracing::info!(
            iteration,
            residence_time_s = residence_time.get::<second>(),
            temperature_k = temperature.get::<kelvin>(),
            pressure_pa = pressure.map(|p| p.get::<pascal>()),
            "burning"
        );

        samples.push(Sample {
            residence_time,
            temperature,
            output,
        });

        let event = ContinuationEvent {
            iteration,
            residence_time,
            temperature,
            pressure,
        };
        if let Some(ContinuationAction::StopEarly) = observer.observe(&event) {
            return Ok(ContinuationRun {
                samples,
                termination: Termination::StoppedByObserver,
            });
        }

        residence_time *= config.decay();
    }

    Ok(ContinuationRun {
        samples,
        termination: Termination::MaxIters,
    })
}

/// Sweeps a [`StirredReactor`](crate::models::reactor::StirredReactor) fed
/// from a fixed inlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsrExtinction {
    pub inlet: State<Composition>,
}

impl ExtinctionProblem for PsrExtinction {
    type Input = StirredReactorInput;
    type Output = SteadyState;

    fn input(&self, residence_time: Time, previous: Option<&SteadyState>) -> StirredReactorInput {
        StirredReactorInput {
            inlet: self.inlet,
            residence_time,
            initial: previous.map(|steady| steady.contents),
        }
    }

    fn temperature(&self, output: &SteadyState) -> ThermodynamicTemperature {
        output.state.temperature
    }

    fn pressure(&self, output: &SteadyState) -> Option<Pressure> {
        Some(output.pressure)
    }
}
