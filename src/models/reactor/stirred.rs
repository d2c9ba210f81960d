use twine_core::Model;
use uom::si::{
    f64::{MassRate, Pressure, Time, Volume},
    mass_rate::kilogram_per_second,
    pressure::pascal,
    volume::cubic_meter,
};

use crate::{
    models::ConfigError,
    support::{
        thermo::{
            State,
            capability::EquilibriumConstraint,
            fluid::Composition,
        },
        units::FlowCoefficient,
    },
};

use super::{
    Contents, ReactorError,
    core::{Chemistry, Inlet, ReactorThermoModel, SteadyState, SteadyStateConfig, WellMixedReactor},
    flow_law::{Outlet, ResidenceTimeFlow},
};

/// Perfectly stirred reactor parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StirredReactorConfig {
    pub volume: Volume,
    /// Gain of the outlet pressure controller.
    pub outlet_coefficient: FlowCoefficient,
    pub chemistry: Chemistry,
    pub steady: SteadyStateConfig,
}

impl Default for StirredReactorConfig {
    /// One cubic meter vented at `0.01 kg/(s·Pa)`.
    fn default() -> Self {
        Self {
            volume: Volume::new::<cubic_meter>(1.0),
            outlet_coefficient: MassRate::new::<kilogram_per_second>(0.01)
                / Pressure::new::<pascal>(1.0),
            chemistry: Chemistry::Reacting,
            steady: SteadyStateConfig::default(),
        }
    }
}

/// One stirred reactor operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StirredReactorInput {
    /// Feed state; its pressure is also the downstream pressure.
    pub inlet: State<Composition>,
    pub residence_time: Time,
    /// Starting contents, or `None` to start from the burned inlet.
    pub initial: Option<Contents>,
}

/// Perfectly stirred reactor as a [`Model`] from operating point to
/// [`SteadyState`].
///
/// The feed is drawn at `m / τ`, so the residence time stays at `τ` while the
/// reactor mass changes. Without given starting contents the reactor is filled
/// with the constant-pressure equilibrium of the feed, which selects the
/// burning solution whenever one exists.
#[derive(Debug, Clone)]
pub struct StirredReactor<T> {
    pub config: StirredReactorConfig,
    pub thermo: T,
}

impl<T: ReactorThermoModel> StirredReactor<T> {
    #[must_use]
    pub fn new(thermo: T) -> Self {
        Self {
            config: StirredReactorConfig::default(),
            thermo,
        }
    }

    #[must_use]
    pub fn with_config(config: StirredReactorConfig, thermo: T) -> Self {
        Self { config, thermo }
    }

    /// Contents used when a run provides none.
    ///
    /// # Errors
    ///
    /// Returns [`ReactorError::ThermoModelFailed`] if the equilibrium or the
    /// fill fails.
    pub fn initial_contents(&self, inlet: &State<Composition>) -> Result<Contents, ReactorError> {
        initial_contents(&self.config, &self.thermo, inlet)
    }
}

fn initial_contents<T: ReactorThermoModel>(
    config: &StirredReactorConfig,
    thermo: &T,
    inlet: &State<Composition>,
) -> Result<Contents, ReactorError> {
    let fill = match config.chemistry {
        Chemistry::Reacting => thermo
            .equilibrate(inlet, EquilibriumConstraint::EnthalpyPressure)
            .map_err(|err| ReactorError::thermo_failed("equilibrate(HP, inlet)", err))?,
        Chemistry::Frozen => *inlet,
    };
    Contents::fill(thermo, &fill, config.volume)
        .map_err(|err| ReactorError::thermo_failed("fill(initial)", err))
}

/// Drives a stirred reactor to steady state without owning the thermo model.
pub(crate) fn solve_stirred<T: ReactorThermoModel>(
    config: &StirredReactorConfig,
    thermo: &T,
    input: &StirredReactorInput,
) -> Result<SteadyState, ReactorError> {
    let law = ResidenceTimeFlow::new(input.residence_time)
        .map_err(ConfigError::parameter("residence time"))?;
    let downstream = thermo
        .pressure(&input.inlet)
        .map_err(|err| ReactorError::thermo_failed("pressure(inlet)", err))?;

    let reactor = WellMixedReactor::new(
        config.volume,
        vec![Inlet {
            state: input.inlet,
            law,
        }],
        Outlet::PressureController {
            coefficient: config.outlet_coefficient,
            downstream,
        },
        config.chemistry,
    )?;

    let initial = match input.initial {
        Some(contents) => contents,
        None => initial_contents(config, thermo, &input.inlet)?,
    };

    reactor.solve_steady(thermo, initial, &config.steady)
}

impl<T: ReactorThermoModel> Model for StirredReactor<T> {
    type Input = StirredReactorInput;
    type Output = SteadyState;
    type Error = ReactorError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        solve_stirred(&self.config, &self.thermo, input)
    }
}
