use twine_core::Model;
use uom::si::{
    f64::{Pressure, Ratio},
    ratio::ratio,
};

use crate::{
    models::{ConfigError, StageError},
    support::{
        constraint::{Constrained, StrictlyPositive, UnitIntervalLowerOpen},
        stream::Stream,
        thermo::capability::{HasEnthalpy, HasEntropy, HasPressure, StateFrom, ThermoModel},
        units::{SpecificEnthalpy, SpecificEntropy},
    },
};

use super::core::{Machine, MachineResults, TurbomachineryThermoModel, isentropic_process};

/// Validated turbine parameters.
///
/// The pressure ratio is outlet over inlet, so it lies in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurbineConfig {
    pressure_ratio: Constrained<Ratio, StrictlyPositive>,
    efficiency: Constrained<Ratio, UnitIntervalLowerOpen>,
}

impl TurbineConfig {
    /// Creates a turbine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `efficiency` is outside `(0, 1]` or if
    /// `pressure_ratio` is outside `(0, 1]`.
    pub fn new(pressure_ratio: Ratio, efficiency: Ratio) -> Result<Self, ConfigError> {
        let efficiency = UnitIntervalLowerOpen::new(efficiency)
            .map_err(ConfigError::parameter("turbine isentropic efficiency"))?;

        let pressure_ratio = StrictlyPositive::new(pressure_ratio)
            .map_err(ConfigError::parameter("turbine pressure ratio"))?;

        let r = pressure_ratio.as_ref().get::<ratio>();
        if r > 1.0 {
            return Err(ConfigError::PressureRatio {
                machine: "turbine",
                ratio: r,
                allowed: "(0, 1]",
            });
        }

        Ok(Self {
            pressure_ratio,
            efficiency,
        })
    }

    #[must_use]
    pub fn pressure_ratio(&self) -> Ratio {
        self.pressure_ratio.into_inner()
    }

    #[must_use]
    pub fn efficiency(&self) -> Ratio {
        self.efficiency.into_inner()
    }
}

/// Expands `inlet` by the configured pressure ratio.
///
/// # Errors
///
/// Returns [`StageError::ThermoModelFailed`] if the thermodynamic model fails.
pub fn expand<Fluid, T>(
    inlet: &Stream<Fluid>,
    config: &TurbineConfig,
    thermo: &T,
) -> Result<MachineResults<Fluid>, StageError>
where
    Fluid: Clone,
    T: TurbomachineryThermoModel<Fluid>,
{
    isentropic_process(
        Machine::Turbine,
        inlet,
        config.pressure_ratio().get::<ratio>(),
        config.efficiency().get::<ratio>(),
        thermo,
    )
}

/// Turbine stage as a [`Model`] from inlet stream to [`MachineResults`].
#[derive(Debug, Clone)]
pub struct Turbine<T> {
    pub config: TurbineConfig,
    pub thermo: T,
}

impl<T> Turbine<T> {
    #[must_use]
    pub fn new(config: TurbineConfig, thermo: T) -> Self {
        Self { config, thermo }
    }
}

impl<T> Model for Turbine<T>
where
    T: HasPressure
        + HasEnthalpy
        + HasEntropy
        + StateFrom<(<T as ThermoModel>::Fluid, Pressure, SpecificEntropy)>
        + StateFrom<(<T as ThermoModel>::Fluid, Pressure, SpecificEnthalpy)>,
    T::Fluid: Clone,
{
    type Input = Stream<T::Fluid>;
    type Output = MachineResults<T::Fluid>;
    type Error = StageError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        expand(input, &self.config, &self.thermo)
    }
}
