use twine_core::Model;
use uom::si::{
    f64::{Pressure, Ratio},
    ratio::ratio,
};

use crate::{
    models::{ConfigError, StageError},
    support::{
        constraint::{Constrained, UnitIntervalLowerOpen},
        stream::Stream,
        thermo::capability::{HasEnthalpy, HasEntropy, HasPressure, StateFrom, ThermoModel},
        units::{SpecificEnthalpy, SpecificEntropy},
    },
};

use super::core::{Machine, MachineResults, TurbomachineryThermoModel, isentropic_process};

/// Validated compressor parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorConfig {
    pressure_ratio: Ratio,
    efficiency: Constrained<Ratio, UnitIntervalLowerOpen>,
}

impl CompressorConfig {
    /// Creates a compressor configuration.
    ///
    /// A pressure ratio of exactly one is a pass-through machine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `efficiency` is outside `(0, 1]` or if
    /// `pressure_ratio` is below one or not finite.
    pub fn new(pressure_ratio: Ratio, efficiency: Ratio) -> Result<Self, ConfigError> {
        let efficiency = UnitIntervalLowerOpen::new(efficiency)
            .map_err(ConfigError::parameter("compressor isentropic efficiency"))?;

        let r = pressure_ratio.get::<ratio>();
        if !r.is_finite() || r < 1.0 {
            return Err(ConfigError::PressureRatio {
                machine: "compressor",
                ratio: r,
                allowed: "[1, ∞)",
            });
        }

        Ok(Self {
            pressure_ratio,
            efficiency,
        })
    }

    #[must_use]
    pub fn pressure_ratio(&self) -> Ratio {
        self.pressure_ratio
    }

    #[must_use]
    pub fn efficiency(&self) -> Ratio {
        self.efficiency.into_inner()
    }
}

/// Compresses `inlet` by the configured pressure ratio.
///
/// # Errors
///
/// Returns [`StageError::ThermoModelFailed`] if the thermodynamic model fails.
pub fn compress<Fluid, T>(
    inlet: &Stream<Fluid>,
    config: &CompressorConfig,
    thermo: &T,
) -> Result<MachineResults<Fluid>, StageError>
where
    Fluid: Clone,
    T: TurbomachineryThermoModel<Fluid>,
{
    isentropic_process(
        Machine::Compressor,
        inlet,
        config.pressure_ratio.get::<ratio>(),
        config.efficiency().get::<ratio>(),
        thermo,
    )
}

/// Compressor stage as a [`Model`] from inlet stream to [`MachineResults`].
#[derive(Debug, Clone)]
pub struct Compressor<T> {
    pub config: CompressorConfig,
    pub thermo: T,
}

impl<T> Compressor<T> {
    #[must_use]
    pub fn new(config: CompressorConfig, thermo: T) -> Self {
        Self { config, thermo }
    }
}

impl<T> Model for Compressor<T>
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
        compress(input, &self.config, &self.thermo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use uom::si::{
        available_energy::joule_per_kilogram, pressure::pascal, thermodynamic_temperature::kelvin,
    };

    use crate::{
        models::test_support::{gas_stream, mock_gas_model},
        support::{constraint::ConstraintError, thermo::capability::HasPressure},
    };

    fn config(r: f64, eta: f64) -> CompressorConfig {
        CompressorConfig::new(Ratio::new::<ratio>(r), Ratio::new::<ratio>(eta)).unwrap()
    }

    #[test]
    fn ideal_compression_follows_the_isentropic_relation() {
        let thermo = mock_gas_model();
        let inlet = gas_stream(293.0, 1e5, 0.02);

        let result = compress(&inlet, &config(3.0, 1.0), &thermo).unwrap();

        // T2 = T1·r^((k−1)/k) with k = 1.4
        let expected = 293.0 * 3.0_f64.powf(0.4 / 1.4);
        assert_relative_eq!(
            result.outlet.state.temperature.get::<kelvin>(),
            expected,
            epsilon = 1e-9
        );
        assert_relative_eq!(expected, 401.0, epsilon = 0.5);
        assert_relative_eq!(
            thermo.pressure(&result.outlet.state).unwrap().get::<pascal>(),
            3e5,
            max_relative = 1e-12
        );
        assert_eq!(result.isentropic_work, result.specific_work);
    }

    #[test]
    fn inefficient_compression_runs_hotter() {
        let thermo = mock_gas_model();
        let inlet = gas_stream(293.0, 1e5, 0.02);

        let result = compress(&inlet, &config(3.0, 0.66), &thermo).unwrap();

        assert!(result.outlet.state.temperature.get::<kelvin>() > 401.0);
        assert!(result.isentropic_outlet.temperature < result.outlet.state.temperature);
        assert_relative_eq!(
            result.specific_work.get::<joule_per_kilogram>(),
            result.isentropic_work.get::<joule_per_kilogram>() / 0.66,
            max_relative = 1e-12
        );
        assert_eq!(result.outlet.mass_rate(), inlet.mass_rate());
        assert_relative_eq!(
            result.power.value,
            result.specific_work.value * 0.02,
            max_relative = 1e-12
        );
    }

    #[test]
    fn unit_ratio_is_a_pass_through() {
        let thermo = mock_gas_model();
        let inlet = gas_stream(293.0, 1e5, 0.02);

        let result = compress(&inlet, &config(1.0, 0.8), &thermo).unwrap();

        assert_relative_eq!(
            result.outlet.state.temperature.get::<kelvin>(),
            293.0,
            epsilon = 1e-9
        );
        assert!(result.power.value.abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let r = |v| Ratio::new::<ratio>(v);

        assert_eq!(
            CompressorConfig::new(r(3.0), r(0.0)).unwrap_err(),
            ConfigError::Parameter {
                parameter: "compressor isentropic efficiency",
                source: ConstraintError::BelowMinimum,
            }
        );
        assert!(CompressorConfig::new(r(3.0), r(1.2)).is_err());
        assert!(matches!(
            CompressorConfig::new(r(0.5), r(0.8)).unwrap_err(),
            ConfigError::PressureRatio { .. }
        ));
        assert!(CompressorConfig::new(r(-2.0), r(0.8)).is_err());
    }

    #[test]
    fn model_calls_are_idempotent() {
        let compressor = Compressor::new(config(3.0, 0.66), mock_gas_model());
        let inlet = gas_stream(293.0, 1e5, 0.02);

        let first = compressor.call(&inlet).unwrap();
        let second = compressor.call(&inlet).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn work_grows_as_efficiency_drops(
            r in 1.1_f64..8.0,
            eta_low in 0.3_f64..0.95,
            gap in 0.01_f64..0.05,
        ) {
            let thermo = mock_gas_model();
            let inlet = gas_stream(293.0, 1e5, 0.02);
            let eta_high = eta_low + gap;

            let low = compress(&inlet, &config(r, eta_low), &thermo).unwrap();
            let high = compress(&inlet, &config(r, eta_high), &thermo).unwrap();

            prop_assert!(low.specific_work > high.specific_work);
            prop_assert!(low.outlet.state.temperature > high.outlet.state.temperature);
        }
    }
}
