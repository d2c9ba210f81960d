//! Micro gas-turbine cycle, simple or recuperated.
//!
//! Intake air is compressed, blended with fuel at the compressor delivery
//! pressure, burned to adiabatic equilibrium, and expanded back to the intake
//! pressure. An optional recuperator preheats the compressed air with the
//! turbine exhaust before the fuel is added. The [`CycleReport`] carries every
//! stage result plus the shaft and fuel power balance.
//!
//! ```no_run
//! use twine_microturbine::{
//!     models::cycle::{self, CycleConfig},
//!     support::thermo::model::IdealGasMixture,
//! };
//! use uom::si::power::watt;
//!
//! let report = cycle::run(&CycleConfig::default(), &IdealGasMixture::new()).unwrap();
//! println!("net power: {:.0} W", report.net_power.get::<watt>());
//! ```

use thiserror::Error;
use twine_core::Model;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{MassRate, Power, Pressure, Ratio, TemperatureInterval, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    power::watt,
    pressure::pascal,
    ratio::ratio,
    temperature_interval,
    thermodynamic_temperature::kelvin,
};

use crate::{
    models::{
        ConfigError, StageError,
        combustion::burn,
        flow::{MixerConfig, MixerThermoModel, mix},
        turbomachinery::{
            CompressorConfig, MachineResults, TurbineConfig, TurbomachineryThermoModel, compress,
            expand,
        },
    },
    support::{
        constraint::{Constrained, NonNegative, UnitIntervalUpperOpen},
        stream::Stream,
        thermo::{
            capability::{Equilibrate, StateFrom},
            fluid::{Composition, Species},
        },
        units::SpecificEnthalpy,
    },
};

/// Required thermo model bounds for the cycle.
#[doc(hidden)]
pub trait CycleThermoModel:
    TurbomachineryThermoModel<Composition>
    + MixerThermoModel<Composition>
    + Equilibrate
    + StateFrom<(Composition, ThermodynamicTemperature, Pressure)>
{
}

impl<T> CycleThermoModel for T where
    T: TurbomachineryThermoModel<Composition>
        + MixerThermoModel<Composition>
        + Equilibrate
        + StateFrom<(Composition, ThermodynamicTemperature, Pressure)>
{
}

/// Exhaust-to-air recuperator between the compressor and the combustor.
///
/// The compressed air leaves at `h₂ + ε·(h_air(T₅, P₂) − h₂)`, where `T₅`
/// is the turbine exhaust temperature and `P₂` the delivery pressure; the
/// exhaust gives up the same heat. Pressure losses are neglected. Since `T₅`
/// depends on the preheat, the cycle is repeated from the unrecuperated
/// exhaust temperature until `T₅` moves by less than `temperature_tol`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecuperatorConfig {
    effectiveness: Constrained<Ratio, UnitIntervalUpperOpen>,
    pub max_iters: usize,
    pub temperature_tol: TemperatureInterval,
}

impl RecuperatorConfig {
    /// Creates a recuperator iterated at most 200 times to within 1 µK.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parameter`] unless `0 ≤ effectiveness < 1`.
    pub fn new(effectiveness: Ratio) -> Result<Self, ConfigError> {
        Ok(Self {
            effectiveness: UnitIntervalUpperOpen::new(effectiveness)
                .map_err(ConfigError::parameter("recuperator effectiveness"))?,
            max_iters: 200,
            temperature_tol: TemperatureInterval::new::<temperature_interval::kelvin>(1e-6),
        })
    }

    #[must_use]
    pub fn effectiveness(&self) -> Ratio {
        self.effectiveness.into_inner()
    }
}

/// Operating point and component parameters for one cycle run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleConfig {
    pub intake_temperature: ThermodynamicTemperature,
    pub intake_pressure: Pressure,
    pub air_mass_rate: MassRate,
    pub fuel_mass_rate: MassRate,
    pub fuel: Composition,
    pub oxidizer: Composition,
    pub pressure_ratio: Ratio,
    pub compressor_efficiency: Ratio,
    pub turbine_efficiency: Ratio,
    /// Lower heating value of the fuel.
    pub fuel_heating_value: SpecificEnthalpy,
    pub mixer: MixerConfig,
    /// Simple cycle when `None`.
    pub recuperator: Option<RecuperatorConfig>,
}

impl Default for CycleConfig {
    /// A small hydrogen-fired machine at sea-level intake conditions.
    fn default() -> Self {
        Self {
            intake_temperature: ThermodynamicTemperature::new::<kelvin>(293.0),
            intake_pressure: Pressure::new::<pascal>(1e5),
            air_mass_rate: MassRate::new::<kilogram_per_second>(0.020),
            fuel_mass_rate: MassRate::new::<kilogram_per_second>(0.097e-3),
            fuel: Composition::pure(Species::H2),
            oxidizer: Composition::dry_air(),
            pressure_ratio: Ratio::new::<ratio>(3.0),
            compressor_efficiency: Ratio::new::<ratio>(0.66),
            turbine_efficiency: Ratio::new::<ratio>(0.73),
            fuel_heating_value: SpecificEnthalpy::new::<joule_per_kilogram>(120e6),
            mixer: MixerConfig::default(),
            recuperator: None,
        }
    }
}

/// Heat recovered by the recuperator at the converged operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct RecuperatorReport {
    /// Compressed air after preheating.
    pub air_outlet: Stream<Composition>,
    /// Turbine exhaust after giving up the preheat.
    pub exhaust_outlet: Stream<Composition>,
    pub heat_rate: Power,
    /// Cycle evaluations until the exhaust temperature settled.
    pub iterations: usize,
}

/// Stage results and power balance of a cycle run.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub compressor: MachineResults<Composition>,
    pub recuperator: Option<RecuperatorReport>,
    /// Fuel and (preheated) compressed air entering the combustor.
    pub mixture: Stream<Composition>,
    /// Combustor products.
    pub combustor: Stream<Composition>,
    pub turbine: MachineResults<Composition>,
    /// Turbine power minus compressor power.
    pub net_power: Power,
    /// Heating value times fuel flow.
    pub fuel_power: Power,
    pub thermal_efficiency: Ratio,
    pub equivalence_ratio: f64,
}

/// Errors from a cycle run.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Stage(#[from] StageError),

    /// The recuperated exhaust temperature kept moving.
    #[error("recuperator did not settle after {iterations} iterations (last change {change:?})")]
    RecuperatorNotConverged {
        iterations: usize,
        change: TemperatureInterval,
    },
}

impl From<ConfigError> for CycleError {
    fn from(err: ConfigError) -> Self {
        Self::Stage(err.into())
    }
}

/// Runs the cycle.
///
/// # Errors
///
/// - [`StageError::Config`] if a component parameter or flow rate is invalid.
///   These checks run before any property evaluation.
/// - [`StageError::ThermoModelFailed`] if the thermo model fails in any stage.
/// - [`CycleError::RecuperatorNotConverged`] if the recuperated exhaust
///   temperature has not settled after `max_iters` evaluations.
pub fn run<T: CycleThermoModel>(config: &CycleConfig, thermo: &T) -> Result<CycleReport, CycleError> {
    let compressor = CompressorConfig::new(config.pressure_ratio, config.compressor_efficiency)?;
    // Validates the efficiency now; the ratio is only known after combustion.
    TurbineConfig::new(Ratio::new::<ratio>(1.0), config.turbine_efficiency)?;
    let air_rate =
        NonNegative::new(config.air_mass_rate).map_err(ConfigError::parameter("air mass flow"))?;
    let fuel_rate =
        NonNegative::new(config.fuel_mass_rate).map_err(ConfigError::parameter("fuel mass flow"))?;

    let intake = thermo
        .state_from((config.oxidizer, config.intake_temperature, config.intake_pressure))
        .map_err(|err| StageError::thermo_failed("intake_state_from(T, P)", err))?;
    let air = Stream::from_constrained(intake, air_rate);

    let compressed = compress(&air, &compressor, thermo)?;
    let delivery = thermo
        .pressure(&compressed.outlet.state)
        .map_err(|err| StageError::thermo_failed("pressure(compressor outlet)", err))?;

    let fuel_state = thermo
        .state_from((config.fuel, config.intake_temperature, delivery))
        .map_err(|err| StageError::thermo_failed("fuel_state_from(T, P)", err))?;
    let fuel = Stream::from_constrained(fuel_state, fuel_rate);

    let mut hot = hot_section(&compressed.outlet, &fuel, config, thermo)?;
    let recuperator = match config.recuperator {
        Some(recuperator) => {
            let (recuperated, report) =
                recuperate(&compressed.outlet, &fuel, hot, &recuperator, config, thermo)?;
            hot = recuperated;
            Some(report)
        }
        None => None,
    };
    let HotSection {
        mixture,
        products,
        expanded,
    } = hot;

    let net_power = expanded.power - compressed.power;
    let fuel_power = config.fuel_heating_value * config.fuel_mass_rate;
    let thermal_efficiency = if fuel_power.get::<watt>() > 0.0 {
        net_power / fuel_power
    } else {
        Ratio::new::<ratio>(0.0)
    };

    tracing::debug!(
        net_power_w = net_power.get::<watt>(),
        fuel_power_w = fuel_power.get::<watt>(),
        thermal_efficiency = thermal_efficiency.get::<ratio>(),
        turbine_inlet_k = products.state.temperature.get::<kelvin>(),
        "cycle evaluated"
    );

    Ok(CycleReport {
        equivalence_ratio: mixture.state.fluid.equivalence_ratio(),
        compressor: compressed,
        recuperator,
        mixture,
        combustor: products,
        turbine: expanded,
        net_power,
        fuel_power,
        thermal_efficiency,
    })
}

/// Combustor and turbine for one combustor air stream.
#[derive(Debug)]
struct HotSection {
    mixture: Stream<Composition>,
    products: Stream<Composition>,
    expanded: MachineResults<Composition>,
}

fn hot_section<T: CycleThermoModel>(
    air: &Stream<Composition>,
    fuel: &Stream<Composition>,
    config: &CycleConfig,
    thermo: &T,
) -> Result<HotSection, StageError> {
    let mixture = mix(&[*air, *fuel], &config.mixer, thermo)?;
    let products = burn(&mixture, thermo)?;

    let combustor_pressure = thermo
        .pressure(&products.state)
        .map_err(|err| StageError::thermo_failed("pressure(combustor outlet)", err))?;
    let turbine = TurbineConfig::new(
        config.intake_pressure / combustor_pressure,
        config.turbine_efficiency,
    )?;
    let expanded = expand(&products, &turbine, thermo)?;

    Ok(HotSection {
        mixture,
        products,
        expanded,
    })
}

/// Repeats the hot section until the exhaust feeding the recuperator stops
/// changing.
fn recuperate<T: CycleThermoModel>(
    compressed: &Stream<Composition>,
    fuel: &Stream<Composition>,
    simple: HotSection,
    recuperator: &RecuperatorConfig,
    config: &CycleConfig,
    thermo: &T,
) -> Result<(HotSection, RecuperatorReport), CycleError> {
    let effectiveness = recuperator.effectiveness().get::<ratio>();
    let tolerance = recuperator
        .temperature_tol
        .get::<temperature_interval::kelvin>();

    let delivery = thermo
        .pressure(&compressed.state)
        .map_err(|err| StageError::thermo_failed("pressure(recuperator air)", err))?;
    let h_air = thermo
        .enthalpy(&compressed.state)
        .map_err(|err| StageError::thermo_failed("enthalpy(recuperator air)", err))?;

    let mut exhaust_temperature = simple.expanded.outlet.state.temperature;
    let mut change = f64::INFINITY;

    for iteration in 1..=recuperator.max_iters {
        let limit = thermo
            .state_from((compressed.state.fluid, exhaust_temperature, delivery))
            .map_err(|err| StageError::thermo_failed("recuperator_limit_state_from(T, P)", err))?;
        let h_limit = thermo
            .enthalpy(&limit)
            .map_err(|err| StageError::thermo_failed("enthalpy(recuperator limit)", err))?;
        let h_preheated = h_air + effectiveness * (h_limit - h_air);
        let preheated = thermo
            .state_from((compressed.state.fluid, delivery, h_preheated))
            .map_err(|err| StageError::thermo_failed("preheated_state_from(P, h)", err))?;
        let air_outlet = compressed.with_state(preheated);

        let hot = hot_section(&air_outlet, fuel, config, thermo)?;
        let next = hot.expanded.outlet.state.temperature;
        change = (next.get::<kelvin>() - exhaust_temperature.get::<kelvin>()).abs();
        exhaust_temperature = next;

        if change <= tolerance {
            let heat_rate = (h_preheated - h_air) * compressed.mass_rate();
            let exhaust = &hot.expanded.outlet;
            let exhaust_outlet = exhaust_after(exhaust, heat_rate, thermo)?;

            tracing::debug!(
                iterations = iteration,
                heat_rate_w = heat_rate.get::<watt>(),
                combustor_inlet_k = hot.mixture.state.temperature.get::<kelvin>(),
                "recuperator settled"
            );

            let report = RecuperatorReport {
                air_outlet,
                exhaust_outlet,
                heat_rate,
                iterations: iteration,
            };
            return Ok((hot, report));
        }
    }

    Err(CycleError::RecuperatorNotConverged {
        iterations: recuperator.max_iters,
        change: TemperatureInterval::new::<temperature_interval::kelvin>(change),
    })
}

/// The exhaust stream once it has given up `heat_rate` at constant pressure.
fn exhaust_after<T: CycleThermoModel>(
    exhaust: &Stream<Composition>,
    heat_rate: Power,
    thermo: &T,
) -> Result<Stream<Composition>, StageError> {
    let pressure = thermo
        .pressure(&exhaust.state)
        .map_err(|err| StageError::thermo_failed("pressure(exhaust)", err))?;
    let enthalpy = thermo
        .enthalpy(&exhaust.state)
        .map_err(|err| StageError::thermo_failed("enthalpy(exhaust)", err))?;
    let cooled: SpecificEnthalpy = enthalpy - heat_rate / exhaust.mass_rate();
    let state = thermo
        .state_from((exhaust.state.fluid, pressure, cooled))
        .map_err(|err| StageError::thermo_failed("exhaust_state_from(P, h)", err))?;
    Ok(exhaust.with_state(state))
}

/// The cycle as a [`Model`] from configuration to [`CycleReport`].
#[derive(Debug, Clone)]
pub struct Cycle<T> {
    pub thermo: T,
}

impl<T> Cycle<T> {
    #[must_use]
    pub fn new(thermo: T) -> Self {
        Self { thermo }
    }
}

impl<T: CycleThermoModel> Model for Cycle<T> {
    type Input = CycleConfig;
    type Output = CycleReport;
    type Error = CycleError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        run(input, &self.thermo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::thermo::{
        capability::{HasEnthalpy, HasPressure},
        model::IdealGasMixture,
    };

    #[test]
    fn default_cycle_produces_a_small_net_output() {
        let thermo = IdealGasMixture::new();
        let report = run(&CycleConfig::default(), &thermo).unwrap();

        let t2 = report.compressor.outlet.state.temperature.get::<kelvin>();
        let t3 = report.combustor.state.temperature.get::<kelvin>();
        assert!(440.0 < t2 && t2 < 475.0, "compressor outlet {t2} K");
        assert!(900.0 < t3 && t3 < 1020.0, "turbine inlet {t3} K");

        assert_relative_eq!(report.equivalence_ratio, 0.166, epsilon = 0.005);
        assert_relative_eq!(report.fuel_power.get::<watt>(), 11_640.0, max_relative = 1e-9);

        let eta = report.thermal_efficiency.get::<ratio>();
        assert!(0.0 < eta && eta < 0.3, "thermal efficiency {eta}");
    }

    #[test]
    fn report_balances_power() {
        let thermo = IdealGasMixture::new();
        let report = run(&CycleConfig::default(), &thermo).unwrap();

        assert_relative_eq!(
            report.net_power.get::<watt>(),
            report.turbine.power.get::<watt>() - report.compressor.power.get::<watt>(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            report.thermal_efficiency.get::<ratio>(),
            report.net_power.get::<watt>() / report.fuel_power.get::<watt>(),
            max_relative = 1e-12
        );

        // Mass is carried through every stage.
        assert_relative_eq!(
            report.turbine.outlet.mass_rate().get::<kilogram_per_second>(),
            0.020 + 0.097e-3,
            max_relative = 1e-12
        );

        // The turbine returns the flow to the intake pressure.
        let exhaust = thermo.pressure(&report.turbine.outlet.state).unwrap();
        assert_relative_eq!(exhaust.get::<pascal>(), 1e5, max_relative = 1e-9);
    }

    #[test]
    fn model_adapter_matches_the_free_function() {
        let thermo = IdealGasMixture::new();
        let config = CycleConfig::default();
        assert_eq!(Cycle::new(thermo).call(&config).unwrap(), run(&config, &thermo).unwrap());
    }

    #[test]
    fn invalid_parameters_fail_before_any_property_call() {
        let thermo = IdealGasMixture::new();

        let config = CycleConfig {
            turbine_efficiency: Ratio::new::<ratio>(1.2),
            ..CycleConfig::default()
        };
        assert!(matches!(
            run(&config, &thermo),
            Err(CycleError::Stage(StageError::Config(ConfigError::Parameter { .. })))
        ));

        let config = CycleConfig {
            fuel_mass_rate: MassRate::new::<kilogram_per_second>(-1.0),
            ..CycleConfig::default()
        };
        assert!(matches!(
            run(&config, &thermo),
            Err(CycleError::Stage(StageError::Config(ConfigError::Parameter {
                parameter: "fuel mass flow",
                ..
            })))
        ));

        let config = CycleConfig {
            pressure_ratio: Ratio::new::<ratio>(0.5),
            ..CycleConfig::default()
        };
        assert!(matches!(
            run(&config, &thermo),
            Err(CycleError::Stage(StageError::Config(ConfigError::PressureRatio { .. })))
        ));
    }

    fn recuperated(effectiveness: f64) -> CycleConfig {
        CycleConfig {
            recuperator: Some(RecuperatorConfig::new(Ratio::new::<ratio>(effectiveness)).unwrap()),
            ..CycleConfig::default()
        }
    }

    #[test]
    fn zero_effectiveness_recuperator_leaves_the_cycle_unchanged() {
        let thermo = IdealGasMixture::new();
        let simple = run(&CycleConfig::default(), &thermo).unwrap();
        let report = run(&recuperated(0.0), &thermo).unwrap();

        let recuperator = report.recuperator.as_ref().unwrap();
        assert_eq!(recuperator.iterations, 1);
        assert_relative_eq!(recuperator.heat_rate.get::<watt>(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            report.thermal_efficiency.get::<ratio>(),
            simple.thermal_efficiency.get::<ratio>(),
            max_relative = 1e-9
        );
        assert_relative_eq!(
            report.combustor.state.temperature.get::<kelvin>(),
            simple.combustor.state.temperature.get::<kelvin>(),
            max_relative = 1e-9
        );
        assert!(simple.recuperator.is_none());
    }

    #[test]
    fn recuperation_raises_efficiency_with_effectiveness() {
        let thermo = IdealGasMixture::new();
        let simple = run(&CycleConfig::default(), &thermo).unwrap();

        let mut previous = simple.thermal_efficiency.get::<ratio>();
        let mut previous_inlet = simple.mixture.state.temperature.get::<kelvin>();
        for effectiveness in [0.5, 0.85] {
            let report = run(&recuperated(effectiveness), &thermo).unwrap();
            let recuperator = report.recuperator.as_ref().unwrap();

            let eta = report.thermal_efficiency.get::<ratio>();
            assert!(eta > previous, "efficiency {eta} at effectiveness {effectiveness}");
            previous = eta;

            let inlet = report.mixture.state.temperature.get::<kelvin>();
            assert!(inlet > previous_inlet, "combustor inlet {inlet} K");
            previous_inlet = inlet;
            assert!(
                report.combustor.state.temperature > simple.combustor.state.temperature,
                "turbine inlet should rise with the preheat"
            );

            // The preheated air stays between the delivery and exhaust temperatures.
            let t2 = report.compressor.outlet.state.temperature.get::<kelvin>();
            let t5 = report.turbine.outlet.state.temperature.get::<kelvin>();
            let t_air = recuperator.air_outlet.state.temperature.get::<kelvin>();
            assert!(t2 < t_air && t_air < t5, "{t2} < {t_air} < {t5}");
            assert!(recuperator.heat_rate.get::<watt>() > 0.0);

            // The power balance holds with the recuperator in the loop.
            assert_relative_eq!(
                report.thermal_efficiency.get::<ratio>(),
                report.net_power.get::<watt>() / report.fuel_power.get::<watt>(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn recuperator_heat_leaves_the_exhaust() {
        let thermo = IdealGasMixture::new();
        let report = run(&recuperated(0.85), &thermo).unwrap();
        let recuperator = report.recuperator.unwrap();

        let heat = recuperator.heat_rate.get::<watt>();
        let exhaust = &report.turbine.outlet;
        let cooled = &recuperator.exhaust_outlet;
        let released = (thermo.enthalpy(&exhaust.state).unwrap()
            - thermo.enthalpy(&cooled.state).unwrap())
            * exhaust.mass_rate();
        assert_relative_eq!(released.get::<watt>(), heat, max_relative = 1e-6);

        let air = &report.compressor.outlet;
        let gained = (thermo.enthalpy(&recuperator.air_outlet.state).unwrap()
            - thermo.enthalpy(&air.state).unwrap())
            * air.mass_rate();
        assert_relative_eq!(gained.get::<watt>(), heat, max_relative = 1e-9);

        // Both sides keep their pressure.
        assert_relative_eq!(
            thermo.pressure(&cooled.state).unwrap().get::<pascal>(),
            1e5,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            thermo.pressure(&recuperator.air_outlet.state).unwrap().get::<pascal>(),
            thermo.pressure(&air.state).unwrap().get::<pascal>(),
            max_relative = 1e-9
        );
        assert!(cooled.state.temperature < exhaust.state.temperature);
    }

    #[test]
    fn recuperator_effectiveness_must_be_below_one() {
        for effectiveness in [1.0, -0.1, f64::NAN] {
            assert!(matches!(
                RecuperatorConfig::new(Ratio::new::<ratio>(effectiveness)),
                Err(ConfigError::Parameter {
                    parameter: "recuperator effectiveness",
                    ..
                })
            ));
        }
        let config = RecuperatorConfig::new(Ratio::new::<ratio>(0.0)).unwrap();
        assert_eq!(config.effectiveness().get::<ratio>(), 0.0);
    }

    #[test]
    fn unsettled_recuperator_is_reported() {
        let thermo = IdealGasMixture::new();
        let mut config = recuperated(0.85);
        if let Some(recuperator) = config.recuperator.as_mut() {
            recuperator.max_iters = 1;
        }

        match run(&config, &thermo) {
            Err(CycleError::RecuperatorNotConverged { iterations, change }) => {
                assert_eq!(iterations, 1);
                assert!(change.get::<temperature_interval::kelvin>() > 1e-6);
            }
            other => panic!("expected RecuperatorNotConverged, got {other:?}"),
        }
    }
}
