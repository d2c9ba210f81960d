//! Duct flow at constant pressure.

use twine_core::{DerivativeOf, Model, OdeProblem, StepIntegrable};
use twine_solvers::transient::euler;
use uom::si::{
    f64::{Area, Frequency, Length, MassRate, Pressure, Time, Velocity, Volume},
    length::meter,
    mass_rate::kilogram_per_second,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
    time::second,
    velocity::meter_per_second,
};

use crate::{
    models::ConfigError,
    support::{
        constraint::{Constrained, ConstraintError, StrictlyPositive},
        stream::Stream,
        thermo::{
            State,
            capability::{HasEnthalpy, HasPressure, HasReactionRates, StateFrom, ThermoModel},
            fluid::{Composition, Species},
        },
        units::SpecificEnthalpy,
    },
};

use super::{
    Contents, ReactorError,
    core::{
        Chemistry, Inlet, ReactorThermoModel, SteadyStateConfig, WellMixedReactor,
        integration_failed,
    },
    flow_law::{ConstantFlow, Outlet},
};

/// Required thermo model bounds for the Lagrangian plug-flow reactor.
#[doc(hidden)]
pub trait PlugFlowThermoModel:
    ThermoModel<Fluid = Composition>
    + HasPressure
    + HasEnthalpy
    + HasReactionRates
    + StateFrom<(Composition, Pressure, SpecificEnthalpy)>
{
}

impl<T> PlugFlowThermoModel for T where
    T: ThermoModel<Fluid = Composition>
        + HasPressure
        + HasEnthalpy
        + HasReactionRates
        + StateFrom<(Composition, Pressure, SpecificEnthalpy)>
{
}

/// Duct geometry and discretization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlugFlowConfig {
    length: Constrained<Length, StrictlyPositive>,
    area: Constrained<Area, StrictlyPositive>,
    steps: usize,
}

impl PlugFlowConfig {
    /// Creates a duct of `length` and cross-section `area` split into `steps`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parameter`] if the length or the area is not
    /// strictly positive, or if `steps` is zero.
    pub fn new(length: Length, area: Area, steps: usize) -> Result<Self, ConfigError> {
        let length = StrictlyPositive::new(length).map_err(ConfigError::parameter("duct length"))?;
        let area = StrictlyPositive::new(area).map_err(ConfigError::parameter("duct area"))?;
        if steps == 0 {
            return Err(ConfigError::Parameter {
                parameter: "plug-flow steps",
                source: ConstraintError::Zero,
            });
        }
        Ok(Self {
            length,
            area,
            steps,
        })
    }

    #[must_use]
    pub fn length(&self) -> Length {
        self.length.into_inner()
    }

    #[must_use]
    pub fn area(&self) -> Area {
        self.area.into_inner()
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[allow(clippy::cast_precision_loss)]
    fn steps_f64(&self) -> f64 {
        self.steps as f64
    }
}

/// Flow state at one point along the duct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlugFlowSample {
    pub position: Length,
    /// Time since entering the duct.
    pub time: Time,
    pub velocity: Velocity,
    pub state: State<Composition>,
}

/// Axial profile of a duct at a conserved mass flow.
#[derive(Debug, Clone, PartialEq)]
pub struct PlugFlowProfile {
    pub samples: Vec<PlugFlowSample>,
    pub outlet: Stream<Composition>,
}

/// Equal-length SI columns of a [`PlugFlowProfile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSeries {
    /// Meters.
    pub position: Vec<f64>,
    /// Seconds.
    pub time: Vec<f64>,
    /// Meters per second.
    pub velocity: Vec<f64>,
    /// Kelvin.
    pub temperature: Vec<f64>,
}

impl PlugFlowProfile {
    #[must_use]
    pub fn mass_rate(&self) -> MassRate {
        self.outlet.mass_rate()
    }

    #[must_use]
    pub fn series(&self) -> ProfileSeries {
        let column =
            |f: fn(&PlugFlowSample) -> f64| -> Vec<f64> { self.samples.iter().map(f).collect() };
        ProfileSeries {
            position: column(|s| s.position.get::<meter>()),
            time: column(|s| s.time.get::<second>()),
            velocity: column(|s| s.velocity.get::<meter_per_second>()),
            temperature: column(|s| s.state.temperature.get::<kelvin>()),
        }
    }
}

/// Follows one constant-pressure parcel through the duct.
///
/// The parcel keeps the inlet pressure and enthalpy while its species react.
/// The travel time `L / u₀`, with `u₀ = ṁ / (ρ₀·A)`, is split into equal
/// steps, and the parcel advances at its local velocity `ṁ / (ρ·A)` each step.
/// The profile holds the inlet plus one sample per step.
///
/// # Errors
///
/// - [`ReactorError::Config`] if the inlet carries no mass.
/// - [`ReactorError::ThermoModelFailed`] if the thermo model fails.
pub fn lagrangian_plug_flow<T: PlugFlowThermoModel>(
    inlet: &Stream<Composition>,
    config: &PlugFlowConfig,
    thermo: &T,
) -> Result<PlugFlowProfile, ReactorError> {
    let mass_rate = inlet.mass_rate();
    if mass_rate.get::<kilogram_per_second>() <= 0.0 {
        return Err(ConfigError::ZeroFlow.into());
    }

    let pressure = thermo
        .pressure(&inlet.state)
        .map_err(|err| ReactorError::thermo_failed("pressure(inlet)", err))?;
    let enthalpy = thermo
        .enthalpy(&inlet.state)
        .map_err(|err| ReactorError::thermo_failed("enthalpy(inlet)", err))?;

    let inlet_velocity = mass_rate / (inlet.state.density * config.area());
    let dt = config.length() / inlet_velocity / config.steps_f64();

    let model = Parcel {
        thermo,
        pressure,
        enthalpy,
        mass_rate,
        area: config.area(),
    };
    let problem = ParcelTransport { dt };
    let start = ParcelInput {
        position: ParcelPosition {
            fractions: inlet.state.fluid.mass_fractions(),
            position: Length::new::<meter>(0.0),
        },
        time: Time::new::<second>(0.0),
    };

    let solution = euler::solve_unobserved(&model, &problem, start, dt, config.steps)
        .map_err(integration_failed)?;

    let samples: Vec<_> = solution
        .history
        .iter()
        .map(|snapshot| PlugFlowSample {
            position: snapshot.input.position.position,
            time: snapshot.input.time,
            velocity: snapshot.output.velocity,
            state: snapshot.output.state,
        })
        .collect();
    let exit = samples.last().map_or(inlet.state, |sample| sample.state);

    Ok(PlugFlowProfile {
        samples,
        outlet: inlet.with_state(exit),
    })
}

/// Well-mixed reactor settings shared by every segment of a
/// [`reactor_chain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainConfig {
    /// Outlet controller gain relative to the through-flow, so that
    /// `K = gain · ṁ / P_in`.
    pub controller_gain: f64,
    pub chemistry: Chemistry,
    pub steady: SteadyStateConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            controller_gain: 1.0,
            chemistry: Chemistry::Reacting,
            steady: SteadyStateConfig::default(),
        }
    }
}

/// Approximates the duct by `steps` well-mixed reactors in series.
///
/// Every segment has volume `A·L / steps`, is fed the upstream outlet at the
/// inlet mass flow, and is held at the inlet pressure. Each starts filled
/// with its own feed brought to that pressure. Samples sit at the segment
/// centres.
///
/// # Errors
///
/// - [`ReactorError::Config`] if the inlet carries no mass or the controller
///   gain is not strictly positive.
/// - Any error from driving a segment to steady state.
pub fn reactor_chain<T: ReactorThermoModel>(
    inlet: &Stream<Composition>,
    config: &PlugFlowConfig,
    chain: &ChainConfig,
    thermo: &T,
) -> Result<PlugFlowProfile, ReactorError> {
    let mass_rate = inlet.mass_rate();
    if mass_rate.get::<kilogram_per_second>() <= 0.0 {
        return Err(ConfigError::ZeroFlow.into());
    }
    StrictlyPositive::new(chain.controller_gain)
        .map_err(ConfigError::parameter("controller gain"))?;

    let pressure = thermo
        .pressure(&inlet.state)
        .map_err(|err| ReactorError::thermo_failed("pressure(inlet)", err))?;
    let outlet = Outlet::PressureController {
        coefficient: chain.controller_gain * mass_rate / pressure,
        downstream: pressure,
    };

    let segment_length = config.length() / config.steps_f64();
    let volume: Volume = config.area() * segment_length;
    let law = ConstantFlow::new(mass_rate).map_err(ConfigError::parameter("inlet mass flow"))?;

    let mut upstream = *inlet;
    let mut elapsed = Time::new::<second>(0.0);
    let mut samples = Vec::with_capacity(config.steps);

    for i in 0..config.steps {
        let reactor = WellMixedReactor::new(
            volume,
            vec![Inlet {
                state: upstream.state,
                law,
            }],
            outlet,
            chain.chemistry,
        )?;
        let feed = upstream.state;
        let fill = thermo
            .state_from((feed.fluid, feed.temperature, pressure))
            .map_err(|err| ReactorError::thermo_failed(format!("state_from(segment {i})"), err))?;
        let initial = Contents::fill(thermo, &fill, volume)
            .map_err(|err| ReactorError::thermo_failed(format!("fill(segment {i})"), err))?;
        let steady = reactor.solve_steady(thermo, initial, &chain.steady)?;

        let residence_time = steady.contents.mass() / mass_rate;
        #[allow(clippy::cast_precision_loss)]
        let centre = segment_length * (i as f64 + 0.5);
        samples.push(PlugFlowSample {
            position: centre,
            time: elapsed + 0.5 * residence_time,
            velocity: mass_rate / (steady.state.density * config.area()),
            state: steady.state,
        });

        elapsed += residence_time;
        upstream = upstream.with_state(steady.state);
    }

    Ok(PlugFlowProfile {
        samples,
        outlet: upstream,
    })
}

/// Parcel composition and position, the integrated quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ParcelPosition {
    fractions: [f64; Species::COUNT],
    position: Length,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParcelRate {
    fractions: [Frequency; Species::COUNT],
    velocity: Velocity,
}

impl StepIntegrable<Time> for ParcelPosition {
    type Derivative = ParcelRate;

    fn step(&self, derivative: ParcelRate, dt: Time) -> Self {
        Self {
            fractions: std::array::from_fn(|k| {
                self.fractions[k] + (derivative.fractions[k] * dt).get::<ratio>()
            }),
            position: self.position + derivative.velocity * dt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParcelInput {
    position: ParcelPosition,
    time: Time,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParcelOutput {
    state: State<Composition>,
    velocity: Velocity,
    /// `ω / ρ` per species.
    rates: [Frequency; Species::COUNT],
}

struct Parcel<'a, T> {
    thermo: &'a T,
    pressure: Pressure,
    enthalpy: SpecificEnthalpy,
    mass_rate: MassRate,
    area: Area,
}

impl<T: PlugFlowThermoModel> Model for Parcel<'_, T> {
    type Input = ParcelInput;
    type Output = ParcelOutput;
    type Error = ReactorError;

    fn call(&self, input: &ParcelInput) -> Result<ParcelOutput, ReactorError> {
        let composition = Composition::from_masses(
            Species::ALL.into_iter().zip(input.position.fractions),
        )
        .map_err(|err| ReactorError::thermo_failed("composition(parcel)", err))?;

        let state = self
            .thermo
            .state_from((composition, self.pressure, self.enthalpy))
            .map_err(|err| {
                ReactorError::thermo_failed(
                    format!(
                        "parcel_state_from(p={:?}, h={:?})",
                        self.pressure, self.enthalpy
                    ),
                    err,
                )
            })?;

        let production = self
            .thermo
            .production_rates(&state)
            .map_err(|err| ReactorError::thermo_failed("production_rates(parcel)", err))?;

        Ok(ParcelOutput {
            state,
            velocity: self.mass_rate / (state.density * self.area),
            rates: production.map(|omega| omega / state.density),
        })
    }
}

/// Species transport along a parcel path.
///
/// Consumption of species `k` is scaled by `Y / (Y + dt·c)` so a step never
/// overdraws it; the smallest scale applies to every species.
struct ParcelTransport {
    dt: Time,
}

impl OdeProblem for ParcelTransport {
    type Input = ParcelInput;
    type Output = ParcelOutput;
    type Delta = Time;
    type State = ParcelPosition;
    type Error = std::convert::Infallible;

    fn state(&self, input: &ParcelInput) -> Result<ParcelPosition, Self::Error> {
        Ok(input.position)
    }

    fn derivative(
        &self,
        input: &ParcelInput,
        output: &ParcelOutput,
    ) -> Result<DerivativeOf<ParcelPosition, Time>, Self::Error> {
        let mut scale: f64 = 1.0;
        for (y, rate) in input.position.fractions.iter().zip(output.rates) {
            let consumption = -(rate * self.dt).get::<ratio>();
            if consumption > 0.0 {
                scale = scale.min((y / (y + consumption)).clamp(0.0, 1.0));
            }
        }

        Ok(ParcelRate {
            fractions: output.rates.map(|rate| rate * scale),
            velocity: output.velocity,
        })
    }

    fn build_input(
        &self,
        base: &ParcelInput,
        state: &ParcelPosition,
        delta: &Time,
    ) -> Result<ParcelInput, Self::Error> {
        Ok(ParcelInput {
            position: *state,
            time: base.time + *delta,
        })
    }

    fn finalize_step(
        &self,
        next_input: ParcelInput,
        _prev_input: &ParcelInput,
        _prev_output: &ParcelOutput,
        _step_delta: &Time,
    ) -> Result<ParcelInput, Self::Error> {
        let mut position = next_input.position;
        for y in &mut position.fractions {
            *y = y.max(0.0);
        }
        Ok(ParcelInput {
            position,
            ..next_input
        })
    }
}
