//! Well-mixed reactor balance and its steady-state driver.

use twine_core::{DerivativeOf, Model, OdeProblem};
use twine_solvers::transient::euler;
use uom::si::{
    f64::{MassDensity, MassRate, Power, Pressure, ThermodynamicTemperature, Time, Volume},
    mass::kilogram,
    mass_rate::kilogram_per_second,
    power::watt,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::{
    models::ConfigError,
    support::{
        constraint::{Constrained, ConstraintError, ConstraintResult, StrictlyPositive},
        stream::Stream,
        thermo::{
            State,
            capability::{
                Equilibrate, HasEnthalpy, HasInternalEnergy, HasPressure, HasReactionRates,
                StateFrom, ThermoModel,
            },
            fluid::{Composition, Species},
        },
        units::{SpecificEnthalpy, SpecificInternalEnergy, VolumetricPower},
    },
};

use super::{
    contents::{Contents, ContentsRate},
    error::ReactorError,
    flow_law::{FlowLaw, Outlet, ReactorView},
};

/// Required thermo model bounds for reactors.
#[doc(hidden)]
pub trait ReactorThermoModel:
    ThermoModel<Fluid = Composition>
    + HasPressure
    + HasEnthalpy
    + HasInternalEnergy
    + HasReactionRates
    + Equilibrate
    + StateFrom<(Composition, ThermodynamicTemperature, Pressure)>
    + StateFrom<(Composition, Pressure, SpecificEnthalpy)>
    + StateFrom<(Composition, MassDensity, SpecificInternalEnergy)>
{
}

impl<T> ReactorThermoModel for T where
    T: ThermoModel<Fluid = Composition>
        + HasPressure
        + HasEnthalpy
        + HasInternalEnergy
        + HasReactionRates
        + Equilibrate
        + StateFrom<(Composition, ThermodynamicTemperature, Pressure)>
        + StateFrom<(Composition, Pressure, SpecificEnthalpy)>
        + StateFrom<(Composition, MassDensity, SpecificInternalEnergy)>
{
}

/// Whether species react inside the reactor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Chemistry {
    #[default]
    Reacting,
    Frozen,
}

/// A reservoir feeding the reactor through a flow law.
#[derive(Debug, Clone, PartialEq)]
pub struct Inlet<L> {
    pub state: State<Composition>,
    pub law: L,
}

/// Controls for driving a reactor to steady state.
///
/// The step size is `τ_flow / steps_per_residence_time`, where `τ_flow` is
/// the initial mass over the initial inflow, reduced further when the outlet
/// controller would otherwise be unstable. Residence times are counted on the
/// slower of `τ_flow` and the outlet response time `m / (K·P)`.
///
/// The contents are steady once, for `settle_steps` consecutive steps, the
/// relative change of temperature and of mass over one residence time stays
/// below `relative_tolerance`, and so do the relative mass and energy
/// imbalances between feeds and outlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyStateConfig {
    pub steps_per_residence_time: usize,
    pub relative_tolerance: f64,
    pub settle_steps: usize,
    pub max_residence_times: f64,
    /// Residence times integrated per solver call.
    pub window_residence_times: f64,
}

impl Default for SteadyStateConfig {
    fn default() -> Self {
        Self {
            steps_per_residence_time: 100,
            relative_tolerance: 1e-8,
            settle_steps: 50,
            max_residence_times: 500.0,
            window_residence_times: 10.0,
        }
    }
}

impl SteadyStateConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_residence_time == 0 {
            return Err(ConfigError::Parameter {
                parameter: "steps per residence time",
                source: ConstraintError::Zero,
            });
        }
        StrictlyPositive::new(self.relative_tolerance)
            .map_err(ConfigError::parameter("steady-state relative tolerance"))?;
        StrictlyPositive::new(self.max_residence_times)
            .map_err(ConfigError::parameter("max residence times"))?;
        StrictlyPositive::new(self.window_residence_times)
            .map_err(ConfigError::parameter("window residence times"))?;
        Ok(())
    }
}

/// A reactor at steady state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyState {
    pub contents: Contents,
    pub state: State<Composition>,
    pub pressure: Pressure,
    /// Outlet mass flow rate.
    pub mass_rate: MassRate,
    pub heat_release_rate: VolumetricPower,
    /// Simulated time needed to settle.
    pub time: Time,
}

impl SteadyState {
    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.state.temperature
    }

    /// The outlet stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the outlet flow is `NaN`.
    pub fn outlet(&self) -> ConstraintResult<Stream<Composition>> {
        Stream::new(self.state, self.mass_rate)
    }
}

/// A fixed-volume, well-mixed reactor.
#[derive(Debug, Clone, PartialEq)]
pub struct WellMixedReactor<L> {
    volume: Constrained<Volume, StrictlyPositive>,
    inlets: Vec<Inlet<L>>,
    outlet: Outlet,
    chemistry: Chemistry,
}

impl<L: FlowLaw> WellMixedReactor<L> {
    /// Creates a reactor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the volume or the outlet coefficient is not
    /// strictly positive, or if there are no inlets.
    pub fn new(
        volume: Volume,
        inlets: Vec<Inlet<L>>,
        outlet: Outlet,
        chemistry: Chemistry,
    ) -> Result<Self, ConfigError> {
        let volume =
            StrictlyPositive::new(volume).map_err(ConfigError::parameter("reactor volume"))?;
        StrictlyPositive::new(outlet.coefficient())
            .map_err(ConfigError::parameter("outlet flow coefficient"))?;
        if inlets.is_empty() {
            return Err(ConfigError::NoInlets);
        }

        Ok(Self {
            volume,
            inlets,
            outlet,
            chemistry,
        })
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume.into_inner()
    }

    #[must_use]
    pub fn inlets(&self) -> &[Inlet<L>] {
        &self.inlets
    }

    #[must_use]
    pub fn outlet(&self) -> Outlet {
        self.outlet
    }

    #[must_use]
    pub fn chemistry(&self) -> Chemistry {
        self.chemistry
    }

    /// Integrates from `initial` until the contents stop changing.
    ///
    /// # Errors
    ///
    /// - [`ReactorError::Config`] for an invalid `config`, or if the initial
    ///   inflow is zero.
    /// - [`ReactorError::ThermoModelFailed`] if the thermo model fails.
    /// - [`ReactorError::NotConverged`] if the contents are still changing
    ///   after `max_residence_times`.
    pub fn solve_steady<T: ReactorThermoModel>(
        &self,
        thermo: &T,
        initial: Contents,
        config: &SteadyStateConfig,
    ) -> Result<SteadyState, ReactorError> {
        config.validate()?;

        let feeds = self
            .inlets
            .iter()
            .enumerate()
            .map(|(i, inlet)| {
                let enthalpy = thermo.enthalpy(&inlet.state).map_err(|err| {
                    ReactorError::thermo_failed(format!("enthalpy(inlet {i})"), err)
                })?;
                Ok(Feed {
                    fractions: inlet.state.fluid.mass_fractions(),
                    enthalpy,
                })
            })
            .collect::<Result<Vec<_>, ReactorError>>()?;

        let model = Evaluator {
            reactor: self,
            thermo,
            feeds,
        };

        let start = Charge {
            contents: initial,
            time: Time::new::<second>(0.0),
        };
        let first = model.call(&start)?;
        if first.inflow.get::<kilogram_per_second>() <= 0.0 {
            return Err(ConfigError::ZeroFlow.into());
        }

        let mass = initial.mass();
        let flow_time = mass / first.inflow;
        let response_time = mass / (self.outlet.coefficient() * first.pressure);
        let stable = 0.5 * response_time;
        #[allow(clippy::cast_precision_loss)]
        let by_flow = flow_time / config.steps_per_residence_time as f64;
        let dt = if stable < by_flow { stable } else { by_flow };

        // A sluggish outlet relaxes the pressure slower than the flow
        // replaces the contents.
        let settle_time = if response_time > flow_time {
            response_time
        } else {
            flow_time
        };
        let steps_per_flow_time = (flow_time / dt).get::<ratio>();
        let steps_per_settle_time = (settle_time / dt).get::<ratio>();
        let max_steps = whole_steps(config.max_residence_times * steps_per_settle_time);
        let window = whole_steps(config.window_residence_times * steps_per_flow_time).max(1);

        let problem = MassEnergyBalance { dt };
        let mut tracker = SettleTracker::new(steps_per_settle_time, config);
        let mut current = start;
        let mut taken = 0;

        while taken < max_steps {
            let steps = window.min(max_steps - taken);
            let mut solution = euler::solve(
                &model,
                &problem,
                current,
                dt,
                steps,
                |event: &euler::Event<Charge, Balance>| tracker.observe(event),
            )
            .map_err(integration_failed)?;
            taken += solution.steps;

            let Some(last) = solution.history.pop() else {
                break;
            };

            if solution.status == euler::Status::StoppedByObserver {
                let heat_release_rate = match self.chemistry {
                    Chemistry::Reacting => {
                        thermo.heat_release_rate(&last.output.state).map_err(|err| {
                            ReactorError::thermo_failed("heat_release_rate(steady)", err)
                        })?
                    }
                    Chemistry::Frozen => Power::new::<watt>(0.0) / self.volume(),
                };

                tracing::debug!(
                    steps = taken,
                    time_s = last.input.time.get::<second>(),
                    temperature_k = last.output.state.temperature.get::<kelvin>(),
                    "well-mixed reactor reached steady state"
                );

                return Ok(SteadyState {
                    contents: last.input.contents,
                    state: last.output.state,
                    pressure: last.output.pressure,
                    mass_rate: last.output.outflow,
                    heat_release_rate,
                    time: last.input.time,
                });
            }

            current = last.input;
        }

        Err(ReactorError::NotConverged {
            time: current.time,
            residence_times: (current.time / flow_time).get::<ratio>(),
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_steps(count: f64) -> usize {
    count.ceil() as usize
}

/// Unwraps reactor errors raised inside the integrator.
pub(super) fn integration_failed(err: euler::Error) -> ReactorError {
    match err {
        euler::Error::Model(source) => match source.downcast::<ReactorError>() {
            Ok(err) => *err,
            Err(source) => ReactorError::Integration(euler::Error::Model(source)),
        },
        other => ReactorError::Integration(other),
    }
}

/// Inlet properties fixed for the whole integration.
#[derive(Debug, Clone, Copy)]
struct Feed {
    fractions: [f64; Species::COUNT],
    enthalpy: SpecificEnthalpy,
}

/// Reactor contents at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Charge {
    contents: Contents,
    time: Time,
}

/// Flows and rates evaluated from a [`Charge`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Balance {
    state: State<Composition>,
    pressure: Pressure,
    enthalpy: SpecificEnthalpy,
    inflow: MassRate,
    species_inflow: [MassRate; Species::COUNT],
    energy_inflow: Power,
    outflow: MassRate,
    /// Net production over the whole volume.
    production: [MassRate; Species::COUNT],
}

struct Evaluator<'a, T, L> {
    reactor: &'a WellMixedReactor<L>,
    thermo: &'a T,
    feeds: Vec<Feed>,
}

impl<T: ReactorThermoModel, L: FlowLaw> Model for Evaluator<'_, T, L> {
    type Input = Charge;
    type Output = Balance;
    type Error = ReactorError;

    fn call(&self, input: &Charge) -> Result<Balance, ReactorError> {
        let contents = &input.contents;
        let mass = contents.mass();
        let volume = self.reactor.volume();

        let composition = contents
            .composition()
            .map_err(|err| ReactorError::thermo_failed("composition(contents)", err))?;
        let density = mass / volume;
        let u = contents.specific_internal_energy();

        let state = self
            .thermo
            .state_from((composition, density, u))
            .map_err(|err| {
                ReactorError::thermo_failed(
                    format!("contents_state_from(rho={density:?}, u={u:?})"),
                    err,
                )
            })?;
        let pressure = self
            .thermo
            .pressure(&state)
            .map_err(|err| ReactorError::thermo_failed("pressure(contents)", err))?;
        let enthalpy = self
            .thermo
            .enthalpy(&state)
            .map_err(|err| ReactorError::thermo_failed("enthalpy(contents)", err))?;

        let zero = MassRate::new::<kilogram_per_second>(0.0);
        let production = match self.reactor.chemistry {
            Chemistry::Reacting => self
                .thermo
                .production_rates(&state)
                .map_err(|err| ReactorError::thermo_failed("production_rates(contents)", err))?
                .map(|rate| rate * volume),
            Chemistry::Frozen => [zero; Species::COUNT],
        };

        let view = ReactorView {
            time: input.time,
            volume,
            mass,
            pressure,
            temperature: state.temperature,
        };

        let mut inflow = zero;
        let mut species_inflow = [zero; Species::COUNT];
        let mut energy_inflow = Power::new::<watt>(0.0);
        for (inlet, feed) in self.reactor.inlets.iter().zip(&self.feeds) {
            let rate = inlet.law.mass_rate(&view);
            inflow += rate;
            for (species, y) in species_inflow.iter_mut().zip(feed.fractions) {
                *species += rate * y;
            }
            energy_inflow += feed.enthalpy * rate;
        }

        Ok(Balance {
            state,
            pressure,
            enthalpy,
            inflow,
            species_inflow,
            energy_inflow,
            outflow: self.reactor.outlet.mass_rate(inflow, pressure),
            production,
        })
    }
}

/// Species and energy conservation for the reactor contents.
///
/// Reaction is scaled back when a forward Euler step would overdraw a
/// consumed species. For each consumed species the scale is
/// `(m + dt·net) / (m + dt·c)`, where `net` is the flow term and `c` the
/// consumption; the smallest scale, clamped to `[0, 1]`, applies to every
/// species. At steady state `net = c`, so the scale is exactly one.
struct MassEnergyBalance {
    dt: Time,
}

impl OdeProblem for MassEnergyBalance {
    type Input = Charge;
    type Output = Balance;
    type Delta = Time;
    type State = Contents;
    type Error = std::convert::Infallible;

    fn state(&self, input: &Charge) -> Result<Contents, Self::Error> {
        Ok(input.contents)
    }

    fn derivative(
        &self,
        input: &Charge,
        output: &Balance,
    ) -> Result<DerivativeOf<Contents, Time>, Self::Error> {
        let fractions = output.state.fluid.mass_fractions();
        let net: [MassRate; Species::COUNT] = std::array::from_fn(|k| {
            output.species_inflow[k] - output.outflow * fractions[k]
        });

        let mut scale: f64 = 1.0;
        for k in 0..Species::COUNT {
            let consumption = -output.production[k];
            if consumption.get::<kilogram_per_second>() > 0.0 {
                let mass = input.contents.species[k];
                let available = mass + net[k] * self.dt;
                let demand = mass + consumption * self.dt;
                scale = scale.min((available / demand).get::<ratio>().clamp(0.0, 1.0));
            }
        }

        Ok(ContentsRate {
            species: std::array::from_fn(|k| net[k] + output.production[k] * scale),
            internal_energy: output.energy_inflow - output.enthalpy * output.outflow,
        })
    }

    fn build_input(
        &self,
        base: &Charge,
        state: &Contents,
        delta: &Time,
    ) -> Result<Charge, Self::Error> {
        Ok(Charge {
            contents: *state,
            time: base.time + *delta,
        })
    }

    fn finalize_step(
        &self,
        next_input: Charge,
        _prev_input: &Charge,
        _prev_output: &Balance,
        _step_delta: &Time,
    ) -> Result<Charge, Self::Error> {
        Ok(Charge {
            contents: next_input.contents.clamped(),
            ..next_input
        })
    }
}

/// Counts consecutive steps with negligible change.
struct SettleTracker {
    steps_per_settle_time: f64,
    tolerance: f64,
    needed: usize,
    count: usize,
    previous: Option<(f64, f64)>,
}

impl SettleTracker {
    fn new(steps_per_settle_time: f64, config: &SteadyStateConfig) -> Self {
        Self {
            steps_per_settle_time,
            tolerance: config.relative_tolerance,
            needed: config.settle_steps,
            count: 0,
            previous: None,
        }
    }

    fn observe(&mut self, event: &euler::Event<Charge, Balance>) -> Option<euler::Action> {
        let temperature = event.snapshot.output.state.temperature.get::<kelvin>();
        let mass = event.snapshot.input.contents.mass().get::<kilogram>();

        let (last_temperature, last_mass) = self.previous.replace((temperature, mass))?;

        // Each solver call starts by re-reporting the state it was handed.
        if event.step == 0 {
            return None;
        }

        let per_settle_time = |now: f64, before: f64| {
            (now - before).abs() / now.abs() * self.steps_per_settle_time
        };
        let settled = per_settle_time(temperature, last_temperature) < self.tolerance
            && per_settle_time(mass, last_mass) < self.tolerance
            && balance_residuals(&event.snapshot.output)
                .into_iter()
                .all(|residual| residual < self.tolerance);

        self.count = if settled { self.count + 1 } else { 0 };
        (self.count >= self.needed).then_some(euler::Action::StopEarly)
    }
}

/// Relative mass and energy imbalance between the feeds and the outlet.
///
/// Mass is relative to the inflow. Energy is relative to the flow work
/// `ṁ_out·p/ρ`, which stays positive where the enthalpy itself may be near
/// zero. A stopped outlet never counts as balanced.
fn balance_residuals(balance: &Balance) -> [f64; 2] {
    let mass = (balance.inflow - balance.outflow) / balance.inflow;
    let flow_work = balance.outflow * (balance.pressure / balance.state.density);
    let energy = (balance.energy_inflow - balance.enthalpy * balance.outflow) / flow_work;
    [mass.get::<ratio>().abs(), energy.get::<ratio>().abs()]
}
