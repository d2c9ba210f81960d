//! Flowing fluid passed between stages.

use uom::si::f64::MassRate;

use crate::support::{
    constraint::{Constrained, ConstraintResult, NonNegative},
    thermo::State,
};

/// A fluid state moving at a mass flow rate.
///
/// Every stage takes one or more streams in and hands a stream out. The mass
/// flow rate is never negative; a stream with zero flow is allowed.
///
/// # Example
///
/// ```
/// use twine_microturbine::support::{
///     stream::Stream,
///     thermo::{State, fluid::Air},
/// };
/// use uom::si::{
///     f64::{MassDensity, MassRate, ThermodynamicTemperature},
///     mass_density::kilogram_per_cubic_meter,
///     mass_rate::kilogram_per_second,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let state = State::new(
///     ThermodynamicTemperature::new::<kelvin>(293.0),
///     MassDensity::new::<kilogram_per_cubic_meter>(1.19),
///     Air,
/// );
///
/// let intake = Stream::new(state, MassRate::new::<kilogram_per_second>(0.020)).unwrap();
/// assert_eq!(intake.mass_rate().get::<kilogram_per_second>(), 0.020);
///
/// assert!(Stream::new(state, MassRate::new::<kilogram_per_second>(-1.0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stream<Fluid> {
    pub state: State<Fluid>,
    mass_rate: Constrained<MassRate, NonNegative>,
}

impl<Fluid> Stream<Fluid> {
    /// Creates a stream.
    ///
    /// # Errors
    ///
    /// Returns an error if `mass_rate` is negative or `NaN`.
    pub fn new(state: State<Fluid>, mass_rate: MassRate) -> ConstraintResult<Self> {
        Ok(Self {
            state,
            mass_rate: NonNegative::new(mass_rate)?,
        })
    }

    /// Creates a stream from an already-checked mass flow rate.
    #[must_use]
    pub fn from_constrained(
        state: State<Fluid>,
        mass_rate: Constrained<MassRate, NonNegative>,
    ) -> Self {
        Self { state, mass_rate }
    }

    #[must_use]
    pub fn mass_rate(&self) -> MassRate {
        self.mass_rate.into_inner()
    }

    /// Returns a stream with the same flow rate and a new state.
    #[must_use]
    pub fn with_state<Other>(&self, state: State<Other>) -> Stream<Other> {
        Stream {
            state,
            mass_rate: self.mass_rate,
        }
    }
}
