use uom::si::f64::{MassDensity, ThermodynamicTemperature};

/// The thermodynamic state of a fluid.
///
/// Temperature and density are the independent variables; everything else
/// (pressure, enthalpy, entropy, heat capacities) is derived by a model through
/// the capability traits in [`capability`](super::capability).
///
/// The `Fluid` parameter is either a marker such as
/// [`Air`](super::fluid::Air) or a value carrying state-defining data, such as
/// the species [`Composition`](super::fluid::Composition) of a combustion gas.
///
/// # Example
///
/// ```
/// use twine_microturbine::support::thermo::{State, fluid::Air};
/// use uom::si::{
///     f64::{MassDensity, ThermodynamicTemperature},
///     mass_density::kilogram_per_cubic_meter,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let intake = State::new(
///     ThermodynamicTemperature::new::<kelvin>(293.0),
///     MassDensity::new::<kilogram_per_cubic_meter>(1.19),
///     Air,
/// );
/// let hotter = intake.with_temperature(ThermodynamicTemperature::new::<kelvin>(400.0));
/// assert_eq!(hotter.density, intake.density);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<Fluid> {
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
    pub fluid: Fluid,
}

impl<Fluid> State<Fluid> {
    #[must_use]
    pub fn new(temperature: ThermodynamicTemperature, density: MassDensity, fluid: Fluid) -> Self {
        Self {
            temperature,
            density,
            fluid,
        }
    }

    /// Returns this state with a different temperature.
    #[must_use]
    pub fn with_temperature(self, temperature: ThermodynamicTemperature) -> Self {
        Self {
            temperature,
            ..self
        }
    }

    /// Returns this state with a different density.
    #[must_use]
    pub fn with_density(self, density: MassDensity) -> Self {
        Self { density, ..self }
    }

    /// Returns this state with a different fluid.
    #[must_use]
    pub fn with_fluid(self, fluid: Fluid) -> Self {
        Self { fluid, ..self }
    }
}
