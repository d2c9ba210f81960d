use twine_core::Model;
use uom::si::f64::{MassRate, Pressure, ThermodynamicTemperature};

use crate::{
    models::{ConfigError, StageError},
    support::{
        stream::Stream,
        thermo::{
            capability::{Equilibrate, EquilibriumConstraint, StateFrom, ThermoModel},
            fluid::Composition,
        },
    },
};

/// Burns `inlet` to adiabatic equilibrium at its own pressure.
///
/// Mass flow and enthalpy carry through unchanged.
///
/// # Errors
///
/// Returns [`StageError::ThermoModelFailed`] if the equilibrium fails.
pub fn burn<T: Equilibrate>(
    inlet: &Stream<T::Fluid>,
    thermo: &T,
) -> Result<Stream<T::Fluid>, StageError> {
    let flame = thermo
        .equilibrate(&inlet.state, EquilibriumConstraint::EnthalpyPressure)
        .map_err(|err| StageError::thermo_failed("equilibrate(HP, inlet)", err))?;
    Ok(inlet.with_state(flame))
}

/// Fuel and oxidizer premixed at equivalence ratio `phi`.
///
/// # Errors
///
/// - [`ConfigError::Composition`] if the pair cannot be mixed at `phi`.
/// - [`ConfigError::Parameter`] if `mass_rate` is negative.
/// - [`StageError::ThermoModelFailed`] if the state cannot be built.
pub fn premixed_inlet<T>(
    fuel: &Composition,
    oxidizer: &Composition,
    phi: f64,
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    mass_rate: MassRate,
    thermo: &T,
) -> Result<Stream<Composition>, StageError>
where
    T: ThermoModel<Fluid = Composition>
        + StateFrom<(Composition, ThermodynamicTemperature, Pressure)>,
{
    let composition =
        Composition::at_equivalence_ratio(phi, fuel, oxidizer).map_err(ConfigError::from)?;
    let state = thermo
        .state_from((composition, temperature, pressure))
        .map_err(|err| {
            StageError::thermo_failed(
                format!("inlet_state_from(T={temperature:?}, p={pressure:?})"),
                err,
            )
        })?;
    Ok(Stream::new(state, mass_rate).map_err(ConfigError::parameter("inlet mass flow"))?)
}

/// Equilibrium combustor as a [`Model`] from premixed inlet to flame stream.
#[derive(Debug, Clone)]
pub struct EquilibriumCombustor<T> {
    pub thermo: T,
}

impl<T> EquilibriumCombustor<T> {
    #[must_use]
    pub fn new(thermo: T) -> Self {
        Self { thermo }
    }
}

impl<T: Equilibrate> Model for EquilibriumCombustor<T> {
    type Input = Stream<T::Fluid>;
    type Output = Stream<T::Fluid>;
    type Error = StageError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        burn(input, &self.thermo)
    }
}
