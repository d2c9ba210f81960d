use uom::si::{
    f64::{MassDensity, Pressure, SpecificHeatCapacity, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::units::{SpecificEnthalpy, SpecificEntropy};

use super::{
    PropertyError, State,
    capability::{HasCp, HasEnthalpy, HasEntropy, HasPressure},
};

/// A state together with its commonly reported properties.
///
/// Built once with [`StateProperties::evaluate`] and read many times, so
/// reports and logs do not call back into the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateProperties<Fluid> {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub enthalpy: SpecificEnthalpy,
    pub entropy: SpecificEntropy,
    pub cp: SpecificHeatCapacity,
    pub density: MassDensity,
    pub fluid: Fluid,
}

impl<Fluid: Clone> StateProperties<Fluid> {
    /// Evaluates the properties of `state` with `thermo`.
    ///
    /// # Errors
    ///
    /// Propagates any [`PropertyError`] from the model, and returns
    /// [`PropertyError::InvalidState`] if the temperature or the pressure is
    /// not strictly positive.
    pub fn evaluate<T>(thermo: &T, state: &State<Fluid>) -> Result<Self, PropertyError>
    where
        T: HasPressure<Fluid = Fluid> + HasEnthalpy + HasEntropy + HasCp,
    {
        let t = state.temperature.get::<kelvin>();
        if !t.is_finite() || t <= 0.0 {
            return Err(PropertyError::InvalidState {
                context: format!("temperature must be positive, got {t} K"),
            });
        }

        let pressure = thermo.pressure(state)?;
        let p = pressure.get::<pascal>();
        if !p.is_finite() || p <= 0.0 {
            return Err(PropertyError::InvalidState {
                context: format!("pressure must be positive, got {p} Pa"),
            });
        }

        Ok(Self {
            temperature: state.temperature,
            pressure,
            enthalpy: thermo.enthalpy(state)?,
            entropy: thermo.entropy(state)?,
            cp: thermo.cp(state)?,
            density: state.density,
            fluid: state.fluid.clone(),
        })
    }

    /// The independent state these properties were evaluated at.
    #[must_use]
    pub fn state(&self) -> State<Fluid> {
        State::new(self.temperature, self.density, self.fluid.clone())
    }
}
