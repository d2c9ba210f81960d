//! Calorically perfect gas.
//!
//! `p = ρ·R·T` with constant `cp` and `cv = cp − R`. Every property and every
//! state inversion is closed-form, so stage tests run against it without any
//! iteration. The gas does not react: it is its own equilibrium state, and it
//! only mixes with itself.
//!
//! Enthalpy and entropy are zero at 298.15 K and one standard atmosphere, the
//! same reference point as the NASA data behind
//! [`IdealGasMixture`](super::IdealGasMixture).

use std::{convert::Infallible, marker::PhantomData};

use thiserror::Error;
use uom::si::{
    f64::{MassDensity, MassRate, Pressure, SpecificHeatCapacity, ThermodynamicTemperature},
    pressure::pascal,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{ConstraintError, StrictlyPositive},
    thermo::{
        PropertyError, State,
        capability::{
            Equilibrate, EquilibriumConstraint, HasCp, HasCv, HasEnthalpy, HasEntropy,
            HasInternalEnergy, HasPressure, MixFluids, StateFrom, ThermoModel,
        },
    },
    units::{
        SpecificEnthalpy, SpecificEntropy, SpecificGasConstant, SpecificInternalEnergy,
        TemperatureDifference,
    },
};

const REFERENCE_TEMPERATURE: f64 = 298.15;
const REFERENCE_PRESSURE: f64 = 101_325.0;

/// A fluid's constants were rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerfectGasError {
    #[error("invalid {parameter}: {source}")]
    Parameter {
        parameter: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error("cv = cp − R must be positive, got cp = {cp:?} and R = {gas_constant:?}")]
    NonPhysicalCv {
        gas_constant: SpecificGasConstant,
        cp: SpecificHeatCapacity,
    },
}

/// Gas constant and heat capacity of a [`PerfectGasFluid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGasParameters {
    pub gas_constant: SpecificGasConstant,
    pub cp: SpecificHeatCapacity,
}

impl PerfectGasParameters {
    #[must_use]
    pub fn new(gas_constant: SpecificGasConstant, cp: SpecificHeatCapacity) -> Self {
        Self { gas_constant, cp }
    }
}

/// A marker fluid with constant properties.
pub trait PerfectGasFluid {
    fn parameters() -> PerfectGasParameters;
}

/// Ideal gas with constant heat capacities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGas<Fluid> {
    r: SpecificGasConstant,
    cp: SpecificHeatCapacity,
    cv: SpecificHeatCapacity,
    _marker: PhantomData<Fluid>,
}

impl<Fluid> ThermoModel for PerfectGas<Fluid> {
    type Fluid = Fluid;
}

impl<Fluid: PerfectGasFluid> PerfectGas<Fluid> {
    /// Creates the model from the constants of `Fluid`.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectGasError`] if `R` or `cp` is not strictly positive, or
    /// if `cp ≤ R`.
    pub fn new() -> Result<Self, PerfectGasError> {
        let PerfectGasParameters { gas_constant, cp } = Fluid::parameters();

        StrictlyPositive::new(gas_constant.value).map_err(|source| PerfectGasError::Parameter {
            parameter: "gas constant",
            source,
        })?;
        StrictlyPositive::new(cp.value).map_err(|source| PerfectGasError::Parameter {
            parameter: "cp",
            source,
        })?;

        let cv = cp - gas_constant;
        if cv.value <= 0.0 {
            return Err(PerfectGasError::NonPhysicalCv { gas_constant, cp });
        }

        Ok(Self {
            r: gas_constant,
            cp,
            cv,
            _marker: PhantomData,
        })
    }

    /// The state at 298.15 K and one standard atmosphere.
    #[must_use]
    pub fn reference_state(&self, fluid: Fluid) -> State<Fluid> {
        let temperature = ThermodynamicTemperature::new::<kelvin>(REFERENCE_TEMPERATURE);
        State::new(
            temperature,
            self.density(temperature, Pressure::new::<pascal>(REFERENCE_PRESSURE)),
            fluid,
        )
    }
}

impl<Fluid> PerfectGas<Fluid> {
    fn density(&self, temperature: ThermodynamicTemperature, pressure: Pressure) -> MassDensity {
        pressure / (self.r * temperature)
    }

    fn reference_temperature() -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(REFERENCE_TEMPERATURE)
    }

    /// `T = T₀ + h / cp`.
    fn temperature_from_enthalpy(&self, enthalpy: SpecificEnthalpy) -> ThermodynamicTemperature {
        Self::reference_temperature() + enthalpy / self.cp
    }
}

impl<Fluid> HasPressure for PerfectGas<Fluid> {
    fn pressure(&self, state: &State<Fluid>) -> Result<Pressure, PropertyError> {
        Ok(state.density * self.r * state.temperature)
    }
}

impl<Fluid> HasEnthalpy for PerfectGas<Fluid> {
    /// `h = cp·(T − T₀)`.
    fn enthalpy(&self, state: &State<Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        Ok(self.cp * state.temperature.minus(Self::reference_temperature()))
    }
}

impl<Fluid> HasInternalEnergy for PerfectGas<Fluid> {
    /// `u = h − R·T`.
    fn internal_energy(
        &self,
        state: &State<Fluid>,
    ) -> Result<SpecificInternalEnergy, PropertyError> {
        Ok(self.enthalpy(state)? - self.r * state.temperature)
    }
}

impl<Fluid> HasEntropy for PerfectGas<Fluid> {
    /// `s = cp·ln(T/T₀) − R·ln(p/p₀)`.
    fn entropy(&self, state: &State<Fluid>) -> Result<SpecificEntropy, PropertyError> {
        let t_ratio = state.temperature.get::<kelvin>() / REFERENCE_TEMPERATURE;
        let p_ratio = self.pressure(state)?.get::<pascal>() / REFERENCE_PRESSURE;
        Ok(self.cp * t_ratio.ln() - self.r * p_ratio.ln())
    }
}

impl<Fluid> HasCp for PerfectGas<Fluid> {
    fn cp(&self, _state: &State<Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(self.cp)
    }
}

impl<Fluid> HasCv for PerfectGas<Fluid> {
    fn cv(&self, _state: &State<Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(self.cv)
    }
}

impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, MassDensity)> for PerfectGas<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, temperature, density): (Fluid, ThermodynamicTemperature, MassDensity),
    ) -> Result<State<Fluid>, Self::Error> {
        Ok(State::new(temperature, density, fluid))
    }
}

impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, Pressure)> for PerfectGas<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (Fluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Fluid>, Self::Error> {
        Ok(State::new(
            temperature,
            self.density(temperature, pressure),
            fluid,
        ))
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEnthalpy)> for PerfectGas<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, pressure, enthalpy): (Fluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<Fluid>, Self::Error> {
        let temperature = self.temperature_from_enthalpy(enthalpy);
        Ok(State::new(
            temperature,
            self.density(temperature, pressure),
            fluid,
        ))
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEntropy)> for PerfectGas<Fluid> {
    type Error = Infallible;

    /// `T = T₀·exp((s + R·ln(p/p₀)) / cp)`.
    fn state_from(
        &self,
        (fluid, pressure, entropy): (Fluid, Pressure, SpecificEntropy),
    ) -> Result<State<Fluid>, Self::Error> {
        let p_ratio = pressure.get::<pascal>() / REFERENCE_PRESSURE;
        let exponent = (entropy + self.r * p_ratio.ln()) / self.cp;
        let temperature = ThermodynamicTemperature::new::<kelvin>(
            REFERENCE_TEMPERATURE * exponent.get::<ratio>().exp(),
        );
        Ok(State::new(
            temperature,
            self.density(temperature, pressure),
            fluid,
        ))
    }
}

impl<Fluid> StateFrom<(Fluid, MassDensity, SpecificInternalEnergy)> for PerfectGas<Fluid> {
    type Error = Infallible;

    /// `T = (u + cp·T₀) / cv`.
    fn state_from(
        &self,
        (fluid, density, internal_energy): (Fluid, MassDensity, SpecificInternalEnergy),
    ) -> Result<State<Fluid>, Self::Error> {
        let offset = self.cp * Self::reference_temperature();
        let kelvins = ((internal_energy + offset) / self.cv).value;
        Ok(State::new(
            ThermodynamicTemperature::new::<kelvin>(kelvins),
            density,
            fluid,
        ))
    }
}

impl<Fluid: Clone> Equilibrate for PerfectGas<Fluid> {
    /// A perfect gas does not react, so the state is already at equilibrium.
    fn equilibrate(
        &self,
        state: &State<Fluid>,
        _constraint: EquilibriumConstraint,
    ) -> Result<State<Fluid>, PropertyError> {
        Ok(state.clone())
    }
}

impl<Fluid: Clone + PartialEq> MixFluids for PerfectGas<Fluid> {
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidState`] if there are no parts or if the
    /// parts are not all the same fluid.
    fn mix_fluids(&self, parts: &[(&Fluid, MassRate)]) -> Result<Fluid, PropertyError> {
        let Some(((first, _), rest)) = parts.split_first() else {
            return Err(PropertyError::InvalidState {
                context: "no fluids to mix".to_string(),
            });
        };

        if rest.iter().any(|(fluid, _)| *fluid != *first) {
            return Err(PropertyError::InvalidState {
                context: "a perfect gas can only mix with itself".to_string(),
            });
        }

        Ok((*first).clone())
    }
}
