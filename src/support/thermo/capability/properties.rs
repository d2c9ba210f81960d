//! Single-property queries.
//!
//! Each trait evaluates one intensive property at a [`State`]. All of them
//! fail with [`PropertyError`] when the model cannot evaluate the state, for
//! example outside the temperature range of its data.

use uom::si::f64::{Pressure, SpecificHeatCapacity};

use crate::support::{
    thermo::{PropertyError, State},
    units::{SpecificEnthalpy, SpecificEntropy, SpecificInternalEnergy},
};

use super::ThermoModel;

/// Equation of state: `p(T, ρ, fluid)`.
pub trait HasPressure: ThermoModel {
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the state is outside the model.
    fn pressure(&self, state: &State<Self::Fluid>) -> Result<Pressure, PropertyError>;
}

/// Specific enthalpy on the model's absolute scale.
///
/// Reacting models include heats of formation, so enthalpy is conserved
/// across combustion.
pub trait HasEnthalpy: ThermoModel {
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the state is outside the model.
    fn enthalpy(&self, state: &State<Self::Fluid>) -> Result<SpecificEnthalpy, PropertyError>;
}

pub trait HasInternalEnergy: ThermoModel {
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the state is outside the model.
    fn internal_energy(
        &self,
        state: &State<Self::Fluid>,
    ) -> Result<SpecificInternalEnergy, PropertyError>;
}

pub trait HasEntropy: ThermoModel {
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the state is outside the model.
    fn entropy(&self, state: &State<Self::Fluid>) -> Result<SpecificEntropy, PropertyError>;
}

/// Isobaric heat capacity.
pub trait HasCp: ThermoModel {
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the state is outside the model.
    fn cp(&self, state: &State<Self::Fluid>) -> Result<SpecificHeatCapacity, PropertyError>;
}

/// Isochoric heat capacity.
pub trait HasCv: ThermoModel {
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the state is outside the model.
    fn cv(&self, state: &State<Self::Fluid>) -> Result<SpecificHeatCapacity, PropertyError>;
}
