use crate::support::thermo::{PropertyError, State};

use super::ThermoModel;

/// The pair of properties held fixed while a mixture relaxes to equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquilibriumConstraint {
    /// Constant enthalpy and pressure (adiabatic, isobaric burning).
    EnthalpyPressure,
    /// Constant temperature and pressure.
    TemperaturePressure,
    /// Constant internal energy and volume (closed, rigid vessel).
    InternalEnergyVolume,
}

/// Capability for driving a state to chemical equilibrium.
pub trait Equilibrate: ThermoModel {
    /// Returns the equilibrium state reached from `state` while holding
    /// `constraint` fixed.
    ///
    /// The mass and elemental makeup of the fluid are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NotConverged`] if the equilibrium solve fails,
    /// or another [`PropertyError`] if a property cannot be evaluated.
    fn equilibrate(
        &self,
        state: &State<Self::Fluid>,
        constraint: EquilibriumConstraint,
    ) -> Result<State<Self::Fluid>, PropertyError>;
}
