use crate::support::thermo::State;

use super::ThermoModel;

/// Capability for constructing a [`State`] from a typed pair of properties.
///
/// The fluid value travels with the input because it can carry
/// state-defining data. For the ideal-gas mixture it is the species
/// [`Composition`](crate::support::thermo::fluid::Composition), so fixing a
/// state means naming the composition plus two independent properties.
///
/// Supported inputs are a compile-time fact: a model that cannot build a state
/// from some pair simply does not implement `StateFrom` for it.
///
/// ## Inputs used by the stages in this crate
///
/// - `(Fluid, ThermodynamicTemperature, Pressure)`: inlet and reservoir states
/// - `(Fluid, ThermodynamicTemperature, MassDensity)`
/// - `(Fluid, Pressure, SpecificEnthalpy)`: mixer and machine outlets
/// - `(Fluid, Pressure, SpecificEntropy)`: isentropic reference states
/// - `(Fluid, MassDensity, SpecificInternalEnergy)`: well-mixed reactor contents
///
/// ## Marker fluids
///
/// When `Fluid` is a marker type that implements `Default`, the fluid can be
/// left out: a model implementing `StateFrom<(Fluid, A, B)>` also implements
/// `StateFrom<(A, B)>`, so `thermo.state_from((t, p))` works for
/// [`PerfectGas<Air>`](crate::support::thermo::model::PerfectGas).
pub trait StateFrom<Input>: ThermoModel {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates a thermodynamic state from the provided input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if no state matches `input`.
    fn state_from(&self, input: Input) -> Result<State<Self::Fluid>, Self::Error>;
}

/// Fills in `Fluid::default()` for two-property inputs.
impl<M, A, B> StateFrom<(A, B)> for M
where
    M: ThermoModel + StateFrom<(<M as ThermoModel>::Fluid, A, B)>,
    <M as ThermoModel>::Fluid: Default,
{
    type Error = <M as StateFrom<(<M as ThermoModel>::Fluid, A, B)>>::Error;

    fn state_from(&self, (a, b): (A, B)) -> Result<State<Self::Fluid>, Self::Error> {
        self.state_from((<M as ThermoModel>::Fluid::default(), a, b))
    }
}
