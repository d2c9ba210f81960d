/// The root of every thermodynamic capability.
///
/// A model names the `Fluid` type carried by its states. For a pure substance
/// this is usually a unit marker like [`Air`](crate::support::thermo::fluid::Air);
/// for a mixture it is the [`Composition`](crate::support::thermo::fluid::Composition).
pub trait ThermoModel {
    type Fluid;
}
