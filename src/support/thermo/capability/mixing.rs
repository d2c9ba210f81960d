use uom::si::f64::MassRate;

use crate::support::thermo::PropertyError;

use super::ThermoModel;

/// Capability for blending the fluid data of several streams.
///
/// Only the state-defining fluid value is blended here. Energy balances are
/// the caller's job.
pub trait MixFluids: ThermoModel {
    /// Returns the fluid produced by mixing `parts` in proportion to their
    /// mass flow rates.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the fluids cannot be mixed, for example
    /// when a pure-substance model is given two different substances or when
    /// the total mass flow is zero.
    fn mix_fluids(&self, parts: &[(&Self::Fluid, MassRate)]) -> Result<Self::Fluid, PropertyError>;
}
