use crate::support::{
    thermo::{
        PropertyError, State,
        fluid::{Composition, Species},
    },
    units::{MassProductionRate, VolumetricPower},
};

use super::ThermoModel;

/// Capability for finite-rate chemistry on a species mixture.
pub trait HasReactionRates: ThermoModel<Fluid = Composition> {
    /// Returns the net volumetric mass production rate of every species,
    /// indexed by [`Species::index`].
    ///
    /// Rates sum to zero: reactions move mass between species, never create it.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the rates cannot be evaluated.
    fn production_rates(
        &self,
        state: &State<Composition>,
    ) -> Result<[MassProductionRate; Species::COUNT], PropertyError>;

    /// Returns the heat released per unit volume by the reactions,
    /// `−Σ ω_k·h_k`.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the rates or species enthalpies cannot
    /// be evaluated.
    fn heat_release_rate(&self, state: &State<Composition>)
    -> Result<VolumetricPower, PropertyError>;
}
