//! Steady stream junctions.
//!
//! The [`Mixer`] joins streams that already share a pressure. Dynamic mixing
//! through a vessel with a pressure-driven outlet lives with the well-mixed
//! reactors in [`crate::models::reactor`].

mod mixer;

pub use mixer::{Mixer, MixerConfig, MixerThermoModel, mix};
