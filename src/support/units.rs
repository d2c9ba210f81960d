//! Quantities [`uom`] does not provide.
//!
//! Thermodynamic models work in specific (per-kilogram) quantities and need
//! temperature differences that stay intervals:
//!
//! ```
//! use twine_microturbine::support::units::TemperatureDifference;
//! use uom::si::{
//!     f64::ThermodynamicTemperature, temperature_interval, thermodynamic_temperature::kelvin,
//! };
//!
//! let flame = ThermodynamicTemperature::new::<kelvin>(2100.0);
//! let inlet = ThermodynamicTemperature::new::<kelvin>(700.0);
//! assert_eq!(flame.minus(inlet).get::<temperature_interval::kelvin>(), 1400.0);
//! ```
//!
//! ## Flow and reaction quantities
//!
//! Reactor models need a few derived quantities that [`uom`] does not name,
//! such as the [`FlowCoefficient`] of a valve or pressure controller
//! (kg/s per Pa), the [`MassProductionRate`] of a species (kg/m³·s), and
//! the [`VolumetricPower`] released by reaction (W/m³).

mod quantities;
mod temperature_difference;

pub use quantities::{
    FlowCoefficient, MassProductionRate, SpecificEnthalpy, SpecificEntropy, SpecificGasConstant,
    SpecificInternalEnergy, VolumetricPower,
};
pub use temperature_difference::TemperatureDifference;
