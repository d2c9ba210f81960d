//! Thermodynamic property models.

pub mod ideal_gas_mixture;
pub mod perfect_gas;

pub use ideal_gas_mixture::{GlobalRate, IdealGasMixture, TemperatureSearch};
pub use perfect_gas::PerfectGas;
