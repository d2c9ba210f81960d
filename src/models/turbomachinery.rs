//! Compressor and turbine stages.
//!
//! Both machines follow the same isentropic-efficiency recipe:
//!
//! 1. find the ideal outlet at the inlet entropy and the outlet pressure
//!    `P_out = r·P_in`,
//! 2. take the ideal specific work `Δh_s = |h_out,s − h_in|`,
//! 3. scale it by the efficiency (`Δh_s/η` to compress, `Δh_s·η` to expand),
//! 4. find the actual outlet at `(P_out, h_out)`.
//!
//! Work and power are reported as non-negative magnitudes. A compressor
//! absorbs them and a turbine delivers them.
//!
//! Each stage has a configuration validated at construction, a free function
//! ([`compress`], [`expand`]) for use inside larger models, and a
//! [`twine_core::Model`] adapter ([`Compressor`], [`Turbine`]).

mod compressor;
mod core;
mod turbine;

pub use compressor::{Compressor, CompressorConfig, compress};
pub use self::core::{MachineResults, TurbomachineryThermoModel};
pub use turbine::{Turbine, TurbineConfig, expand};
