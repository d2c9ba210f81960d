//! Well-mixed and plug-flow reactors for reacting gas mixtures.
//!
//! A [`WellMixedReactor`] tracks its extensive [`Contents`] (species masses
//! and internal energy) in a fixed volume. Inlets draw mass according to a
//! [`FlowLaw`], the [`Outlet`] releases it according to the reactor pressure,
//! and the contents are integrated in time with forward Euler until they stop
//! changing. Chemistry enters only through species production: the enthalpy of
//! a [`Composition`](crate::support::thermo::fluid::Composition) includes its
//! formation enthalpy, so heat release needs no separate source term.
//!
//! Built on the well-mixed core:
//!
//! - [`StirredReactor`]: a perfectly stirred reactor fed at `m / τ`, vented
//!   through a pressure controller to the inlet pressure.
//! - [`MixingVessel`]: constant-flow inlets vented through a valve.
//! - [`reactor_chain`]: a duct approximated by well-mixed reactors in series.
//!
//! [`lagrangian_plug_flow`] integrates a single constant-pressure parcel along
//! a duct instead.

mod contents;
mod core;
mod error;
mod flow_law;
mod mixing_vessel;
mod plug_flow;
mod stirred;

pub use contents::{Contents, ContentsRate};
pub use self::core::{
    Chemistry, Inlet, ReactorThermoModel, SteadyState, SteadyStateConfig, WellMixedReactor,
};
pub use error::ReactorError;
pub use flow_law::{ConstantFlow, FlowLaw, Outlet, ReactorView, ResidenceTimeFlow};
pub use mixing_vessel::{MixingVessel, MixingVesselConfig};
pub use plug_flow::{
    ChainConfig, PlugFlowConfig, PlugFlowProfile, PlugFlowSample, PlugFlowThermoModel,
    ProfileSeries, lagrangian_plug_flow, reactor_chain,
};
pub use stirred::{StirredReactor, StirredReactorConfig, StirredReactorInput};

pub(crate) use stirred::solve_stirred;
