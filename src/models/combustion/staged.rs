//! Primary zone plus dilution sections.

use twine_core::Model;
use uom::si::f64::{Pressure, Time};

use crate::{
    models::{
        ConfigError,
        flow::{MixerConfig, mix},
        reactor::{
            PlugFlowConfig, PlugFlowProfile, ReactorError, ReactorThermoModel,
            StirredReactorConfig, StirredReactorInput, lagrangian_plug_flow, solve_stirred,
        },
    },
    support::{
        constraint::{ConstraintError, NonNegative},
        stream::Stream,
        thermo::{capability::MixFluids, fluid::Composition},
    },
};

use super::burn;

/// Required thermo model bounds for the staged combustor.
#[doc(hidden)]
pub trait StagedThermoModel: ReactorThermoModel + MixFluids {}

impl<T> StagedThermoModel for T where T: ReactorThermoModel + MixFluids {}

/// How the primary zone burns its premixed feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimaryZone {
    /// Adiabatic equilibrium at constant pressure.
    Equilibrium,
    /// A stirred reactor held at `residence_time`.
    StirredReactor {
        residence_time: Time,
        config: StirredReactorConfig,
    },
}

/// Staged combustor layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagedCombustorConfig {
    pub primary: PrimaryZone,
    sections: usize,
    pub section: PlugFlowConfig,
    pub mixer: MixerConfig,
}

impl StagedCombustorConfig {
    /// Creates a layout with `sections` identical dilution ducts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parameter`] if `sections` is zero.
    pub fn new(
        primary: PrimaryZone,
        sections: usize,
        section: PlugFlowConfig,
        mixer: MixerConfig,
    ) -> Result<Self, ConfigError> {
        if sections == 0 {
            return Err(ConfigError::Parameter {
                parameter: "dilution sections",
                source: ConstraintError::Zero,
            });
        }
        Ok(Self {
            primary,
            sections,
            section,
            mixer,
        })
    }

    #[must_use]
    pub fn sections(&self) -> usize {
        self.sections
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagedCombustorInput {
    /// Premixed fuel and air entering the primary zone.
    pub primary: Stream<Composition>,
    /// Air injected across the dilution sections.
    pub dilution: Stream<Composition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedCombustorResults {
    /// Primary-zone products at the dilution pressure.
    pub primary: Stream<Composition>,
    /// One profile per dilution section, upstream first.
    pub sections: Vec<PlugFlowProfile>,
    pub outlet: Stream<Composition>,
}

/// Staged combustor as a [`Model`].
///
/// The primary-zone products are throttled to the dilution pressure, which
/// must not exceed the primary feed pressure. The dilution air is split
/// evenly across the sections; each section mixes in its share and then
/// reacts along its duct at constant pressure.
#[derive(Debug, Clone)]
pub struct StagedCombustor<T> {
    pub config: StagedCombustorConfig,
    pub thermo: T,
}

impl<T: StagedThermoModel> StagedCombustor<T> {
    #[must_use]
    pub fn new(config: StagedCombustorConfig, thermo: T) -> Self {
        Self { config, thermo }
    }

    fn primary_zone(
        &self,
        primary: &Stream<Composition>,
        dilution_pressure: Pressure,
    ) -> Result<Stream<Composition>, ReactorError> {
        // Both zones hold the feed pressure; a stirred reactor only to within
        // its steady-state tolerance.
        let pressure = self
            .thermo
            .pressure(&primary.state)
            .map_err(|err| ReactorError::thermo_failed("pressure(primary)", err))?;
        let tolerance = self.config.mixer.pressure_tolerance;
        if ((dilution_pressure - pressure) / pressure).value > tolerance {
            return Err(ConfigError::PressureMismatch {
                expected: pressure,
                found: dilution_pressure,
            }
            .into());
        }

        let products = match self.config.primary {
            PrimaryZone::Equilibrium => burn(primary, &self.thermo)?,
            PrimaryZone::StirredReactor {
                residence_time,
                config,
            } => {
                let steady = solve_stirred(
                    &config,
                    &self.thermo,
                    &StirredReactorInput {
                        inlet: primary.state,
                        residence_time,
                        initial: None,
                    },
                )?;
                primary.with_state(steady.state)
            }
        };

        let enthalpy = self
            .thermo
            .enthalpy(&products.state)
            .map_err(|err| ReactorError::thermo_failed("enthalpy(primary)", err))?;
        let throttled = self
            .thermo
            .state_from((products.state.fluid, dilution_pressure, enthalpy))
            .map_err(|err| ReactorError::thermo_failed("throttle_state_from(primary)", err))?;

        Ok(products.with_state(throttled))
    }
}

impl<T: StagedThermoModel> Model for StagedCombustor<T> {
    type Input = StagedCombustorInput;
    type Output = StagedCombustorResults;
    type Error = ReactorError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let dilution_pressure = self
            .thermo
            .pressure(&input.dilution.state)
            .map_err(|err| ReactorError::thermo_failed("pressure(dilution)", err))?;
        let primary = self.primary_zone(&input.primary, dilution_pressure)?;

        #[allow(clippy::cast_precision_loss)]
        let share = NonNegative::new(input.dilution.mass_rate() / self.config.sections as f64)
            .map_err(ConfigError::parameter("dilution mass flow"))?;
        let injection = Stream::from_constrained(input.dilution.state, share);

        let mut sections = Vec::with_capacity(self.config.sections);
        let mut upstream = primary;
        for _ in 0..self.config.sections {
            let mixed = mix(&[upstream, injection], &self.config.mixer, &self.thermo)?;
            let profile = lagrangian_plug_flow(&mixed, &self.config.section, &self.thermo)?;
            upstream = profile.outlet;
            sections.push(profile);
        }

        Ok(StagedCombustorResults {
            primary,
            sections,
            outlet: upstream,
        })
    }
}
