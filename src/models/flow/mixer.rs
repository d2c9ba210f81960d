use uom::si::{
    f64::{MassRate, Power, Pressure},
    mass_rate::kilogram_per_second,
    power::watt,
};

use twine_core::Model;

use crate::{
    models::{ConfigError, StageError},
    support::{
        constraint::{Constrained, NonNegative},
        stream::Stream,
        thermo::capability::{HasEnthalpy, HasPressure, MixFluids, StateFrom, ThermoModel},
        units::SpecificEnthalpy,
    },
};

/// Required thermo model bounds for the mixer.
#[doc(hidden)]
pub trait MixerThermoModel<Fluid>:
    ThermoModel<Fluid = Fluid>
    + HasPressure
    + HasEnthalpy
    + MixFluids
    + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}

impl<Fluid, T> MixerThermoModel<Fluid> for T where
    T: ThermoModel<Fluid = Fluid>
        + HasPressure
        + HasEnthalpy
        + MixFluids
        + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}

/// Mixer parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerConfig {
    /// Largest relative pressure difference accepted between inlets.
    pub pressure_tolerance: f64,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            pressure_tolerance: 1e-9,
        }
    }
}

/// Adiabatically mixes streams at a common pressure.
///
/// The outlet carries the summed mass flow, the mass-weighted enthalpy, and
/// the fluid blended by [`MixFluids`]. Its temperature and density come from
/// the thermo model at the shared pressure and mixed enthalpy.
///
/// # Errors
///
/// - [`ConfigError::NoInlets`] if `inlets` is empty.
/// - [`ConfigError::PressureMismatch`] if an inlet pressure differs from the
///   first by more than the configured relative tolerance.
/// - [`ConfigError::ZeroFlow`] if the inlets carry no mass.
/// - [`StageError::ThermoModelFailed`] if the thermo model fails.
pub fn mix<Fluid, T>(
    inlets: &[Stream<Fluid>],
    config: &MixerConfig,
    thermo: &T,
) -> Result<Stream<Fluid>, StageError>
where
    T: MixerThermoModel<Fluid>,
{
    let Some(first) = inlets.first() else {
        return Err(ConfigError::NoInlets.into());
    };

    let pressure = thermo
        .pressure(&first.state)
        .map_err(|err| StageError::thermo_failed("pressure(inlet 0)", err))?;

    let mut total = MassRate::new::<kilogram_per_second>(0.0);
    let mut enthalpy_flow = Power::new::<watt>(0.0);
    for (i, inlet) in inlets.iter().enumerate() {
        let p = thermo
            .pressure(&inlet.state)
            .map_err(|err| StageError::thermo_failed(format!("pressure(inlet {i})"), err))?;
        if ((p - pressure) / pressure).value.abs() > config.pressure_tolerance {
            return Err(ConfigError::PressureMismatch {
                expected: pressure,
                found: p,
            }
            .into());
        }

        let h = thermo
            .enthalpy(&inlet.state)
            .map_err(|err| StageError::thermo_failed(format!("enthalpy(inlet {i})"), err))?;

        total += inlet.mass_rate();
        enthalpy_flow += h * inlet.mass_rate();
    }

    if total.value <= 0.0 {
        return Err(ConfigError::ZeroFlow.into());
    }

    let parts: Vec<_> = inlets
        .iter()
        .map(|inlet| (&inlet.state.fluid, inlet.mass_rate()))
        .collect();
    let fluid = thermo
        .mix_fluids(&parts)
        .map_err(|err| StageError::thermo_failed("mix_fluids", err))?;

    let h_out: SpecificEnthalpy = enthalpy_flow / total;
    let state = thermo
        .state_from((fluid, pressure, h_out))
        .map_err(|err| {
            StageError::thermo_failed(
                format!("outlet_state_from(p={pressure:?}, h={h_out:?})"),
                err,
            )
        })?;

    let mass_rate = Constrained::<MassRate, NonNegative>::new(total)
        .map_err(ConfigError::parameter("mixed mass flow"))?;

    Ok(Stream::from_constrained(state, mass_rate))
}

/// Stream mixer as a [`Model`] from a set of inlets to one outlet.
#[derive(Debug, Clone)]
pub struct Mixer<T> {
    pub config: MixerConfig,
    pub thermo: T,
}

impl<T> Mixer<T> {
    #[must_use]
    pub fn new(thermo: T) -> Self {
        Self {
            config: MixerConfig::default(),
            thermo,
        }
    }
}

impl<T> Model for Mixer<T>
where
    T: HasPressure
        + HasEnthalpy
        + MixFluids
        + StateFrom<(<T as ThermoModel>::Fluid, Pressure, SpecificEnthalpy)>,
{
    type Input = Vec<Stream<T::Fluid>>;
    type Output = Stream<T::Fluid>;
    type Error = StageError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        mix(input, &self.config, &self.thermo)
    }
}
