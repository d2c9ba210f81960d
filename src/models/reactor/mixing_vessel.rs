use twine_core::Model;
use uom::si::{
    f64::{MassRate, Power, Pressure, Volume},
    mass_rate::kilogram_per_second,
    power::watt,
    pressure::pascal,
    volume::cubic_meter,
};

use crate::{
    models::ConfigError,
    support::{
        stream::Stream,
        thermo::{State, fluid::Composition},
        units::{FlowCoefficient, SpecificEnthalpy},
    },
};

use super::{
    Contents, ReactorError,
    core::{Chemistry, Inlet, ReactorThermoModel, SteadyState, SteadyStateConfig, WellMixedReactor},
    flow_law::{ConstantFlow, Outlet},
};

/// Mixing vessel parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixingVesselConfig {
    pub volume: Volume,
    pub valve_coefficient: FlowCoefficient,
    /// Pressure the valve discharges into.
    pub downstream: Pressure,
    pub chemistry: Chemistry,
    pub steady: SteadyStateConfig,
}

impl MixingVesselConfig {
    /// A one cubic meter, non-reacting vessel with a `0.01 kg/(s·Pa)` valve.
    #[must_use]
    pub fn new(downstream: Pressure) -> Self {
        Self {
            volume: Volume::new::<cubic_meter>(1.0),
            valve_coefficient: MassRate::new::<kilogram_per_second>(0.01)
                / Pressure::new::<pascal>(1.0),
            downstream,
            chemistry: Chemistry::Frozen,
            steady: SteadyStateConfig::default(),
        }
    }
}

/// Dynamic mixer as a [`Model`] from inlet streams to [`SteadyState`].
///
/// Each inlet feeds at its own mass flow rate and the vessel vents through a
/// valve, so the steady pressure sits above the downstream pressure by
/// `ṁ / K`. Unlike the [`Mixer`](crate::models::flow::Mixer), inlets need not
/// share a pressure.
#[derive(Debug, Clone)]
pub struct MixingVessel<T> {
    pub config: MixingVesselConfig,
    pub thermo: T,
}

impl<T: ReactorThermoModel> MixingVessel<T> {
    #[must_use]
    pub fn new(config: MixingVesselConfig, thermo: T) -> Self {
        Self { config, thermo }
    }

    /// Adiabatic blend of the inlets at the steady valve pressure
    /// `P_down + ṁ / K`.
    fn blended_fill(&self, inlets: &[Stream<Composition>]) -> Result<Contents, ReactorError> {
        let mut total = MassRate::new::<kilogram_per_second>(0.0);
        let mut enthalpy_flow = Power::new::<watt>(0.0);
        let mut parts = Vec::with_capacity(inlets.len());

        for (i, inlet) in inlets.iter().enumerate() {
            let h = self.thermo.enthalpy(&inlet.state).map_err(|err| {
                ReactorError::thermo_failed(format!("enthalpy(inlet {i})"), err)
            })?;
            total += inlet.mass_rate();
            enthalpy_flow += h * inlet.mass_rate();
            parts.push((inlet.state.fluid, inlet.mass_rate().get::<kilogram_per_second>()));
        }

        if total.get::<kilogram_per_second>() <= 0.0 {
            return Err(ConfigError::ZeroFlow.into());
        }

        let fluid = Composition::blend(&parts)
            .map_err(|err| ReactorError::thermo_failed("blend(inlets)", err))?;
        let h: SpecificEnthalpy = enthalpy_flow / total;
        let pressure: Pressure = self.config.downstream + total / self.config.valve_coefficient;
        let state: State<Composition> = self
            .thermo
            .state_from((fluid, pressure, h))
            .map_err(|err| ReactorError::thermo_failed("state_from(p_valve, h_mix)", err))?;

        Contents::fill(&self.thermo, &state, self.config.volume)
            .map_err(|err| ReactorError::thermo_failed("fill(initial)", err))
    }
}

impl<T: ReactorThermoModel> Model for MixingVessel<T> {
    type Input = Vec<Stream<Composition>>;
    type Output = SteadyState;
    type Error = ReactorError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let inlets = input
            .iter()
            .map(|stream| {
                let law = ConstantFlow::new(stream.mass_rate())
                    .map_err(ConfigError::parameter("inlet mass flow"))?;
                Ok(Inlet {
                    state: stream.state,
                    law,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let reactor = WellMixedReactor::new(
            self.config.volume,
            inlets,
            Outlet::Valve {
                coefficient: self.config.valve_coefficient,
                downstream: self.config.downstream,
            },
            self.config.chemistry,
        )?;

        let initial = self.blended_fill(input)?;
        reactor.solve_steady(&self.thermo, initial, &self.config.steady)
    }
}
