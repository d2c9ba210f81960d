//! Shared fixtures for model unit tests.
//!
//! [`MockGas`] is a perfect gas with `k = 1.4`, [`FakeThermo`] fails on
//! demand, and [`MockMixture`] is a closed-form reacting mixture so reactor
//! tests run without property inversions.

use std::convert::Infallible;

use thiserror::Error;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{
        MassDensity, MassRate, Power, Pressure, SpecificHeatCapacity, ThermodynamicTemperature,
        Volume,
    },
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    power::watt,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
    volume::cubic_meter,
};

use crate::support::{
    stream::Stream,
    thermo::{
        PropertyError, State,
        capability::{
            Equilibrate, EquilibriumConstraint, HasCp, HasCv, HasEnthalpy, HasEntropy,
            HasInternalEnergy, HasPressure, HasReactionRates, MixFluids, StateFrom, ThermoModel,
        },
        fluid::{Composition, Species},
        model::perfect_gas::{PerfectGas, PerfectGasFluid, PerfectGasParameters},
    },
    units::{
        MassProductionRate, SpecificEnthalpy, SpecificEntropy, SpecificGasConstant,
        SpecificInternalEnergy, VolumetricPower,
    },
};

/// Perfect gas test fluid with `k = 1.4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MockGas;

impl PerfectGasFluid for MockGas {
    fn parameters() -> PerfectGasParameters {
        // Choose R so that k = cp/(cp-R) is exactly 1.4.
        PerfectGasParameters::new(
            SpecificGasConstant::new::<joule_per_kilogram_kelvin>(2000.0 / 7.0),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1000.0),
        )
    }
}

pub(crate) fn mock_gas_model() -> PerfectGas<MockGas> {
    PerfectGas::<MockGas>::new().expect("mock gas parameters must be physically valid")
}

/// A [`MockGas`] stream at temperature (K), pressure (Pa), and flow (kg/s).
pub(crate) fn gas_stream(t: f64, p: f64, mass_rate: f64) -> Stream<MockGas> {
    let state = mock_gas_model()
        .state_from((
            ThermodynamicTemperature::new::<kelvin>(t),
            Pressure::new::<pascal>(p),
        ))
        .unwrap();
    Stream::new(state, MassRate::new::<kilogram_per_second>(mass_rate)).unwrap()
}

/// Constructs a specific enthalpy in SI units (J/kg).
pub(crate) fn enth_si(value: f64) -> SpecificEnthalpy {
    SpecificEnthalpy::new::<joule_per_kilogram>(value)
}

/// Failure/behavior modes for [`FakeThermo`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FakeMode {
    /// Fail `state_from((p_out, s_in))`.
    FailStateFromPressureEntropy,
    /// Fail `state_from((p_out, h_out))`.
    FailStateFromPressureEnthalpy,
    /// Make `entropy(&state)` return an error.
    FailEntropy,
}

/// Minimal thermodynamic model used to exercise error paths.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FakeThermo {
    pub(crate) mode: FakeMode,
}

#[derive(Debug, Error)]
#[error("fake state_from failure")]
pub(crate) struct FakeStateFromError;

fn fake_state() -> State<MockGas> {
    State {
        temperature: ThermodynamicTemperature::new::<kelvin>(300.0),
        density: MassDensity::new::<kilogram_per_cubic_meter>(1.0),
        fluid: MockGas,
    }
}

pub(crate) fn fake_stream() -> Stream<MockGas> {
    Stream::new(fake_state(), MassRate::new::<kilogram_per_second>(1.0)).unwrap()
}

impl ThermoModel for FakeThermo {
    type Fluid = MockGas;
}

impl HasPressure for FakeThermo {
    fn pressure(&self, _state: &State<MockGas>) -> Result<Pressure, PropertyError> {
        Ok(Pressure::new::<pascal>(100_000.0))
    }
}

impl HasEnthalpy for FakeThermo {
    fn enthalpy(&self, state: &State<MockGas>) -> Result<SpecificEnthalpy, PropertyError> {
        Ok(enth_si(1000.0 * state.temperature.get::<kelvin>()))
    }
}

impl HasEntropy for FakeThermo {
    fn entropy(&self, _state: &State<MockGas>) -> Result<SpecificEntropy, PropertyError> {
        match self.mode {
            FakeMode::FailEntropy => Err(PropertyError::Calculation {
                context: "fake".into(),
            }),
            _ => Ok(SpecificEntropy::new::<joule_per_kilogram_kelvin>(0.0)),
        }
    }
}

impl StateFrom<(MockGas, Pressure, SpecificEntropy)> for FakeThermo {
    type Error = FakeStateFromError;

    fn state_from(
        &self,
        (_fluid, _p, _s): (MockGas, Pressure, SpecificEntropy),
    ) -> Result<State<MockGas>, Self::Error> {
        match self.mode {
            FakeMode::FailStateFromPressureEntropy => Err(FakeStateFromError),
            _ => Ok(fake_state()),
        }
    }
}

impl StateFrom<(MockGas, Pressure, SpecificEnthalpy)> for FakeThermo {
    type Error = FakeStateFromError;

    fn state_from(
        &self,
        (_fluid, _p, _h): (MockGas, Pressure, SpecificEnthalpy),
    ) -> Result<State<MockGas>, Self::Error> {
        match self.mode {
            FakeMode::FailStateFromPressureEnthalpy => Err(FakeStateFromError),
            _ => Ok(fake_state()),
        }
    }
}

/// Closed-form reacting mixture for reactor tests.
///
/// - Gas constant and `cp` do not depend on composition.
/// - `h = cp·(T − T₀) + Y_H2O·Δh_f`, so burning releases `−Δh_f` per
///   kilogram of water formed.
/// - One irreversible step `H2 + ½O2 → H2O` at `q = k·exp(−Ta/T)·[H2]`.
/// - Equilibrium is complete combustion of the limiting reactant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MockMixture {
    pub(crate) rate_constant: f64,
    pub(crate) activation_temperature: f64,
}

impl MockMixture {
    pub(crate) const GAS_CONSTANT: f64 = 300.0;
    pub(crate) const CP: f64 = 1200.0;
    pub(crate) const T0: f64 = 298.15;
    pub(crate) const WATER_FORMATION: f64 = -1.3e7;

    pub(crate) fn new() -> Self {
        Self {
            rate_constant: 1e8,
            activation_temperature: 15_000.0,
        }
    }

    fn cv() -> f64 {
        Self::CP - Self::GAS_CONSTANT
    }

    fn chemical(fluid: &Composition) -> f64 {
        fluid.mass_fraction(Species::H2O) * Self::WATER_FORMATION
    }

    fn burned(fluid: &Composition) -> Composition {
        let moles = fluid.moles_per_kg();
        let extent = moles[Species::H2.index()].min(2.0 * moles[Species::O2.index()]);
        let mut next = moles;
        next[Species::H2.index()] -= extent;
        next[Species::O2.index()] -= 0.5 * extent;
        next[Species::H2O.index()] += extent;
        Composition::from_moles_per_kg(&next).unwrap()
    }

    fn progress(&self, state: &State<Composition>) -> f64 {
        let t = state.temperature.get::<kelvin>();
        let rho = state.density.get::<kilogram_per_cubic_meter>();
        let h2 = rho * state.fluid.mass_fraction(Species::H2) / Species::H2.kg_per_mol();
        self.rate_constant * (-self.activation_temperature / t).exp() * h2
    }

    pub(crate) fn state_tp(fluid: Composition, t: f64, p: f64) -> State<Composition> {
        State::new(
            ThermodynamicTemperature::new::<kelvin>(t),
            MassDensity::new::<kilogram_per_cubic_meter>(p / (Self::GAS_CONSTANT * t)),
            fluid,
        )
    }
}

impl ThermoModel for MockMixture {
    type Fluid = Composition;
}

impl HasPressure for MockMixture {
    fn pressure(&self, state: &State<Composition>) -> Result<Pressure, PropertyError> {
        let t = state.temperature.get::<kelvin>();
        let rho = state.density.get::<kilogram_per_cubic_meter>();
        Ok(Pressure::new::<pascal>(rho * Self::GAS_CONSTANT * t))
    }
}

impl HasEnthalpy for MockMixture {
    fn enthalpy(&self, state: &State<Composition>) -> Result<SpecificEnthalpy, PropertyError> {
        let t = state.temperature.get::<kelvin>();
        Ok(enth_si(Self::CP * (t - Self::T0) + Self::chemical(&state.fluid)))
    }
}

impl HasInternalEnergy for MockMixture {
    fn internal_energy(
        &self,
        state: &State<Composition>,
    ) -> Result<SpecificInternalEnergy, PropertyError> {
        let t = state.temperature.get::<kelvin>();
        let h = self.enthalpy(state)?.get::<joule_per_kilogram>();
        Ok(SpecificInternalEnergy::new::<joule_per_kilogram>(
            h - Self::GAS_CONSTANT * t,
        ))
    }
}

impl HasEntropy for MockMixture {
    fn entropy(&self, state: &State<Composition>) -> Result<SpecificEntropy, PropertyError> {
        let t = state.temperature.get::<kelvin>();
        let p = self.pressure(state)?.get::<pascal>();
        let s = Self::CP * (t / Self::T0).ln() - Self::GAS_CONSTANT * (p / 101_325.0).ln();
        Ok(SpecificEntropy::new::<joule_per_kilogram_kelvin>(s))
    }
}

impl HasCp for MockMixture {
    fn cp(&self, _state: &State<Composition>) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(
            Self::CP,
        ))
    }
}

impl HasCv for MockMixture {
    fn cv(&self, _state: &State<Composition>) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(
            Self::cv(),
        ))
    }
}

impl StateFrom<(Composition, ThermodynamicTemperature, Pressure)> for MockMixture {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, t, p): (Composition, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Composition>, Self::Error> {
        Ok(Self::state_tp(fluid, t.get::<kelvin>(), p.get::<pascal>()))
    }
}

impl StateFrom<(Composition, Pressure, SpecificEnthalpy)> for MockMixture {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, p, h): (Composition, Pressure, SpecificEnthalpy),
    ) -> Result<State<Composition>, Self::Error> {
        let sensible = h.get::<joule_per_kilogram>() - Self::chemical(&fluid);
        let t = Self::T0 + sensible / Self::CP;
        Ok(Self::state_tp(fluid, t, p.get::<pascal>()))
    }
}

impl StateFrom<(Composition, MassDensity, SpecificInternalEnergy)> for MockMixture {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, density, u): (Composition, MassDensity, SpecificInternalEnergy),
    ) -> Result<State<Composition>, Self::Error> {
        // u = cv·T − cp·T₀ + chemical
        let sensible = u.get::<joule_per_kilogram>() - Self::chemical(&fluid);
        let t = (sensible + Self::CP * Self::T0) / Self::cv();
        if t <= 0.0 {
            return Err(PropertyError::OutOfDomain {
                context: format!("mock temperature {t} K"),
            });
        }
        Ok(State::new(
            ThermodynamicTemperature::new::<kelvin>(t),
            density,
            fluid,
        ))
    }
}

impl Equilibrate for MockMixture {
    fn equilibrate(
        &self,
        state: &State<Composition>,
        constraint: EquilibriumConstraint,
    ) -> Result<State<Composition>, PropertyError> {
        let burned = Self::burned(&state.fluid);
        let t = state.temperature.get::<kelvin>();
        let released = Self::chemical(&state.fluid) - Self::chemical(&burned);
        let p = self.pressure(state)?.get::<pascal>();

        Ok(match constraint {
            EquilibriumConstraint::TemperaturePressure => Self::state_tp(burned, t, p),
            EquilibriumConstraint::EnthalpyPressure => {
                Self::state_tp(burned, t + released / Self::CP, p)
            }
            EquilibriumConstraint::InternalEnergyVolume => State::new(
                ThermodynamicTemperature::new::<kelvin>(t + released / Self::cv()),
                state.density,
                burned,
            ),
        })
    }
}

impl MixFluids for MockMixture {
    fn mix_fluids(&self, parts: &[(&Composition, MassRate)]) -> Result<Composition, PropertyError> {
        let weighted: Vec<_> = parts
            .iter()
            .map(|(fluid, rate)| (**fluid, rate.get::<kilogram_per_second>()))
            .collect();
        Composition::blend(&weighted).map_err(|err| PropertyError::InvalidState {
            context: err.to_string(),
        })
    }
}

impl HasReactionRates for MockMixture {
    fn production_rates(
        &self,
        state: &State<Composition>,
    ) -> Result<[MassProductionRate; Species::COUNT], PropertyError> {
        let q = self.progress(state);
        let unit_volume = Volume::new::<cubic_meter>(1.0);
        Ok(Species::ALL.map(|sp| {
            let rate = match sp {
                Species::H2 => -q * sp.kg_per_mol(),
                Species::O2 => -0.5 * q * sp.kg_per_mol(),
                Species::H2O => q * sp.kg_per_mol(),
                Species::N2 | Species::Ar => 0.0,
            };
            MassRate::new::<kilogram_per_second>(rate) / unit_volume
        }))
    }

    fn heat_release_rate(
        &self,
        state: &State<Composition>,
    ) -> Result<VolumetricPower, PropertyError> {
        let q = self.progress(state);
        let water = q * Species::H2O.kg_per_mol();
        Ok(Power::new::<watt>(-water * Self::WATER_FORMATION) / Volume::new::<cubic_meter>(1.0))
    }
}

/// Lean hydrogen-air reactants at equivalence ratio `phi`.
pub(crate) fn lean_reactants(phi: f64) -> Composition {
    let air: Composition = "O2:1, N2:3.76".parse().unwrap();
    Composition::at_equivalence_ratio(phi, &Composition::pure(Species::H2), &air).unwrap()
}
