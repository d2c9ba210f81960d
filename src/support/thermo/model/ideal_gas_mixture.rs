//! Thermally perfect mixture of hydrogen-combustion species.
//!
//! `IdealGasMixture` treats a gas as an ideal mixture of [`Species`] with
//! temperature-dependent heat capacities from NASA 7-coefficient fits. The
//! fluid of every state is its [`Composition`].
//!
//! # Capabilities
//!
//! - Properties: pressure, enthalpy, entropy, internal energy, `cp`, `cv`.
//! - States from `(T, P)`, `(T, ρ)`, `(P, h)`, `(P, s)` and `(ρ, u)`. The last
//!   three are temperature inversions solved by bisection.
//! - Chemical equilibrium of `H2 + ½O2 ⇌ H2O` under HP, TP or UV constraints.
//! - Finite-rate chemistry through a global one-step [`GlobalRate`].
//!
//! Enthalpies include heats of formation, so burning at constant enthalpy
//! raises the temperature without any explicit heat-release term.
//!
//! # Example
//!
//! ```
//! use twine_microturbine::support::thermo::{
//!     capability::{Equilibrate, EquilibriumConstraint, StateFrom},
//!     fluid::{Composition, Species},
//!     model::IdealGasMixture,
//! };
//! use uom::si::{
//!     f64::{Pressure, ThermodynamicTemperature},
//!     pressure::pascal,
//!     thermodynamic_temperature::kelvin,
//! };
//!
//! let thermo = IdealGasMixture::new();
//! let air: Composition = "O2:1, N2:3.76".parse().unwrap();
//! let fuel = Composition::pure(Species::H2);
//! let reactants = Composition::at_equivalence_ratio(0.5, &fuel, &air).unwrap();
//!
//! let inlet = thermo
//!     .state_from((
//!         reactants,
//!         ThermodynamicTemperature::new::<kelvin>(700.0),
//!         Pressure::new::<pascal>(3e5),
//!     ))
//!     .unwrap();
//! let flame = thermo
//!     .equilibrate(&inlet, EquilibriumConstraint::EnthalpyPressure)
//!     .unwrap();
//!
//! assert!(flame.temperature.get::<kelvin>() > 1900.0);
//! assert!(flame.fluid.mass_fraction(Species::H2O) > 0.1);
//! ```

mod equilibrium;
mod inversion;
mod kinetics;
mod nasa;

pub use kinetics::GlobalRate;

use twine_solvers::equation::bisection;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{
        MassDensity, MassRate, Power, Pressure, SpecificHeatCapacity, TemperatureInterval,
        ThermodynamicTemperature, Volume,
    },
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    power::watt,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    temperature_interval,
    thermodynamic_temperature::kelvin,
    volume::cubic_meter,
};

use crate::support::{
    thermo::{
        PropertyError, State,
        capability::{
            Equilibrate, EquilibriumConstraint, HasCp, HasCv, HasEnthalpy, HasEntropy,
            HasInternalEnergy, HasPressure, HasReactionRates, MixFluids, StateFrom, ThermoModel,
        },
        fluid::{Composition, CompositionError, Species},
    },
    units::{
        MassProductionRate, SpecificEnthalpy, SpecificEntropy, SpecificInternalEnergy,
        VolumetricPower,
    },
};

use equilibrium::{Confinement, equilibrium_moles};
use nasa::{GAS_CONSTANT, REFERENCE_PRESSURE, polynomial};

type Moles = [f64; Species::COUNT];

/// Bisection settings for temperature inversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSearch {
    /// Lower end of the search bracket.
    pub min_temperature: ThermodynamicTemperature,

    /// Upper end of the search bracket.
    pub max_temperature: ThermodynamicTemperature,

    /// Absolute tolerance on the temperature.
    pub temperature_tol: TemperatureInterval,

    /// Maximum iteration count for each bisection solve.
    pub max_iters: usize,
}

impl Default for TemperatureSearch {
    fn default() -> Self {
        Self {
            min_temperature: ThermodynamicTemperature::new::<kelvin>(200.0),
            max_temperature: ThermodynamicTemperature::new::<kelvin>(5000.0),
            temperature_tol: TemperatureInterval::new::<temperature_interval::kelvin>(1e-9),
            max_iters: 100,
        }
    }
}

impl TemperatureSearch {
    fn bracket(&self) -> [f64; 2] {
        [
            self.min_temperature.get::<kelvin>(),
            self.max_temperature.get::<kelvin>(),
        ]
    }

    fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.temperature_tol.get::<temperature_interval::kelvin>(),
            x_rel_tol: 0.0,
            residual_tol: 1e-9,
        }
    }
}

/// Ideal-gas mixture model with NASA-7 species data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IdealGasMixture {
    rate: GlobalRate,
    search: TemperatureSearch,
}

impl ThermoModel for IdealGasMixture {
    type Fluid = Composition;
}

impl IdealGasMixture {
    /// Creates a mixture model with the default hydrogen rate and search
    /// settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the global reaction rate.
    #[must_use]
    pub fn with_rate(self, rate: GlobalRate) -> Self {
        Self { rate, ..self }
    }

    /// Replaces the temperature search settings.
    #[must_use]
    pub fn with_search(self, search: TemperatureSearch) -> Self {
        Self { search, ..self }
    }

    #[must_use]
    pub fn rate(&self) -> &GlobalRate {
        &self.rate
    }

    fn solve_temperature(
        &self,
        what: &str,
        target: f64,
        eval: impl Fn(f64) -> Result<f64, PropertyError>,
    ) -> Result<f64, PropertyError> {
        inversion::solve_temperature(
            what,
            target,
            self.search.bracket(),
            &self.search.bisection(),
            eval,
        )
    }

    /// Builds a state from moles per kilogram at temperature `t`.
    fn mixture_state(
        moles: &Moles,
        t: f64,
        confinement: Confinement,
    ) -> Result<State<Composition>, PropertyError> {
        let fluid = Composition::from_moles_per_kg(moles).map_err(invalid_composition)?;
        let density = match confinement {
            Confinement::Pressure(p) => p / (gas_constant(moles) * t),
            Confinement::Density(rho) => rho,
        };
        Ok(State::new(
            ThermodynamicTemperature::new::<kelvin>(t),
            MassDensity::new::<kilogram_per_cubic_meter>(density),
            fluid,
        ))
    }
}

/// Mixture gas constant, J/(kg·K).
fn gas_constant(moles: &Moles) -> f64 {
    GAS_CONSTANT * moles.iter().sum::<f64>()
}

/// Mixture enthalpy, J/kg.
fn enthalpy(moles: &Moles, t: f64) -> f64 {
    GAS_CONSTANT
        * t
        * Species::ALL
            .into_iter()
            .map(|sp| moles[sp.index()] * polynomial(sp).h_rt(t))
            .sum::<f64>()
}

/// Mixture internal energy, J/kg.
fn internal_energy(moles: &Moles, t: f64) -> f64 {
    enthalpy(moles, t) - gas_constant(moles) * t
}

/// Mixture heat capacity at constant pressure, J/(kg·K).
fn cp(moles: &Moles, t: f64) -> f64 {
    GAS_CONSTANT
        * Species::ALL
            .into_iter()
            .map(|sp| moles[sp.index()] * polynomial(sp).cp_r(t))
            .sum::<f64>()
}

/// Mixture entropy including the ideal mixing term, J/(kg·K).
fn entropy(moles: &Moles, t: f64, p: f64) -> f64 {
    let total: f64 = moles.iter().sum();
    GAS_CONSTANT
        * Species::ALL
            .into_iter()
            .filter(|sp| moles[sp.index()] > 0.0)
            .map(|sp| {
                let n = moles[sp.index()];
                let partial = n / total * p / REFERENCE_PRESSURE;
                n * (polynomial(sp).s_r(t) - partial.ln())
            })
            .sum::<f64>()
}

fn temperature_of<F>(state: &State<F>) -> Result<f64, PropertyError> {
    let t = state.temperature.get::<kelvin>();
    if t.is_finite() && t > 0.0 {
        Ok(t)
    } else {
        Err(PropertyError::OutOfDomain {
            context: format!("temperature must be positive, got {t} K"),
        })
    }
}

fn density_of<F>(state: &State<F>) -> Result<f64, PropertyError> {
    let rho = state.density.get::<kilogram_per_cubic_meter>();
    if rho.is_finite() && rho > 0.0 {
        Ok(rho)
    } else {
        Err(PropertyError::InvalidState {
            context: format!("density must be positive, got {rho} kg/m³"),
        })
    }
}

fn positive(what: &str, value: f64) -> Result<f64, PropertyError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PropertyError::OutOfDomain {
            context: format!("{what} must be positive, got {value}"),
        })
    }
}

fn invalid_composition(err: CompositionError) -> PropertyError {
    PropertyError::InvalidState {
        context: err.to_string(),
    }
}

impl HasPressure for IdealGasMixture {
    /// Computes pressure with `P = ρ·R_mix·T`.
    fn pressure(&self, state: &State<Composition>) -> Result<Pressure, PropertyError> {
        let t = temperature_of(state)?;
        let rho = density_of(state)?;
        let r = gas_constant(&state.fluid.moles_per_kg());
        Ok(Pressure::new::<pascal>(rho * r * t))
    }
}

impl HasEnthalpy for IdealGasMixture {
    fn enthalpy(&self, state: &State<Composition>) -> Result<SpecificEnthalpy, PropertyError> {
        let t = temperature_of(state)?;
        let h = enthalpy(&state.fluid.moles_per_kg(), t);
        Ok(SpecificEnthalpy::new::<joule_per_kilogram>(h))
    }
}

impl HasInternalEnergy for IdealGasMixture {
    fn internal_energy(
        &self,
        state: &State<Composition>,
    ) -> Result<SpecificInternalEnergy, PropertyError> {
        let t = temperature_of(state)?;
        let u = internal_energy(&state.fluid.moles_per_kg(), t);
        Ok(SpecificInternalEnergy::new::<joule_per_kilogram>(u))
    }
}

impl HasEntropy for IdealGasMixture {
    fn entropy(&self, state: &State<Composition>) -> Result<SpecificEntropy, PropertyError> {
        let t = temperature_of(state)?;
        let p = self.pressure(state)?.get::<pascal>();
        let s = entropy(&state.fluid.moles_per_kg(), t, p);
        Ok(SpecificEntropy::new::<joule_per_kilogram_kelvin>(s))
    }
}

impl HasCp for IdealGasMixture {
    fn cp(&self, state: &State<Composition>) -> Result<SpecificHeatCapacity, PropertyError> {
        let t = temperature_of(state)?;
        let cp = cp(&state.fluid.moles_per_kg(), t);
        Ok(SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp))
    }
}

impl HasCv for IdealGasMixture {
    fn cv(&self, state: &State<Composition>) -> Result<SpecificHeatCapacity, PropertyError> {
        let t = temperature_of(state)?;
        let moles = state.fluid.moles_per_kg();
        let cv = cp(&moles, t) - gas_constant(&moles);
        Ok(SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cv))
    }
}

impl StateFrom<(Composition, ThermodynamicTemperature, Pressure)> for IdealGasMixture {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (Composition, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Composition>, Self::Error> {
        let t = positive("temperature", temperature.get::<kelvin>())?;
        let p = positive("pressure", pressure.get::<pascal>())?;
        let rho = p / (gas_constant(&fluid.moles_per_kg()) * t);
        Ok(State::new(
            temperature,
            MassDensity::new::<kilogram_per_cubic_meter>(rho),
            fluid,
        ))
    }
}

impl StateFrom<(Composition, ThermodynamicTemperature, MassDensity)> for IdealGasMixture {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, temperature, density): (Composition, ThermodynamicTemperature, MassDensity),
    ) -> Result<State<Composition>, Self::Error> {
        positive("temperature", temperature.get::<kelvin>())?;
        positive("density", density.get::<kilogram_per_cubic_meter>())?;
        Ok(State::new(temperature, density, fluid))
    }
}

impl StateFrom<(Composition, Pressure, SpecificEnthalpy)> for IdealGasMixture {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, pressure, enthalpy_target): (Composition, Pressure, SpecificEnthalpy),
    ) -> Result<State<Composition>, Self::Error> {
        let p = positive("pressure", pressure.get::<pascal>())?;
        let moles = fluid.moles_per_kg();
        let target = enthalpy_target.get::<joule_per_kilogram>();
        let t = self.solve_temperature("temperature from enthalpy", target, |t| {
            Ok(enthalpy(&moles, t))
        })?;
        Self::mixture_state(&moles, t, Confinement::Pressure(p))
    }
}

impl StateFrom<(Composition, Pressure, SpecificEntropy)> for IdealGasMixture {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, pressure, entropy_target): (Composition, Pressure, SpecificEntropy),
    ) -> Result<State<Composition>, Self::Error> {
        let p = positive("pressure", pressure.get::<pascal>())?;
        let moles = fluid.moles_per_kg();
        let target = entropy_target.get::<joule_per_kilogram_kelvin>();
        let t = self.solve_temperature("temperature from entropy", target, |t| {
            Ok(entropy(&moles, t, p))
        })?;
        Self::mixture_state(&moles, t, Confinement::Pressure(p))
    }
}

impl StateFrom<(Composition, MassDensity, SpecificInternalEnergy)> for IdealGasMixture {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, density, energy_target): (Composition, MassDensity, SpecificInternalEnergy),
    ) -> Result<State<Composition>, Self::Error> {
        let rho = positive("density", density.get::<kilogram_per_cubic_meter>())?;
        let moles = fluid.moles_per_kg();
        let target = energy_target.get::<joule_per_kilogram>();
        let t = self.solve_temperature("temperature from internal energy", target, |t| {
            Ok(internal_energy(&moles, t))
        })?;
        Self::mixture_state(&moles, t, Confinement::Density(rho))
    }
}

impl Equilibrate for IdealGasMixture {
    fn equilibrate(
        &self,
        state: &State<Composition>,
        constraint: EquilibriumConstraint,
    ) -> Result<State<Composition>, PropertyError> {
        let t = temperature_of(state)?;
        let rho = density_of(state)?;
        let initial = state.fluid.moles_per_kg();

        match constraint {
            EquilibriumConstraint::TemperaturePressure => {
                let confinement = Confinement::Pressure(rho * gas_constant(&initial) * t);
                let moles = equilibrium_moles(&initial, t, confinement)?;
                Self::mixture_state(&moles, t, confinement)
            }
            EquilibriumConstraint::EnthalpyPressure => {
                let confinement = Confinement::Pressure(rho * gas_constant(&initial) * t);
                let target = enthalpy(&initial, t);
                let t_eq = self.solve_temperature("equilibrium at fixed enthalpy", target, |t| {
                    Ok(enthalpy(&equilibrium_moles(&initial, t, confinement)?, t))
                })?;
                let moles = equilibrium_moles(&initial, t_eq, confinement)?;
                Self::mixture_state(&moles, t_eq, confinement)
            }
            EquilibriumConstraint::InternalEnergyVolume => {
                let confinement = Confinement::Density(rho);
                let target = internal_energy(&initial, t);
                let t_eq =
                    self.solve_temperature("equilibrium at fixed internal energy", target, |t| {
                        Ok(internal_energy(
                            &equilibrium_moles(&initial, t, confinement)?,
                            t,
                        ))
                    })?;
                let moles = equilibrium_moles(&initial, t_eq, confinement)?;
                Self::mixture_state(&moles, t_eq, confinement)
            }
        }
    }
}

impl MixFluids for IdealGasMixture {
    fn mix_fluids(&self, parts: &[(&Composition, MassRate)]) -> Result<Composition, PropertyError> {
        let weighted: Vec<(Composition, f64)> = parts
            .iter()
            .map(|(composition, mass_rate)| {
                (**composition, mass_rate.get::<kilogram_per_second>())
            })
            .collect();
        Composition::blend(&weighted).map_err(invalid_composition)
    }
}

impl HasReactionRates for IdealGasMixture {
    fn production_rates(
        &self,
        state: &State<Composition>,
    ) -> Result<[MassProductionRate; Species::COUNT], PropertyError> {
        let t = temperature_of(state)?;
        let rho = density_of(state)?;
        let q = self.rate.progress(t, rho, &state.fluid.mass_fractions());
        let unit_volume = Volume::new::<cubic_meter>(1.0);
        Ok(self
            .rate
            .production(q)
            .map(|w| MassRate::new::<kilogram_per_second>(w) / unit_volume))
    }

    fn heat_release_rate(
        &self,
        state: &State<Composition>,
    ) -> Result<VolumetricPower, PropertyError> {
        let t = temperature_of(state)?;
        let rho = density_of(state)?;
        let q = self.rate.progress(t, rho, &state.fluid.mass_fractions());
        let production = self.rate.production(q);

        let released: f64 = Species::ALL
            .into_iter()
            .map(|sp| {
                let h_k = GAS_CONSTANT * t * polynomial(sp).h_rt(t) / sp.kg_per_mol();
                -production[sp.index()] * h_k
            })
            .sum();

        Ok(Power::new::<watt>(released) / Volume::new::<cubic_meter>(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn thermo() -> IdealGasMixture {
        IdealGasMixture::new()
    }

    fn air() -> Composition {
        "O2:1, N2:3.76".parse().unwrap()
    }

    fn reactants(phi: f64) -> Composition {
        Composition::at_equivalence_ratio(phi, &Composition::pure(Species::H2), &air()).unwrap()
    }

    fn state_tp(fluid: Composition, t: f64, p: f64) -> State<Composition> {
        thermo()
            .state_from((
                fluid,
                ThermodynamicTemperature::new::<kelvin>(t),
                Pressure::new::<pascal>(p),
            ))
            .unwrap()
    }

    #[test]
    fn air_at_room_conditions() {
        let state = state_tp(air(), 300.0, 101_325.0);
        assert_relative_eq!(
            state.density.get::<kilogram_per_cubic_meter>(),
            1.172,
            max_relative = 2e-3
        );

        let cp = thermo().cp(&state).unwrap().get::<joule_per_kilogram_kelvin>();
        let cv = thermo().cv(&state).unwrap().get::<joule_per_kilogram_kelvin>();
        assert_relative_eq!(cp, 1010.0, max_relative = 2e-3);
        assert_relative_eq!(cp / cv, 1.40, max_relative = 5e-3);
    }

    #[test]
    fn pressure_enthalpy_inversion() {
        let state = state_tp(reactants(0.4), 812.5, 3e5);
        let h = thermo().enthalpy(&state).unwrap();
        let p = thermo().pressure(&state).unwrap();

        let back = thermo().state_from((state.fluid, p, h)).unwrap();
        assert_relative_eq!(back.temperature.get::<kelvin>(), 812.5, epsilon = 1e-6);
        assert_relative_eq!(
            back.density.get::<kilogram_per_cubic_meter>(),
            state.density.get::<kilogram_per_cubic_meter>(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn pressure_entropy_inversion() {
        let state = state_tp(air(), 1234.0, 2e5);
        let s = thermo().entropy(&state).unwrap();
        let back = thermo()
            .state_from((state.fluid, Pressure::new::<pascal>(2e5), s))
            .unwrap();
        assert_relative_eq!(back.temperature.get::<kelvin>(), 1234.0, epsilon = 1e-6);
    }

    #[test]
    fn density_internal_energy_inversion() {
        let state = state_tp(reactants(1.0), 1900.0, 5e5);
        let u = thermo().internal_energy(&state).unwrap();
        let back = thermo().state_from((state.fluid, state.density, u)).unwrap();
        assert_relative_eq!(back.temperature.get::<kelvin>(), 1900.0, epsilon = 1e-6);
    }

    #[test]
    fn isentropic_compression_of_air() {
        // r = 3 from 293 K with γ ≈ 1.4 gives about 401 K.
        let inlet = state_tp(air(), 293.0, 1e5);
        let s = thermo().entropy(&inlet).unwrap();
        let outlet = thermo()
            .state_from((air(), Pressure::new::<pascal>(3e5), s))
            .unwrap();
        assert_relative_eq!(outlet.temperature.get::<kelvin>(), 401.0, epsilon = 2.0);
    }

    #[test]
    fn hp_equilibrium_conserves_enthalpy_and_pressure() {
        let inlet = state_tp(reactants(0.5), 700.0, 3e5);
        let flame = thermo()
            .equilibrate(&inlet, EquilibriumConstraint::EnthalpyPressure)
            .unwrap();

        assert_relative_eq!(
            thermo().enthalpy(&flame).unwrap().get::<joule_per_kilogram>(),
            thermo().enthalpy(&inlet).unwrap().get::<joule_per_kilogram>(),
            epsilon = 1e-3
        );
        assert_relative_eq!(
            thermo().pressure(&flame).unwrap().get::<pascal>(),
            3e5,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            flame.fluid.equivalence_ratio(),
            0.5,
            max_relative = 1e-9
        );
        assert_relative_eq!(flame.temperature.get::<kelvin>(), 1986.0, max_relative = 0.01);
        assert!(flame.fluid.mass_fraction(Species::H2) < 1e-4);
    }

    #[test]
    fn richer_flames_are_hotter_up_to_stoichiometric() {
        let flame_temperature = |phi: f64| {
            let inlet = state_tp(reactants(phi), 300.0, 1e5);
            thermo()
                .equilibrate(&inlet, EquilibriumConstraint::EnthalpyPressure)
                .unwrap()
                .temperature
                .get::<kelvin>()
        };
        let lean = flame_temperature(0.3);
        let stoichiometric = flame_temperature(1.0);
        assert!(lean < stoichiometric);
        // Without radicals the stoichiometric flame runs slightly above 2400 K.
        assert_relative_eq!(stoichiometric, 2430.0, max_relative = 0.01);
    }

    #[test]
    fn uv_equilibrium_holds_density_and_energy() {
        let inlet = state_tp(reactants(0.8), 800.0, 1e5);
        let burned = thermo()
            .equilibrate(&inlet, EquilibriumConstraint::InternalEnergyVolume)
            .unwrap();
        assert_eq!(burned.density, inlet.density);
        assert_relative_eq!(
            thermo().internal_energy(&burned).unwrap().get::<joule_per_kilogram>(),
            thermo().internal_energy(&inlet).unwrap().get::<joule_per_kilogram>(),
            epsilon = 1e-3
        );
        assert!(thermo().pressure(&burned).unwrap() > thermo().pressure(&inlet).unwrap());
    }

    #[test]
    fn tp_equilibrium_keeps_temperature() {
        let inlet = state_tp(reactants(1.0), 1500.0, 1e5);
        let eq = thermo()
            .equilibrate(&inlet, EquilibriumConstraint::TemperaturePressure)
            .unwrap();
        assert_eq!(eq.temperature, inlet.temperature);
        assert!(eq.fluid.mass_fraction(Species::H2) < 1e-4);
    }

    #[test]
    fn reaction_rates_conserve_mass_and_release_heat() {
        let state = state_tp(reactants(0.5), 1500.0, 3e5);
        let rates = thermo().production_rates(&state).unwrap();
        let net: f64 = rates.iter().map(|w| w.value).sum();
        let fuel = rates[Species::H2.index()].value;
        assert!(fuel < 0.0);
        assert!(net.abs() < 1e-12 * fuel.abs());
        assert!(thermo().heat_release_rate(&state).unwrap().value > 0.0);
    }

    #[test]
    fn mixing_blends_by_mass_rate() {
        let h2 = Composition::pure(Species::H2);
        let a = air();
        let mixed = thermo()
            .mix_fluids(&[
                (&h2, MassRate::new::<kilogram_per_second>(0.001)),
                (&a, MassRate::new::<kilogram_per_second>(0.009)),
            ])
            .unwrap();
        assert_relative_eq!(mixed.mass_fraction(Species::H2), 0.1, epsilon = 1e-12);

        let none = thermo().mix_fluids(&[(&h2, MassRate::new::<kilogram_per_second>(0.0))]);
        assert!(matches!(none, Err(PropertyError::InvalidState { .. })));
    }

    #[test]
    fn rejects_non_physical_inputs() {
        let err = thermo()
            .state_from((
                air(),
                ThermodynamicTemperature::new::<kelvin>(300.0),
                Pressure::new::<pascal>(-1.0),
            ))
            .unwrap_err();
        assert!(matches!(err, PropertyError::OutOfDomain { .. }));

        let h = SpecificEnthalpy::new::<joule_per_kilogram>(1e9);
        let err = thermo()
            .state_from((air(), Pressure::new::<pascal>(1e5), h))
            .unwrap_err();
        assert!(matches!(err, PropertyError::OutOfDomain { .. }));
    }
}
