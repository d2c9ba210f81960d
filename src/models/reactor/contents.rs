use twine_core::StepIntegrable;
use uom::si::{
    energy::joule,
    f64::{Energy, Mass, MassRate, Power, Time, Volume},
    mass::kilogram,
};

use crate::support::{
    thermo::{
        PropertyError, State,
        capability::{HasInternalEnergy, ThermoModel},
        fluid::{Composition, CompositionError, Species},
    },
    units::SpecificInternalEnergy,
};

/// Extensive contents of a well-mixed reactor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contents {
    /// Mass of each species, indexed like [`Species::ALL`].
    pub species: [Mass; Species::COUNT],
    pub internal_energy: Energy,
}

/// Time derivative of [`Contents`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentsRate {
    pub species: [MassRate; Species::COUNT],
    pub internal_energy: Power,
}

impl Contents {
    /// Fills `volume` with fluid at `state`.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the internal energy cannot be evaluated.
    pub fn fill<T>(
        thermo: &T,
        state: &State<Composition>,
        volume: Volume,
    ) -> Result<Self, PropertyError>
    where
        T: ThermoModel<Fluid = Composition> + HasInternalEnergy,
    {
        let mass = state.density * volume;
        let u = thermo.internal_energy(state)?;
        let fractions = state.fluid.mass_fractions();

        Ok(Self {
            species: fractions.map(|y| mass * y),
            internal_energy: u * mass,
        })
    }

    #[must_use]
    pub fn mass(&self) -> Mass {
        self.species
            .iter()
            .fold(Mass::new::<kilogram>(0.0), |total, &m| total + m)
    }

    #[must_use]
    pub fn specific_internal_energy(&self) -> SpecificInternalEnergy {
        self.internal_energy / self.mass()
    }

    /// Species makeup of the contents.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Empty`] if the reactor holds no mass.
    pub fn composition(&self) -> Result<Composition, CompositionError> {
        Composition::from_masses(
            Species::ALL
                .into_iter()
                .zip(self.species.map(|m| m.get::<kilogram>())),
        )
    }

    /// Clears round-off negatives left by a step.
    #[must_use]
    pub(crate) fn clamped(self) -> Self {
        let zero = Mass::new::<kilogram>(0.0);
        Self {
            species: self.species.map(|m| if m < zero { zero } else { m }),
            ..self
        }
    }
}

impl StepIntegrable<Time> for Contents {
    type Derivative = ContentsRate;

    fn step(&self, derivative: ContentsRate, dt: Time) -> Self {
        Self {
            species: std::array::from_fn(|i| self.species[i] + derivative.species[i] * dt),
            internal_energy: self.internal_energy + derivative.internal_energy * dt,
        }
    }
}

impl Default for Contents {
    fn default() -> Self {
        Self {
            species: [Mass::new::<kilogram>(0.0); Species::COUNT],
            internal_energy: Energy::new::<joule>(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::joule_per_kilogram, mass_rate::kilogram_per_second, power::watt,
        time::second, volume::cubic_meter,
    };

    use crate::models::test_support::{MockMixture, lean_reactants};

    #[test]
    fn fill_recovers_the_state() {
        let thermo = MockMixture::new();
        let state = MockMixture::state_tp(lean_reactants(0.5), 700.0, 3e5);
        let volume = Volume::new::<cubic_meter>(2.0);

        let contents = Contents::fill(&thermo, &state, volume).unwrap();

        assert_relative_eq!(
            contents.mass().get::<kilogram>(),
            2.0 * 3e5 / (MockMixture::GAS_CONSTANT * 700.0),
            max_relative = 1e-12
        );
        let composition = contents.composition().unwrap();
        for sp in Species::ALL {
            assert_relative_eq!(
                composition.mass_fraction(sp),
                state.fluid.mass_fraction(sp),
                epsilon = 1e-14
            );
        }
        assert_relative_eq!(
            contents.specific_internal_energy().get::<joule_per_kilogram>(),
            thermo.internal_energy(&state).unwrap().get::<joule_per_kilogram>(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn step_adds_rate_times_dt() {
        let contents = Contents {
            species: [Mass::new::<kilogram>(1.0); Species::COUNT],
            internal_energy: Energy::new::<joule>(10.0),
        };
        let mut species = [MassRate::new::<kilogram_per_second>(0.0); Species::COUNT];
        species[Species::H2.index()] = MassRate::new::<kilogram_per_second>(-4.0);
        let rate = ContentsRate {
            species,
            internal_energy: Power::new::<watt>(2.0),
        };

        let next = contents.step(rate, Time::new::<second>(0.5)).clamped();

        assert_eq!(next.species[Species::H2.index()].get::<kilogram>(), 0.0);
        assert_eq!(next.species[Species::O2.index()].get::<kilogram>(), 1.0);
        assert_relative_eq!(next.internal_energy.get::<joule>(), 11.0);
    }

    #[test]
    fn empty_contents_have_no_composition() {
        assert!(Contents::default().composition().is_err());
    }
}
