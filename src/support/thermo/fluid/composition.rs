use std::{fmt, str::FromStr};

use thiserror::Error;
use uom::si::{f64::MolarMass, molar_mass::kilogram_per_mole};

use super::Species;

/// Allowed drift of the mass-fraction sum from one.
const SUM_TOLERANCE: f64 = 1e-12;

/// Errors raised while building a [`Composition`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
    #[error("unknown species `{0}`")]
    UnknownSpecies(String),

    #[error("malformed entry `{0}`, expected `Species:amount`")]
    Malformed(String),

    #[error("invalid amount {amount} for {species}")]
    InvalidAmount { species: Species, amount: f64 },

    #[error("composition has no material")]
    Empty,

    #[error("cannot mix at equivalence ratio: {context}")]
    Stoichiometry { context: String },
}

/// Species makeup of a gas mixture, stored as normalized mass fractions.
///
/// This is the fluid type of the
/// [`IdealGasMixture`](crate::support::thermo::model::IdealGasMixture) model,
/// so every mixture state carries its own composition.
///
/// # Example
///
/// ```
/// use twine_microturbine::support::thermo::fluid::{Composition, Species};
///
/// let air: Composition = "O2:1, N2:3.76".parse().unwrap();
/// assert!((air.mole_fraction(Species::O2) - 1.0 / 4.76).abs() < 1e-12);
///
/// let fuel = Composition::pure(Species::H2);
/// let mix = Composition::at_equivalence_ratio(1.0, &fuel, &air).unwrap();
/// assert!((mix.equivalence_ratio() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    mass_fractions: [f64; Species::COUNT],
}

impl Composition {
    /// A single species.
    #[must_use]
    pub fn pure(species: Species) -> Self {
        let mut mass_fractions = [0.0; Species::COUNT];
        mass_fractions[species.index()] = 1.0;
        Self { mass_fractions }
    }

    /// Dry air by mole: 20.95 % O2, 78.09 % N2, 0.96 % Ar.
    #[must_use]
    pub fn dry_air() -> Self {
        let mut masses = [0.0; Species::COUNT];
        for (species, x) in [
            (Species::O2, 0.2095),
            (Species::N2, 0.7809),
            (Species::Ar, 0.0096),
        ] {
            masses[species.index()] = x * species.kg_per_mol();
        }
        let total: f64 = masses.iter().sum();
        Self {
            mass_fractions: masses.map(|m| m / total),
        }
    }

    /// Builds a composition from mole amounts, which need not be normalized.
    ///
    /// Repeated species are summed.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::InvalidAmount`] for a negative or non-finite
    /// amount and [`CompositionError::Empty`] if the amounts sum to zero.
    pub fn from_moles(
        amounts: impl IntoIterator<Item = (Species, f64)>,
    ) -> Result<Self, CompositionError> {
        let moles = collect_amounts(amounts)?;
        let masses = std::array::from_fn(|i| moles[i] * Species::ALL[i].kg_per_mol());
        Self::normalized(masses)
    }

    /// Builds a composition from masses, which need not be normalized.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Composition::from_moles`].
    pub fn from_masses(
        amounts: impl IntoIterator<Item = (Species, f64)>,
    ) -> Result<Self, CompositionError> {
        Self::normalized(collect_amounts(amounts)?)
    }

    /// Mass-weighted average of several compositions.
    ///
    /// Each weight is the mass (or mass flow) contributed by its composition.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::InvalidAmount`] for a negative or non-finite
    /// weight and [`CompositionError::Empty`] if the weights sum to zero.
    pub fn blend(parts: &[(Composition, f64)]) -> Result<Self, CompositionError> {
        let mut masses = [0.0; Species::COUNT];
        for (composition, weight) in parts {
            if !weight.is_finite() || *weight < 0.0 {
                let species = composition.dominant_species();
                return Err(CompositionError::InvalidAmount {
                    species,
                    amount: *weight,
                });
            }
            for (mass, y) in masses.iter_mut().zip(composition.mass_fractions) {
                *mass += weight * y;
            }
        }
        Self::normalized(masses)
    }

    /// Mixes `fuel` and `oxidizer` at equivalence ratio `phi`.
    ///
    /// Works on a mole basis with oxygen-atom bookkeeping: one mole of fuel
    /// needs `H/2 − O` oxygen atoms to burn completely, and one mole of
    /// oxidizer supplies `O − H/2`. The fuel-to-oxidizer mole ratio is then
    /// `phi · supplied / needed`.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Stoichiometry`] if `phi` is negative or not
    /// finite, if the fuel needs no oxygen, or if the oxidizer supplies none.
    pub fn at_equivalence_ratio(
        phi: f64,
        fuel: &Composition,
        oxidizer: &Composition,
    ) -> Result<Self, CompositionError> {
        if !phi.is_finite() || phi < 0.0 {
            return Err(CompositionError::Stoichiometry {
                context: format!("equivalence ratio must be finite and non-negative, got {phi}"),
            });
        }

        let (fuel_h, fuel_o) = fuel.atoms_per_mole();
        let needed = 0.5 * fuel_h - fuel_o;
        if needed <= 0.0 {
            return Err(CompositionError::Stoichiometry {
                context: format!("fuel {fuel} needs no oxygen"),
            });
        }

        let (ox_h, ox_o) = oxidizer.atoms_per_mole();
        let supplied = ox_o - 0.5 * ox_h;
        if supplied <= 0.0 {
            return Err(CompositionError::Stoichiometry {
                context: format!("oxidizer {oxidizer} supplies no oxygen"),
            });
        }

        let fuel_moles = phi * supplied / needed;
        let fuel_x = fuel.mole_fractions();
        let ox_x = oxidizer.mole_fractions();

        Self::from_moles(
            Species::ALL
                .into_iter()
                .map(|sp| (sp, fuel_moles * fuel_x[sp.index()] + ox_x[sp.index()])),
        )
    }

    /// Elemental equivalence ratio, `(H/2) / O`.
    ///
    /// Counts atoms regardless of which molecule holds them, so the value is
    /// unchanged by reaction. Returns infinity for an oxygen-free mixture.
    #[must_use]
    pub fn equivalence_ratio(&self) -> f64 {
        let (h, o) = self.atoms_per_mole();
        if o == 0.0 {
            return f64::INFINITY;
        }
        0.5 * h / o
    }

    #[must_use]
    pub fn mass_fraction(&self, species: Species) -> f64 {
        self.mass_fractions[species.index()]
    }

    /// Mass fractions indexed by [`Species::index`].
    #[must_use]
    pub fn mass_fractions(&self) -> [f64; Species::COUNT] {
        self.mass_fractions
    }

    #[must_use]
    pub fn mole_fraction(&self, species: Species) -> f64 {
        self.mole_fractions()[species.index()]
    }

    /// Mole fractions indexed by [`Species::index`].
    #[must_use]
    pub fn mole_fractions(&self) -> [f64; Species::COUNT] {
        let moles = self.moles_per_kg();
        let total: f64 = moles.iter().sum();
        moles.map(|n| n / total)
    }

    /// Mean molar mass of the mixture.
    #[must_use]
    pub fn molar_mass(&self) -> MolarMass {
        MolarMass::new::<kilogram_per_mole>(self.kg_per_mol())
    }

    /// Mean molar mass in kg/mol.
    pub(crate) fn kg_per_mol(&self) -> f64 {
        1.0 / self.moles_per_kg().iter().sum::<f64>()
    }

    /// Moles of each species in one kilogram of mixture.
    pub(crate) fn moles_per_kg(&self) -> [f64; Species::COUNT] {
        std::array::from_fn(|i| self.mass_fractions[i] / Species::ALL[i].kg_per_mol())
    }

    /// Builds a composition from moles per kilogram, renormalizing.
    pub(crate) fn from_moles_per_kg(
        moles: &[f64; Species::COUNT],
    ) -> Result<Self, CompositionError> {
        Self::normalized(std::array::from_fn(|i| {
            moles[i].max(0.0) * Species::ALL[i].kg_per_mol()
        }))
    }

    /// Hydrogen and oxygen atoms per mole of mixture.
    fn atoms_per_mole(&self) -> (f64, f64) {
        self.mole_fractions()
            .into_iter()
            .zip(Species::ALL)
            .fold((0.0, 0.0), |(h, o), (x, sp)| {
                (
                    h + x * f64::from(sp.hydrogen_atoms()),
                    o + x * f64::from(sp.oxygen_atoms()),
                )
            })
    }

    fn dominant_species(&self) -> Species {
        Species::ALL
            .into_iter()
            .max_by(|a, b| self.mass_fraction(*a).total_cmp(&self.mass_fraction(*b)))
            .unwrap_or(Species::N2)
    }

    fn normalized(masses: [f64; Species::COUNT]) -> Result<Self, CompositionError> {
        let total: f64 = masses.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(CompositionError::Empty);
        }
        let composition = Self {
            mass_fractions: masses.map(|m| m / total),
        };
        debug_assert!(
            (composition.mass_fractions.iter().sum::<f64>() - 1.0).abs() < SUM_TOLERANCE,
            "mass fractions must sum to one"
        );
        Ok(composition)
    }
}

fn collect_amounts(
    amounts: impl IntoIterator<Item = (Species, f64)>,
) -> Result<[f64; Species::COUNT], CompositionError> {
    let mut collected = [0.0; Species::COUNT];
    for (species, amount) in amounts {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CompositionError::InvalidAmount { species, amount });
        }
        collected[species.index()] += amount;
    }
    Ok(collected)
}

/// Parses `"Species:amount, ..."` with amounts on a mole basis.
impl FromStr for Composition {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut amounts = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, amount) = entry
                .split_once(':')
                .ok_or_else(|| CompositionError::Malformed(entry.to_owned()))?;
            let species: Species = name.parse()?;
            let amount: f64 = amount
                .trim()
                .parse()
                .map_err(|_| CompositionError::Malformed(entry.to_owned()))?;
            amounts.push((species, amount));
        }
        Self::from_moles(amounts)
    }
}

/// Formats as mole fractions, omitting absent species.
impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (species, x) in Species::ALL.into_iter().zip(self.mole_fractions()) {
            if x <= 0.0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{species}:{x:.6}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn air() -> Composition {
        "O2:1, N2:3.76".parse().unwrap()
    }

    #[test]
    fn dry_air_is_about_23_percent_oxygen_by_mass() {
        let air = Composition::dry_air();
        assert_relative_eq!(air.mole_fraction(Species::O2), 0.2095, epsilon = 1e-12);
        assert_relative_eq!(air.mass_fraction(Species::O2), 0.2314, epsilon = 1e-3);
        assert_relative_eq!(air.molar_mass().value, 28.965e-3, max_relative = 1e-3);
    }

    #[test]
    fn parses_unnormalized_moles() {
        let mix: Composition = "H2:2, O2:1, N2:3.76".parse().unwrap();
        assert_relative_eq!(mix.mole_fraction(Species::H2), 2.0 / 6.76, epsilon = 1e-12);
        assert_relative_eq!(mix.mole_fraction(Species::H2O), 0.0);
        assert_relative_eq!(mix.mass_fractions().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_strings() {
        assert!(matches!(
            "H2=2".parse::<Composition>(),
            Err(CompositionError::Malformed(_))
        ));
        assert!(matches!(
            "H2:abc".parse::<Composition>(),
            Err(CompositionError::Malformed(_))
        ));
        assert!(matches!(
            "CO2:1".parse::<Composition>(),
            Err(CompositionError::UnknownSpecies(_))
        ));
        assert!(matches!(
            "H2:-1, O2:1".parse::<Composition>(),
            Err(CompositionError::InvalidAmount {
                species: Species::H2,
                ..
            })
        ));
        assert_eq!("N2:0".parse::<Composition>(), Err(CompositionError::Empty));
        assert_eq!("".parse::<Composition>(), Err(CompositionError::Empty));
    }

    #[test]
    fn air_molar_mass() {
        let w = air().molar_mass().get::<kilogram_per_mole>();
        assert_relative_eq!(w, 28.85e-3, max_relative = 1e-3);
    }

    #[test]
    fn stoichiometric_hydrogen_in_air() {
        let fuel = Composition::pure(Species::H2);
        let mix = Composition::at_equivalence_ratio(1.0, &fuel, &air()).unwrap();

        // One H2 per ½O2: 2 moles of H2 per 4.76 moles of air.
        assert_relative_eq!(
            mix.mole_fraction(Species::H2) / mix.mole_fraction(Species::O2),
            2.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(mix.equivalence_ratio(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn lean_mixture_round_trips_phi() {
        let fuel = Composition::pure(Species::H2);
        let mix = Composition::at_equivalence_ratio(0.17, &fuel, &air()).unwrap();
        assert_relative_eq!(mix.equivalence_ratio(), 0.17, epsilon = 1e-12);
    }

    #[test]
    fn phi_is_unchanged_by_complete_burning() {
        let fuel = Composition::pure(Species::H2);
        let reactants = Composition::at_equivalence_ratio(0.5, &fuel, &air()).unwrap();

        let mut moles = reactants.moles_per_kg();
        let burned = moles[Species::H2.index()];
        moles[Species::H2.index()] = 0.0;
        moles[Species::O2.index()] -= 0.5 * burned;
        moles[Species::H2O.index()] += burned;
        let products = Composition::from_moles_per_kg(&moles).unwrap();

        assert_relative_eq!(products.equivalence_ratio(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(products.mass_fraction(Species::H2), 0.0);
    }

    #[test]
    fn stoichiometry_errors() {
        let fuel = Composition::pure(Species::H2);
        let nitrogen = Composition::pure(Species::N2);
        assert!(matches!(
            Composition::at_equivalence_ratio(1.0, &fuel, &nitrogen),
            Err(CompositionError::Stoichiometry { .. })
        ));
        assert!(matches!(
            Composition::at_equivalence_ratio(1.0, &nitrogen, &air()),
            Err(CompositionError::Stoichiometry { .. })
        ));
        assert!(matches!(
            Composition::at_equivalence_ratio(f64::NAN, &fuel, &air()),
            Err(CompositionError::Stoichiometry { .. })
        ));
    }

    #[test]
    fn blend_is_mass_weighted() {
        let h2 = Composition::pure(Species::H2);
        let n2 = Composition::pure(Species::N2);
        let mix = Composition::blend(&[(h2, 1.0), (n2, 3.0)]).unwrap();
        assert_relative_eq!(mix.mass_fraction(Species::H2), 0.25);
        assert_relative_eq!(mix.mass_fraction(Species::N2), 0.75);

        assert_eq!(
            Composition::blend(&[(h2, 0.0)]),
            Err(CompositionError::Empty)
        );
        assert!(Composition::blend(&[(h2, -1.0)]).is_err());
    }

    #[test]
    fn display_lists_present_species() {
        let text = Composition::pure(Species::Ar).to_string();
        assert_eq!(text, "Ar:1.000000");
    }
}
