use std::{fmt, str::FromStr};

use uom::si::{f64::MolarMass, molar_mass::kilogram_per_mole};

use super::CompositionError;

/// A chemical species tracked by [`Composition`](super::Composition).
///
/// The set covers hydrogen combustion in air: the fuel, the oxidizer, the
/// product, and the two inert diluents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    H2,
    O2,
    H2O,
    N2,
    Ar,
}

impl Species {
    pub const COUNT: usize = 5;

    /// Every species, in [`index`](Species::index) order.
    pub const ALL: [Species; Self::COUNT] = [
        Species::H2,
        Species::O2,
        Species::H2O,
        Species::N2,
        Species::Ar,
    ];

    /// Position of this species in per-species arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The conventional chemical formula, as accepted by [`Species::from_str`].
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Species::H2 => "H2",
            Species::O2 => "O2",
            Species::H2O => "H2O",
            Species::N2 => "N2",
            Species::Ar => "Ar",
        }
    }

    #[must_use]
    pub fn molar_mass(self) -> MolarMass {
        MolarMass::new::<kilogram_per_mole>(self.kg_per_mol())
    }

    /// Molar mass in kg/mol.
    ///
    /// Values are chosen so that `H2 + ½O2 → H2O` conserves mass exactly.
    pub(crate) const fn kg_per_mol(self) -> f64 {
        match self {
            Species::H2 => 2.016e-3,
            Species::O2 => 31.998e-3,
            Species::H2O => 18.015e-3,
            Species::N2 => 28.014e-3,
            Species::Ar => 39.948e-3,
        }
    }

    /// Hydrogen atoms per molecule.
    #[must_use]
    pub const fn hydrogen_atoms(self) -> u8 {
        match self {
            Species::H2 | Species::H2O => 2,
            Species::O2 | Species::N2 | Species::Ar => 0,
        }
    }

    /// Oxygen atoms per molecule.
    #[must_use]
    pub const fn oxygen_atoms(self) -> u8 {
        match self {
            Species::O2 => 2,
            Species::H2O => 1,
            Species::H2 | Species::N2 | Species::Ar => 0,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Species {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CompositionError::UnknownSpecies(s.trim().to_owned()))
    }
}
