use uom::si::{
    f64::MolarEnergy,
    molar_energy::{joule_per_mole, kilojoule_per_mole},
};

use crate::support::thermo::fluid::Species;

use super::nasa::GAS_CONSTANT;

/// Global one-step hydrogen oxidation, `H2 + ½O2 → H2O`.
///
/// The molar rate of progress is
///
/// ```text
/// q = A·T^b·exp(−Ea / (Ru·T))·[H2]^a·[O2]^c
/// ```
///
/// with concentrations in mol/m³. The reaction is irreversible, so a stirred
/// reactor run to long residence time approaches complete burning rather
/// than the dissociated equilibrium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalRate {
    /// Pre-exponential factor `A`, in SI units consistent with the orders.
    pub pre_exponential: f64,
    /// Temperature exponent `b`.
    pub temperature_exponent: f64,
    pub activation_energy: MolarEnergy,
    /// Reaction order `a` in hydrogen.
    pub fuel_order: f64,
    /// Reaction order `c` in oxygen.
    pub oxygen_order: f64,
}

impl Default for GlobalRate {
    /// Marinov's single-step hydrogen rate: `A = 1.8e10 (m³/mol)^½/s`,
    /// `Ea = 146.44 kJ/mol`, first order in H2 and half order in O2.
    fn default() -> Self {
        Self {
            pre_exponential: 1.8e10,
            temperature_exponent: 0.0,
            activation_energy: MolarEnergy::new::<kilojoule_per_mole>(146.44),
            fuel_order: 1.0,
            oxygen_order: 0.5,
        }
    }
}

impl GlobalRate {
    /// Rate of progress, mol/(m³·s), at temperature `t` (K) and density
    /// `rho` (kg/m³) for the given mass fractions.
    pub(super) fn progress(&self, t: f64, rho: f64, mass_fractions: &[f64; Species::COUNT]) -> f64 {
        let concentration =
            |sp: Species| (rho * mass_fractions[sp.index()] / sp.kg_per_mol()).max(0.0);

        let ea = self.activation_energy.get::<joule_per_mole>();
        let k = self.pre_exponential
            * t.powf(self.temperature_exponent)
            * (-ea / (GAS_CONSTANT * t)).exp();

        k * concentration(Species::H2).powf(self.fuel_order)
            * concentration(Species::O2).powf(self.oxygen_order)
    }

    /// Net mass production rate of each species, kg/(m³·s).
    pub(super) fn production(&self, progress: f64) -> [f64; Species::COUNT] {
        let mut rates = [0.0; Species::COUNT];
        rates[Species::H2.index()] = -progress * Species::H2.kg_per_mol();
        rates[Species::O2.index()] = -0.5 * progress * Species::O2.kg_per_mol();
        rates[Species::H2O.index()] = progress * Species::H2O.kg_per_mol();
        rates
    }
}
