//! Equilibrium of the water-formation reaction, `H2 + ½O2 ⇌ H2O`.
//!
//! At a given temperature the composition is fixed by the reaction extent
//! `ξ`, found by bisection on the law of mass action:
//!
//! ```text
//! ln n_H2O − ln n_H2 − ½·ln n_O2 + ½·ln n − ½·ln(P/P°) = ln Kp(T)
//! ```
//!
//! where `n` is the total moles. For a fixed-density mixture the pressure is
//! `ρ·Ru·T·n`, which cancels the `n` term.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;

use crate::support::thermo::{PropertyError, fluid::Species};

use super::{
    inversion::solver_error,
    nasa::{GAS_CONSTANT, REFERENCE_PRESSURE, polynomial},
};

const H2: usize = Species::H2.index();
const O2: usize = Species::O2.index();
const H2O: usize = Species::H2O.index();

/// Floor for mole amounts inside logarithms.
const TINY: f64 = 1e-300;

/// What holds the mixture together while it reacts.
#[derive(Debug, Clone, Copy)]
pub(super) enum Confinement {
    /// Fixed pressure, Pa.
    Pressure(f64),
    /// Fixed density, kg/m³.
    Density(f64),
}

/// `ln Kp` for the formation of one mole of water vapor.
pub(super) fn ln_kp(t: f64) -> f64 {
    let g = |sp: Species| polynomial(sp).g_rt(t);
    -(g(Species::H2O) - g(Species::H2) - 0.5 * g(Species::O2))
}

/// Moles per kilogram after reaction extent `ξ`.
struct Extent {
    initial: [f64; Species::COUNT],
}

impl Model for Extent {
    type Input = f64;
    type Output = [f64; Species::COUNT];
    type Error = Infallible;

    fn call(&self, extent: &f64) -> Result<Self::Output, Infallible> {
        let mut moles = self.initial;
        moles[H2] -= extent;
        moles[O2] -= 0.5 * extent;
        moles[H2O] += extent;
        Ok(moles)
    }
}

struct MassAction {
    temperature: f64,
    ln_kp: f64,
    confinement: Confinement,
}

impl EquationProblem<1> for MassAction {
    type Input = f64;
    type Output = [f64; Species::COUNT];
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, Infallible> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _extent: &f64,
        moles: &[f64; Species::COUNT],
    ) -> Result<[f64; 1], Infallible> {
        let ln = |n: f64| n.max(TINY).ln();
        let quotient = ln(moles[H2O]) - ln(moles[H2]) - 0.5 * ln(moles[O2]) - self.ln_kp;

        let residual = match self.confinement {
            Confinement::Pressure(p) => {
                let total: f64 = moles.iter().sum();
                quotient + 0.5 * ln(total) - 0.5 * (p / REFERENCE_PRESSURE).ln()
            }
            Confinement::Density(rho) => {
                quotient - 0.5 * (rho * GAS_CONSTANT * self.temperature / REFERENCE_PRESSURE).ln()
            }
        };
        Ok([residual])
    }
}

/// Equilibrium moles per kilogram at temperature `t`, starting from `initial`.
///
/// Mixtures that cannot react (no water and missing either reactant) are
/// returned unchanged.
///
/// # Errors
///
/// Returns [`PropertyError::NotConverged`] if the extent does not converge.
pub(super) fn equilibrium_moles(
    initial: &[f64; Species::COUNT],
    t: f64,
    confinement: Confinement,
) -> Result<[f64; Species::COUNT], PropertyError> {
    let lowest = -initial[H2O];
    let highest = initial[H2].min(2.0 * initial[O2]);
    if highest - lowest <= 0.0 {
        return Ok(*initial);
    }

    let scale: f64 = initial.iter().sum();
    let config = bisection::Config {
        max_iters: 200,
        x_abs_tol: 1e-14 * scale,
        x_rel_tol: 0.0,
        residual_tol: 1e-12,
    };

    let problem = MassAction {
        temperature: t,
        ln_kp: ln_kp(t),
        confinement,
    };

    let solution = bisection::solve(
        &Extent { initial: *initial },
        &problem,
        [lowest, highest],
        &config,
        (),
    )
    .map_err(|err| solver_error("equilibrium extent", err))?;

    if solution.status != bisection::Status::Converged {
        return Err(PropertyError::NotConverged {
            context: format!(
                "equilibrium extent at {t} K: residual {:e} after {} iterations",
                solution.residual, solution.iters
            ),
        });
    }

    Ok(solution.snapshot.output.map(|n| n.max(0.0)))
}
