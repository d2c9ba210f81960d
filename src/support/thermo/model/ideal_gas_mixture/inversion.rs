//! Temperature inversions by bisection.
//!
//! Every mixture property used as a state input (enthalpy, entropy, internal
//! energy) rises monotonically with temperature at fixed composition, so a
//! bracketed bisection on temperature always finds the state.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;

use crate::support::thermo::PropertyError;

/// A property as a function of temperature, in kelvin.
struct PropertyCurve<F> {
    eval: F,
}

impl<F> Model for PropertyCurve<F>
where
    F: Fn(f64) -> Result<f64, PropertyError>,
{
    type Input = f64;
    type Output = f64;
    type Error = PropertyError;

    fn call(&self, temperature: &f64) -> Result<f64, PropertyError> {
        (self.eval)(*temperature)
    }
}

/// Residual `property(T) − target`.
struct Target(f64);

impl EquationProblem<1> for Target {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, Infallible> {
        Ok(x[0])
    }

    fn residuals(&self, _input: &f64, output: &f64) -> Result<[f64; 1], Infallible> {
        Ok([output - self.0])
    }
}

/// Finds the temperature in `bracket` at which `eval` returns `target`.
///
/// # Errors
///
/// Returns [`PropertyError::OutOfDomain`] if the target is not bracketed,
/// [`PropertyError::NotConverged`] if the iteration limit is reached, or the
/// error raised by `eval`.
pub(super) fn solve_temperature(
    what: &str,
    target: f64,
    bracket: [f64; 2],
    config: &bisection::Config,
    eval: impl Fn(f64) -> Result<f64, PropertyError>,
) -> Result<f64, PropertyError> {
    let solution = bisection::solve(&PropertyCurve { eval }, &Target(target), bracket, config, ())
        .map_err(|err| solver_error(what, err))?;

    if solution.status != bisection::Status::Converged {
        return Err(PropertyError::NotConverged {
            context: format!(
                "{what}: residual {:e} after {} iterations",
                solution.residual, solution.iters
            ),
        });
    }

    Ok(solution.snapshot.input)
}

/// Unwraps property errors raised inside the model; anything else means the
/// target lies outside the bracket.
pub(super) fn solver_error(what: &str, err: bisection::Error) -> PropertyError {
    match err {
        bisection::Error::Model(source) => match source.downcast::<PropertyError>() {
            Ok(err) => *err,
            Err(other) => PropertyError::Calculation {
                context: format!("{what}: {other}"),
            },
        },
        other => PropertyError::OutOfDomain {
            context: format!("{what}: {other}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn config() -> bisection::Config {
        bisection::Config {
            max_iters: 100,
            x_abs_tol: 1e-10,
            x_rel_tol: 0.0,
            residual_tol: 1e-12,
        }
    }

    #[test]
    fn inverts_a_monotonic_curve() {
        let t = solve_temperature("cubic", 1.0e9, [200.0, 5000.0], &config(), |t| Ok(t * t * t))
            .unwrap();
        assert_relative_eq!(t, 1_000.0, epsilon = 1e-8);

        let t = solve_temperature("linear", 1_500.0 * 1_000.0, [200.0, 5000.0], &config(), |t| {
            Ok(1_000.0 * t)
        })
        .unwrap();
        assert_relative_eq!(t, 1_500.0, epsilon = 1e-8);
    }

    #[test]
    fn unbracketed_target_is_out_of_domain() {
        let err = solve_temperature("linear", -1.0, [200.0, 5000.0], &config(), |t| Ok(t))
            .unwrap_err();
        assert!(matches!(err, PropertyError::OutOfDomain { .. }));
    }

    #[test]
    fn property_errors_pass_through() {
        let err = solve_temperature("failing", 1.0, [200.0, 5000.0], &config(), |_| {
            Err(PropertyError::Undefined {
                context: "no data".into(),
            })
        })
        .unwrap_err();
        assert_eq!(
            err,
            PropertyError::Undefined {
                context: "no data".into()
            }
        );
    }
}
