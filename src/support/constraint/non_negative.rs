use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError, compare};

/// Zero or greater.
///
/// Stream mass flow rates carry this constraint: a stream with no flow is
/// representable, reverse flow is not.
///
/// ```
/// use twine_microturbine::support::constraint::NonNegative;
/// use uom::si::{f64::MassRate, mass_rate::kilogram_per_second};
///
/// let fuel = NonNegative::new(MassRate::new::<kilogram_per_second>(0.097e-3)).unwrap();
/// assert_eq!(fuel.into_inner().get::<kilogram_per_second>(), 0.097e-3);
///
/// assert!(NonNegative::new(0.0).is_ok());
/// assert!(NonNegative::new(-7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonNegative;

impl NonNegative {
    /// # Errors
    ///
    /// Returns an error if `value` is negative or `NaN`.
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        if compare(value, &T::zero())?.is_lt() {
            return Err(ConstraintError::Negative);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::MassRate, mass_rate::kilogram_per_second};

    fn kg_s(value: f64) -> MassRate {
        MassRate::new::<kilogram_per_second>(value)
    }

    #[test]
    fn zero_flow_is_allowed() {
        assert!(NonNegative::new(kg_s(0.0)).is_ok());
        assert!(NonNegative::new(kg_s(-0.0)).is_ok());
    }

    #[test]
    fn reverse_flow_is_rejected() {
        assert_eq!(NonNegative::new(kg_s(-1e-6)), Err(ConstraintError::Negative));
        assert_eq!(NonNegative::new(f64::NAN), Err(ConstraintError::NotANumber));
    }
}
