use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError, compare};

/// Greater than zero.
///
/// Reactor volumes, plug-flow lengths and areas, and residence times.
///
/// ```
/// use twine_microturbine::support::constraint::StrictlyPositive;
/// use uom::si::{f64::Volume, volume::cubic_meter};
///
/// let v = StrictlyPositive::new(Volume::new::<cubic_meter>(2.0e-4)).unwrap();
/// assert_eq!(v.into_inner().get::<cubic_meter>(), 2.0e-4);
///
/// assert!(StrictlyPositive::new(0.0).is_err());
/// assert!(StrictlyPositive::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// # Errors
    ///
    /// Returns an error if `value` is zero, negative, or `NaN`.
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match compare(value, &T::zero())? {
            Ordering::Greater => Ok(()),
            Ordering::Equal => Err(ConstraintError::Zero),
            Ordering::Less => Err(ConstraintError::Negative),
        }
    }
}
