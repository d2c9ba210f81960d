//! Numeric ranges checked once, at construction.
//!
//! Stage parameters only make sense inside a range: efficiencies in `(0, 1]`,
//! the extinction decay factor in `(0, 1)`, volumes and residence times above
//! zero, mass flows at or above zero. [`Constrained<T, C>`] carries a value
//! together with the marker `C` of the range it was checked against, so a
//! stage holding one never re-validates it.
//!
//! | Marker                    | Range       | Used for                        |
//! |---------------------------|-------------|---------------------------------|
//! | [`NonNegative`]           | `x ≥ 0`     | mass flow rates                 |
//! | [`StrictlyPositive`]      | `x > 0`     | volumes, lengths, times         |
//! | [`UnitIntervalOpen`]      | `0 < x < 1` | continuation decay factor       |
//! | [`UnitIntervalLowerOpen`] | `0 < x ≤ 1` | isentropic efficiencies         |
//! | [`UnitIntervalUpperOpen`] | `0 ≤ x < 1` | recuperator effectiveness       |

mod non_negative;
mod strictly_positive;
mod unit_interval;

use std::{cmp::Ordering, marker::PhantomData};

use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;
pub use unit_interval::{
    UnitBounds, UnitIntervalLowerOpen, UnitIntervalOpen, UnitIntervalUpperOpen,
};

/// A range that values of `T` can be checked against.
pub trait Constraint<T> {
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] describing why `value` is out of range.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the allowed range")]
    BelowMinimum,
    #[error("value is above the allowed range")]
    AboveMaximum,
}

pub type ConstraintResult<T, E = ConstraintError> = Result<T, E>;

/// A value checked against the constraint `C`.
///
/// ```
/// use twine_microturbine::support::constraint::{Constrained, StrictlyPositive};
/// use uom::si::{f64::Time, time::second};
///
/// let tau = Constrained::<_, StrictlyPositive>::new(Time::new::<second>(0.1)).unwrap();
/// assert_eq!(tau.into_inner().get::<second>(), 0.1);
///
/// assert!(StrictlyPositive::new(Time::new::<second>(0.0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Constrained<T, C> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// # Errors
    ///
    /// Returns an error if `value` is outside the range of `C`.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }
}

impl<T, C> Constrained<T, C> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, C> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Orders `value` against `bound`; `NaN` has no order.
fn compare<T: PartialOrd>(value: &T, bound: &T) -> Result<Ordering, ConstraintError> {
    value
        .partial_cmp(bound)
        .ok_or(ConstraintError::NotANumber)
}
