//! Ranges between zero and one.

use std::cmp::Ordering;

use uom::si::{f64::Ratio, ratio::ratio};

use super::{Constrained, Constraint, ConstraintError, compare};

/// Numeric types with a zero and a one to bound the interval.
pub trait UnitBounds: PartialOrd {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
}

impl UnitBounds for Ratio {
    fn zero() -> Self {
        Ratio::new::<ratio>(0.0)
    }
    fn one() -> Self {
        Ratio::new::<ratio>(1.0)
    }
}

/// `0 < x < 1`.
///
/// The extinction sweep shrinks the residence time by a factor in this range
/// on every step.
///
/// ```
/// use twine_microturbine::support::constraint::UnitIntervalOpen;
///
/// assert_eq!(UnitIntervalOpen::new(0.9).unwrap().into_inner(), 0.9);
/// assert!(UnitIntervalOpen::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitIntervalOpen;

impl UnitIntervalOpen {
    /// # Errors
    ///
    /// Returns [`ConstraintError::BelowMinimum`] at or below zero,
    /// [`ConstraintError::AboveMaximum`] at or above one, and
    /// [`ConstraintError::NotANumber`] for `NaN`.
    pub fn new<T: UnitBounds>(
        value: T,
    ) -> Result<Constrained<T, UnitIntervalOpen>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for UnitIntervalOpen {
    fn check(value: &T) -> Result<(), ConstraintError> {
        if compare(value, &T::zero())?.is_le() {
            return Err(ConstraintError::BelowMinimum);
        }
        if compare(value, &T::one())?.is_ge() {
            return Err(ConstraintError::AboveMaximum);
        }
        Ok(())
    }
}

/// `0 < x ≤ 1`.
///
/// Isentropic efficiencies: one is the ideal machine, zero would make the
/// actual work unbounded.
///
/// ```
/// use twine_microturbine::support::constraint::UnitIntervalLowerOpen;
/// use uom::si::{f64::Ratio, ratio::ratio};
///
/// assert!(UnitIntervalLowerOpen::new(Ratio::new::<ratio>(1.0)).is_ok());
/// assert!(UnitIntervalLowerOpen::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitIntervalLowerOpen;

impl UnitIntervalLowerOpen {
    /// # Errors
    ///
    /// Returns [`ConstraintError::BelowMinimum`] at or below zero,
    /// [`ConstraintError::AboveMaximum`] above one, and
    /// [`ConstraintError::NotANumber`] for `NaN`.
    pub fn new<T: UnitBounds>(
        value: T,
    ) -> Result<Constrained<T, UnitIntervalLowerOpen>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for UnitIntervalLowerOpen {
    fn check(value: &T) -> Result<(), ConstraintError> {
        if compare(value, &T::zero())?.is_le() {
            return Err(ConstraintError::BelowMinimum);
        }
        if compare(value, &T::one())? == Ordering::Greater {
            return Err(ConstraintError::AboveMaximum);
        }
        Ok(())
    }
}

/// `0 ≤ x < 1`.
///
/// Recuperator effectiveness: zero disables the recuperator, and one would
/// need an infinite exchanger.
///
/// ```
/// use twine_microturbine::support::constraint::UnitIntervalUpperOpen;
///
/// assert!(UnitIntervalUpperOpen::new(0.0).is_ok());
/// assert!(UnitIntervalUpperOpen::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitIntervalUpperOpen;

impl UnitIntervalUpperOpen {
    /// # Errors
    ///
    /// Returns [`ConstraintError::BelowMinimum`] below zero,
    /// [`ConstraintError::AboveMaximum`] at or above one, and
    /// [`ConstraintError::NotANumber`] for `NaN`.
    pub fn new<T: UnitBounds>(
        value: T,
    ) -> Result<Constrained<T, UnitIntervalUpperOpen>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for UnitIntervalUpperOpen {
    fn check(value: &T) -> Result<(), ConstraintError> {
        if compare(value, &T::zero())? == Ordering::Less {
            return Err(ConstraintError::BelowMinimum);
        }
        if compare(value, &T::one())?.is_ge() {
            return Err(ConstraintError::AboveMaximum);
        }
        Ok(())
    }
}
