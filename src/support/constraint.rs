//! Type-level numeric constraints checked once at construction.
//!
//! Physical inputs to the precalculation (diameters, roughness, pressure
//! loss budgets, conductivities) are only meaningful in a restricted range.
//! Wrapping them in [`Constrained<T, C>`] moves the check to the boundary
//! where a record is built, so the formulas downstream never see a value
//! that would divide by zero or take the logarithm of a negative number.
//!
//! # Provided constraints
//!
//! - [`StrictlyPositive`]: Greater than zero
//! - [`AtLeastOne`]: Greater than or equal to one (dimensionless ratios)
//!
//! Custom invariants can be added by implementing [`Constraint<T>`] for a
//! zero-sized marker type.

mod at_least_one;
mod strictly_positive;

use std::marker::PhantomData;

use thiserror::Error;

pub use at_least_one::AtLeastOne;
pub use strictly_positive::StrictlyPositive;

/// A trait for enforcing numeric invariants at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the minimum allowed")]
    BelowMinimum,
}

/// A result type alias to use with [`Constraint`].
pub type ConstraintResult<T, E = ConstraintError> = Result<T, E>;

/// A wrapper enforcing a numeric constraint at construction time.
///
/// # Example
///
/// ```
/// use twine_district_heating::support::constraint::{Constrained, StrictlyPositive};
/// use uom::si::{f64::Length, length::millimeter};
///
/// let roughness = Constrained::<_, StrictlyPositive>::new(Length::new::<millimeter>(0.05)).unwrap();
/// assert!(roughness.into_inner() > Length::new::<millimeter>(0.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Wraps a value that is known to satisfy the constraint.
    ///
    /// Intended for built-in constants. The constraint is checked in debug builds.
    pub(crate) fn new_unchecked(value: T) -> Self {
        debug_assert!(C::check(&value).is_ok(), "constant violates its constraint");
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, C: Constraint<T>> Constrained<T, C> {
    /// Returns a copy of the inner value.
    pub fn get(&self) -> T {
        self.value
    }
}

/// Returns a reference to the inner unconstrained value.
impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize, C: Constraint<T>> serde::Serialize for Constrained<T, C> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Deserializes the inner value and then checks the constraint.
#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>, C: Constraint<T>> serde::Deserialize<'de>
    for Constrained<T, C>
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = T::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
