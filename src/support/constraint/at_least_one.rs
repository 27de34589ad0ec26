use num_traits::One;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is greater than or equal to one.
///
/// Used for dimensionless ratios such as an outer-to-inner diameter ratio,
/// where a value below one would describe a negative wall thickness.
///
/// # Examples
///
/// ```
/// use twine_district_heating::support::constraint::AtLeastOne;
///
/// assert!(AtLeastOne::new(1.0).is_ok());
/// assert!(AtLeastOne::new(1.8).is_ok());
/// assert!(AtLeastOne::new(0.9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AtLeastOne;

impl AtLeastOne {
    /// Constructs a [`Constrained<T, AtLeastOne>`] if the value is at least one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is below one or not a number (`NaN`).
    pub fn new<T: PartialOrd + One>(value: T) -> Result<Constrained<T, AtLeastOne>, ConstraintError> {
        Constrained::<T, AtLeastOne>::new(value)
    }
}

impl<T: PartialOrd + One> Constraint<T> for AtLeastOne {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::one()) {
            Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal) => Ok(()),
            Some(std::cmp::Ordering::Less) => Err(ConstraintError::BelowMinimum),
            None => Err(ConstraintError::NotANumber),
        }
    }
}
