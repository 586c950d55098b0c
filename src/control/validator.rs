use super::ControlValue;
use crate::error::{Error, Result};

/// Checks a candidate before it is formatted into a set command.
pub trait Validator<T> {
    fn validate(&self, value: T) -> Result<T>;
}

/// Accept `min <= value <= max`, both bounds inclusive. NaN is always rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrictRange<T> {
    pub min: T,
    pub max: T,
}

impl<T> StrictRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: ControlValue + PartialOrd> Validator<T> for StrictRange<T> {
    fn validate(&self, value: T) -> Result<T> {
        if self.min <= value && value <= self.max {
            Ok(value)
        } else {
            Err(Error::RangeError {
                value: value.to_arg().to_string(),
                min: self.min.to_arg().to_string(),
                max: self.max.to_arg().to_string(),
            })
        }
    }
}

/// Accept only members of a fixed set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrictDiscreteSet<T: 'static> {
    pub values: &'static [T],
}

impl<T> StrictDiscreteSet<T> {
    pub const fn new(values: &'static [T]) -> Self {
        Self { values }
    }
}

impl<T: ControlValue + PartialEq> Validator<T> for StrictDiscreteSet<T> {
    fn validate(&self, value: T) -> Result<T> {
        if self.values.contains(&value) {
            Ok(value)
        } else {
            Err(Error::InvalidChoiceError {
                value: value.to_arg().to_string(),
                allowed: self.values.iter().map(|v| v.to_arg().to_string()).collect(),
            })
        }
    }
}

/// Pass every value through; the device is left to reject what it does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unchecked;

impl<T> Validator<T> for Unchecked {
    fn validate(&self, value: T) -> Result<T> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        let range = StrictRange::new(50e-9, 2250e-9);
        assert_eq!(range.validate(50e-9).unwrap(), 50e-9);
        assert_eq!(range.validate(2250e-9).unwrap(), 2250e-9);
        match range.validate(3000e-9) {
            Err(Error::RangeError { value, min, max }) => {
                assert_eq!(value, "3e-06");
                assert_eq!(min, "5e-08");
                assert_eq!(max, "2.25e-06");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(range.validate(f64::NAN).is_err());
    }

    #[test]
    fn integer_range() {
        let range = StrictRange::new(0i64, 12);
        assert!(range.validate(12).is_ok());
        assert!(range.validate(-1).is_err());
        assert!(range.validate(13).is_err());
    }

    #[test]
    fn discrete_set_lists_allowed_values() {
        let set = StrictDiscreteSet::new(&[0.02e-9, 0.05e-9, 0.1e-9]);
        assert!(set.validate(0.05e-9).is_ok());
        match set.validate(0.07e-9) {
            Err(Error::InvalidChoiceError { value, allowed }) => {
                assert_eq!(value, "7e-11");
                assert_eq!(allowed, ["2e-11", "5e-11", "1e-10"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unchecked_passes_everything() {
        assert_eq!(Unchecked.validate(-1e300).unwrap(), -1e300);
    }
}
