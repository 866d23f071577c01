use std::ops::RangeInclusive;

use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ReviewValue(i32);

impl ReviewValue {
    pub const RANGE: RangeInclusive<i32> = 0..=5;

    pub fn new(value: impl Into<i32>) -> Self {
        Self(value.into())
    }

    pub fn try_new(value: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let value = value.into();
        if !Self::RANGE.contains(&value) {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "review value {value} is outside {:?}",
                Self::RANGE
            )));
        }
        Ok(Self(value))
    }
}

impl Default for ReviewValue {
    fn default() -> Self {
        Self(1)
    }
}

#[cfg(test)]
mod test {
    use crate::entity::ReviewValue;

    #[test]
    fn bounds_are_inclusive() {
        assert!(ReviewValue::try_new(0).is_ok());
        assert!(ReviewValue::try_new(5).is_ok());
        assert!(ReviewValue::try_new(-1).is_err());
        assert!(ReviewValue::try_new(6).is_err());
    }
}
