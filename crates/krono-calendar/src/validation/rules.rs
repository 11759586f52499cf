use crate::error::ValidationError;

/// Inclusive integer range of a schedule field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    pub min: i64,
    pub max: Option<i64>,
}

impl FieldRange {
    pub const POSITIVE: Self = Self::at_least(1);
    pub const MONTH: Self = Self::between(1, 12);
    pub const DAY: Self = Self::between(1, 31);
    pub const WEEKDAY: Self = Self::between(0, 6);
    pub const HOUR: Self = Self::between(0, 23);
    pub const MINUTE: Self = Self::between(0, 59);
    pub const SECOND: Self = Self::between(0, 59);

    const fn at_least(min: i64) -> Self {
        Self { min, max: None }
    }

    const fn between(min: i64, max: i64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// ## Summary
    /// Checks `value` against the range and narrows it to `u32`.
    ///
    /// ## Errors
    /// Returns a validation error at `path` when out of range.
    pub fn check(self, value: i64, path: &[&str]) -> Result<u32, ValidationError> {
        if value < self.min {
            return Err(ValidationError::new(
                path.iter().copied(),
                format!("value must be at least {}", self.min),
            ));
        }
        if let Some(max) = self.max.filter(|max| value > *max) {
            return Err(ValidationError::new(
                path.iter().copied(),
                format!("value must be at most {max}"),
            ));
        }
        u32::try_from(value).map_err(|_err| {
            ValidationError::new(path.iter().copied(), "value is too large")
        })
    }
}
