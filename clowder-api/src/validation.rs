//! Request-shape validation
//!
//! Small traits the handlers call on incoming fields before anything is
//! written. Each failure maps to a 422 via the matching `ErrorCode`, and
//! the field name travels in the message so clients can point at the
//! offending input.

use crate::error::{ApiError, ApiResult};

/// Rejects empty and whitespace-only strings.
pub trait ValidateNonEmpty {
    /// Fails with `MissingField` naming `field_name` when blank.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.trim().is_empty() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

/// An absent optional field counts as missing.
impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ApiError::missing_field(field_name)),
        }
    }
}

/// Bounds string length, counted in characters rather than bytes so
/// multi-byte names are not penalized.
pub trait ValidateLength {
    /// Fails with `InvalidRange` outside the inclusive `min..=max` bound.
    fn validate_length(&self, field_name: &str, min: usize, max: usize) -> ApiResult<()>;
}

impl ValidateLength for str {
    fn validate_length(&self, field_name: &str, min: usize, max: usize) -> ApiResult<()> {
        let len = self.chars().count();
        if len < min || len > max {
            return Err(ApiError::invalid_range(field_name, min, max));
        }
        Ok(())
    }
}

impl ValidateLength for String {
    fn validate_length(&self, field_name: &str, min: usize, max: usize) -> ApiResult<()> {
        self.as_str().validate_length(field_name, min, max)
    }
}

/// Numeric bounds for the handful of numeric request fields.
pub trait ValidateRange {
    /// Fails with `InvalidRange` when negative.
    fn validate_non_negative(&self, field_name: &str) -> ApiResult<()>;

    /// Fails with `InvalidRange` outside the inclusive `min..=max` bound.
    fn validate_range(&self, field_name: &str, min: Self, max: Self) -> ApiResult<()>
    where
        Self: Sized;
}

macro_rules! impl_validate_range {
    ($($t:ty),*) => {
        $(
            impl ValidateRange for $t {
                fn validate_non_negative(&self, field_name: &str) -> ApiResult<()> {
                    if *self < 0 as $t {
                        return Err(ApiError::invalid_range(field_name, 0, <$t>::MAX));
                    }
                    Ok(())
                }

                fn validate_range(&self, field_name: &str, min: Self, max: Self) -> ApiResult<()> {
                    if *self < min || *self > max {
                        return Err(ApiError::invalid_range(field_name, min, max));
                    }
                    Ok(())
                }
            }
        )*
    };
}

impl_validate_range!(i32, i64, f64);
