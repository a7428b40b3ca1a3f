//! Checked conversions between sensor coordinate types and pixel indices

use crate::{Error, Result};

/// Safely convert usize to i32 with overflow checking
///
/// # Errors
///
/// Returns an error if the value exceeds i32::MAX
pub fn usize_to_i32(value: usize) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Value {value} too large to fit in i32")))
}

/// Safely convert f32 to i32, truncating toward zero
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_precision_loss)] // MIN/MAX bounds checking is approximate
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
pub fn f32_to_i32(value: f32) -> Result<i32> {
    if value.is_finite() && value >= i32::MIN as f32 && value <= i32::MAX as f32 {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i32"
        )))
    }
}

/// Convert a non-negative pixel coordinate into a buffer offset
///
/// Negative values map to `None`.
#[must_use]
pub fn i32_to_usize(value: i32) -> Option<usize> {
    usize::try_from(value).ok()
}

/// Convert a count into f32 for normalization
#[must_use]
#[allow(clippy::cast_precision_loss)] // Pixel counts stay far below 2^24
pub fn i32_to_f32(value: i32) -> f32 {
    value as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_usize_to_i32() {
        assert_eq!(usize_to_i32(42).unwrap(), 42);
        assert_eq!(usize_to_i32(0).unwrap(), 0);
        assert_eq!(usize_to_i32(i32::MAX as usize).unwrap(), i32::MAX);

        if std::mem::size_of::<usize>() > 4 {
            assert!(usize_to_i32(i32::MAX as usize + 1).is_err());
        }
    }

    #[test]
    fn test_f32_to_i32_truncates() {
        assert_eq!(f32_to_i32(110.9).unwrap(), 110);
        assert_eq!(f32_to_i32(-0.9).unwrap(), 0);
        assert_eq!(f32_to_i32(-3.5).unwrap(), -3);
    }

    #[test]
    fn test_f32_to_i32_rejects_non_finite() {
        assert!(f32_to_i32(f32::INFINITY).is_err());
        assert!(f32_to_i32(f32::NEG_INFINITY).is_err());
        assert!(f32_to_i32(f32::NAN).is_err());
        assert!(f32_to_i32(i32::MAX as f32 * 2.0).is_err());
    }

    #[test]
    fn test_i32_to_usize() {
        assert_eq!(i32_to_usize(7), Some(7));
        assert_eq!(i32_to_usize(0), Some(0));
        assert_eq!(i32_to_usize(-1), None);
    }

    proptest! {
        #[test]
        fn prop_usize_to_i32_within_bounds(value in 0..=i32::MAX as usize) {
            let result = usize_to_i32(value);
            prop_assert!(result.is_ok());
            prop_assert_eq!(result.unwrap() as usize, value);
        }

        #[test]
        fn prop_pixel_coordinates_round_trip(value in -2048i32..2048) {
            let converted = f32_to_i32(i32_to_f32(value)).unwrap();
            prop_assert_eq!(converted, value);
        }
    }
}
