//! Fixed-point decimal handling.
//!
//! [`DecimalSpec`] validates the source width/scale pair once, at type
//! conversion time. [`Numeric`] is the target-side value: an arbitrary
//! precision unscaled integer plus a scale, wide enough for every source
//! integer kind up to `UHUGEINT`.

use std::fmt;

use num_bigint::BigInt;
use num_traits::Signed;

use crate::Result;

/// Widest decimal the source engine produces.
pub const MAX_DECIMAL_WIDTH: u8 = 38;

/// Validated decimal width and scale.
///
/// Ensures `1 <= width <= 38` and `scale <= width` at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalSpec {
    width: u8,
    scale: u8,
}

impl DecimalSpec {
    /// Create a new decimal specification.
    ///
    /// # Errors
    ///
    /// Returns an error if width or scale are invalid.
    pub const fn new(width: u8, scale: u8) -> Result<Self> {
        if width == 0 || width > MAX_DECIMAL_WIDTH || scale > width {
            return Err(crate::ConversionError::invalid_decimal(width, scale));
        }
        Ok(Self { width, scale })
    }

    /// Returns the total number of digits.
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Returns the number of digits after the decimal point.
    #[must_use]
    pub const fn scale(&self) -> u8 {
        self.scale
    }
}

impl fmt::Display for DecimalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DECIMAL({},{})", self.width, self.scale)
    }
}

/// Arbitrary precision fixed-point number.
///
/// The value is `unscaled * 10^-scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Numeric {
    unscaled: BigInt,
    scale: u8,
}

impl Numeric {
    /// Create a numeric from an unscaled integer and a scale.
    #[must_use]
    pub fn new(unscaled: impl Into<BigInt>, scale: u8) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    /// Create an integral numeric.
    #[must_use]
    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self::new(value, 0)
    }

    /// Returns the unscaled integer.
    #[must_use]
    pub const fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Returns the scale.
    #[must_use]
    pub const fn scale(&self) -> u8 {
        self.scale
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.abs().to_string();
        let scale = usize::from(self.scale);
        if self.unscaled.is_negative() {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{int_part}.{frac_part}")
        } else {
            write!(f, "0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_spec_valid() {
        let spec = DecimalSpec::new(18, 2).unwrap();
        assert_eq!(spec.width(), 18);
        assert_eq!(spec.scale(), 2);
        assert_eq!(spec.to_string(), "DECIMAL(18,2)");
    }

    #[test]
    fn test_decimal_spec_invalid_width() {
        assert!(DecimalSpec::new(0, 0).is_err());
        assert!(DecimalSpec::new(39, 0).unwrap_err().is_invalid_decimal());
    }

    #[test]
    fn test_decimal_spec_invalid_scale() {
        assert!(DecimalSpec::new(10, 11).is_err());
        assert!(DecimalSpec::new(10, 10).is_ok());
    }

    #[test]
    fn test_numeric_display() {
        assert_eq!(Numeric::new(12345, 2).to_string(), "123.45");
        assert_eq!(Numeric::new(-12345, 2).to_string(), "-123.45");
        assert_eq!(Numeric::new(5, 3).to_string(), "0.005");
        assert_eq!(Numeric::new(-5, 3).to_string(), "-0.005");
        assert_eq!(Numeric::new(0, 2).to_string(), "0.00");
        assert_eq!(Numeric::from_integer(42).to_string(), "42");
    }

    #[test]
    fn test_numeric_wide_values() {
        let max = Numeric::from_integer(u128::MAX);
        assert_eq!(max.to_string(), u128::MAX.to_string());
        let min = Numeric::from_integer(i128::MIN);
        assert_eq!(min.to_string(), i128::MIN.to_string());
    }
}
