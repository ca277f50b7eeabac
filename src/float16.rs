//! IEEE 754 half-precision floating point scalar.
//!
//! [`Float16`] is a storage type: it converts to and from `f32` and otherwise only
//! carries its 16 raw bits, so it can be prepended by the builder and read by a table
//! like any other [`Scalar`].
//!
//! Conversion from `f32` truncates the mantissa. Values above the half-precision range
//! become infinity, values below the smallest normal half become zero, and NaN and
//! infinity are preserved.

use std::fmt;

use crate::io::{ElementKind, Scalar};

/// A half-precision floating point value stored on 16 bits.
///
/// # Examples
///
/// ```rust
/// use flatscope::Float16;
///
/// let half = Float16::from_f32(1.5);
/// assert_eq!(half.to_bits(), 0x3E00);
/// assert_eq!(half.to_f32(), 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Float16 {
    bits: u16,
}

impl Float16 {
    /// Creates a half-precision value from its raw bit pattern.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Float16 { bits }
    }

    /// Returns the raw bit pattern.
    #[must_use]
    pub const fn to_bits(self) -> u16 {
        self.bits
    }

    /// Converts an `f32` into the closest representable half by truncating the mantissa.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn from_f32(value: f32) -> Self {
        let bits = value.to_bits();
        let sign = ((bits >> 31) & 0x1) as u16;
        let exponent = (bits >> 23) & 0xff;
        let mut mantissa = ((bits >> 13) & 0x3ff) as u16;

        let rebased = exponent as i16 - 127 + 15;
        let half_exponent = match exponent {
            // Zero and f32 subnormals are far below the half range
            0 => {
                mantissa = 0;
                0
            }
            // Infinity and NaN keep their mantissa
            0xff => 0x1f,
            _ if rebased > 0x1e => {
                mantissa = 0;
                0x1f
            }
            _ if rebased < 0x01 => {
                mantissa = 0;
                0
            }
            _ => rebased as u16,
        };

        Float16 {
            bits: (sign << 15) | (half_exponent << 10) | mantissa,
        }
    }

    /// Converts the value back into an `f32`. The conversion is exact.
    #[must_use]
    pub fn to_f32(self) -> f32 {
        let sign = u32::from((self.bits >> 15) & 0x1);
        let exponent = (self.bits >> 10) & 0x1f;
        let mantissa = u32::from(self.bits & 0x3ff);

        match exponent {
            0 => {
                // Subnormal half: mantissa * 2^-24
                #[allow(clippy::cast_precision_loss)]
                let magnitude = mantissa as f32 * f32::from_bits(0x3380_0000);
                if sign == 1 {
                    -magnitude
                } else {
                    magnitude
                }
            }
            0x1f => f32::from_bits((sign << 31) | (0xff << 23) | (mantissa << 13)),
            _ => {
                let rebased = u32::from(exponent) + 127 - 15;
                f32::from_bits((sign << 31) | (rebased << 23) | (mantissa << 13))
            }
        }
    }

    /// Returns `true` if this value is NaN.
    #[must_use]
    pub const fn is_nan(self) -> bool {
        (self.bits & 0x7c00) == 0x7c00 && (self.bits & 0x03ff) != 0
    }
}

impl From<f32> for Float16 {
    fn from(value: f32) -> Self {
        Float16::from_f32(value)
    }
}

impl From<Float16> for f32 {
    fn from(value: Float16) -> Self {
        value.to_f32()
    }
}

impl fmt::Display for Float16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

impl Scalar for Float16 {
    const KIND: ElementKind = ElementKind::Float16;
    type Bytes = [u8; 2];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        Float16::from_bits(u16::from_le_bytes(bytes))
    }

    fn to_le_bytes(self) -> Self::Bytes {
        self.bits.to_le_bytes()
    }
}
