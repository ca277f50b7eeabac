//! Little-endian placement primitives for buffer encoding and decoding.
//!
//! This module provides the fixed-width value encoding every other layer is composed
//! from. Values are always stored little-endian, independent of the host byte order,
//! so a finished buffer can be shared across platforms byte for byte.
//!
//! # Architecture
//!
//! The module is built around the [`crate::io::Scalar`] trait, which describes a value
//! with a fixed on-wire width. Two families of functions operate on it:
//!
//! - **Unchecked** - [`crate::io::read_scalar`] and [`crate::io::write_scalar`] index the
//!   slice directly. They back the builder's `place` operation and the hot
//!   [`crate::Table`] read path, which trust their offsets by contract. The only guard is
//!   the slice bounds check of the language, which panics.
//! - **Checked** - [`crate::io::read_le`], [`crate::io::read_le_at`],
//!   [`crate::io::write_le`] and [`crate::io::write_le_at`] return
//!   [`crate::Error::OutOfBounds`] instead. They back the [`crate::Verifier`].
//!
//! # Supported Types
//!
//! The [`crate::io::Scalar`] trait is implemented for:
//! - **Booleans**: `bool` (one byte, any non-zero value reads as `true`)
//! - **Unsigned integers**: `u8`, `u16`, `u32`, `u64`
//! - **Signed integers**: `i8`, `i16`, `i32`, `i64`
//! - **Floating point**: `f32`, `f64` and [`crate::Float16`]
//!
//! # Usage Examples
//!
//! ## Sequential Reading with Offset Tracking
//!
//! ```rust
//! use flatscope::io::read_le_at;
//!
//! let data = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00];
//! let mut offset = 0;
//!
//! let first: u16 = read_le_at(&data, &mut offset)?;  // offset: 0 -> 2
//! let second: u16 = read_le_at(&data, &mut offset)?; // offset: 2 -> 4
//! let third: u32 = read_le_at(&data, &mut offset)?;  // offset: 4 -> 8
//!
//! assert_eq!((first, second, third), (1, 2, 3));
//! assert_eq!(offset, 8);
//! # Ok::<(), flatscope::Error>(())
//! ```
//!
//! ## Unchecked Placement
//!
//! ```rust
//! use flatscope::io::{read_scalar, write_scalar};
//!
//! let mut data = [0u8; 4];
//! write_scalar(&mut data, -2i32);
//! assert_eq!(data, [0xFE, 0xFF, 0xFF, 0xFF]);
//! assert_eq!(read_scalar::<i32>(&data), -2);
//! ```
//!
//! # Thread Safety
//!
//! All functions in this module are pure and operate only on the slices passed in, so
//! they are safe to call concurrently as long as the usual borrowing rules hold.

use strum::{Display, EnumCount, EnumIter};

use crate::Result;

/// The scalar kinds that can be stored inline in a table, struct or vector.
///
/// This is the type registry of the wire format: every kind has a fixed size, and its
/// alignment equals its size. Offsets are stored as [`ElementKind::UInt32`] and
/// [`ElementKind::Int32`] (tables to vtables) or [`ElementKind::UInt16`] (vtable entries).
///
/// # Examples
///
/// ```rust
/// use flatscope::io::ElementKind;
/// use strum::IntoEnumIterator;
///
/// for kind in ElementKind::iter() {
///     assert!(kind.size().is_power_of_two());
///     assert_eq!(kind.size(), kind.alignment());
/// }
/// assert_eq!(ElementKind::Float16.to_string(), "Float16");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display)]
pub enum ElementKind {
    /// One byte, `0` or `1`
    Bool,
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// IEEE 754 half-precision float
    Float16,
    /// IEEE 754 single-precision float
    Float32,
    /// IEEE 754 double-precision float
    Float64,
}

impl ElementKind {
    /// Returns the number of bytes a value of this kind occupies.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            ElementKind::Bool | ElementKind::Int8 | ElementKind::UInt8 => 1,
            ElementKind::Int16 | ElementKind::UInt16 | ElementKind::Float16 => 2,
            ElementKind::Int32 | ElementKind::UInt32 | ElementKind::Float32 => 4,
            ElementKind::Int64 | ElementKind::UInt64 | ElementKind::Float64 => 8,
        }
    }

    /// Returns the required alignment of this kind, which is always its size.
    #[must_use]
    pub const fn alignment(self) -> usize {
        self.size()
    }

    /// Returns `true` for the floating point kinds.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(
            self,
            ElementKind::Float16 | ElementKind::Float32 | ElementKind::Float64
        )
    }
}

/// Trait for fixed-width values with a little-endian wire representation.
///
/// Implementors can be prepended by the [`crate::Builder`], read by a [`crate::Table`]
/// and used as vector elements. `PartialEq` is required for default elision: a field
/// that equals its default is not written at all.
///
/// # Implementation Details
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array for that type (e.g., `[u8; 4]` for `u32`). [`Scalar::SIZE`] is derived
/// from [`Scalar::KIND`] and must match the length of `Bytes`.
pub trait Scalar: Copy + PartialEq + Sized {
    /// The registry kind of this scalar
    const KIND: ElementKind;

    /// On-wire width in bytes
    const SIZE: usize = Self::KIND.size();

    /// Associated type representing the byte array type for this scalar.
    type Bytes: Default + AsRef<[u8]> + AsMut<[u8]>;

    /// Read T from a byte array in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte array in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ElementKind = ElementKind::$kind;
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_scalar!(
    u8 => UInt8,
    i8 => Int8,
    u16 => UInt16,
    i16 => Int16,
    u32 => UInt32,
    i32 => Int32,
    u64 => UInt64,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);

impl Scalar for bool {
    const KIND: ElementKind = ElementKind::Bool;
    type Bytes = [u8; 1];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        bytes[0] != 0
    }

    fn to_le_bytes(self) -> Self::Bytes {
        [u8::from(self)]
    }
}

/// Reads a value of type `T` from the start of `data` without a bounds check of its own.
///
/// # Panics
///
/// Panics if `data` is shorter than `T::SIZE`. Callers on the hot read path guarantee the
/// length through the layout contract of the buffer.
#[inline]
#[must_use]
pub fn read_scalar<T: Scalar>(data: &[u8]) -> T {
    let mut bytes = T::Bytes::default();
    bytes.as_mut().copy_from_slice(&data[..T::SIZE]);
    T::from_le_bytes(bytes)
}

/// Writes `value` to the start of `data` without a bounds check of its own.
///
/// # Panics
///
/// Panics if `data` is shorter than `T::SIZE`.
#[inline]
pub fn write_scalar<T: Scalar>(data: &mut [u8], value: T) {
    data[..T::SIZE].copy_from_slice(value.to_le_bytes().as_ref());
}

/// Safely reads a value of type `T` in little-endian byte order from a data buffer.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: Scalar>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes read.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (will be advanced after reading)
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes, including when
/// `offset + size_of::<T>()` overflows.
pub fn read_le_at<T: Scalar>(data: &[u8], offset: &mut usize) -> Result<T> {
    let Some(end) = offset.checked_add(T::SIZE) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let value = read_scalar(&data[*offset..end]);
    *offset = end;

    Ok(value)
}

/// Safely writes a value of type `T` in little-endian byte order to a data buffer.
///
/// # Arguments
///
/// * `data` - The mutable byte buffer to write to
/// * `value` - The value to write
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn write_le<T: Scalar>(data: &mut [u8], value: T) -> Result<()> {
    let mut offset = 0_usize;
    write_le_at(data, &mut offset, value)
}

/// Safely writes a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes written.
///
/// # Arguments
///
/// * `data` - The mutable byte buffer to write to
/// * `offset` - Mutable reference to the offset position (will be advanced after writing)
/// * `value` - The value to write
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn write_le_at<T: Scalar>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let Some(end) = offset.checked_add(T::SIZE) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    write_scalar(&mut data[*offset..end], value);
    *offset = end;

    Ok(())
}
