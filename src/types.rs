//! Offset kinds and layout constants of the wire format.
//!
//! Every position inside a buffer is expressed with one of three offset kinds:
//!
//! - [`UOffset`] - unsigned 32-bit. While building, it is measured from the tail of the
//!   buffer; once finished, a stored `UOffset` is relative to its own position, which keeps
//!   buffers relocatable without any pointer fix-up.
//! - [`SOffset`] - signed 32-bit. Stored at the start of every table and pointing to the
//!   table's vtable, which may live before or after the table.
//! - [`VOffset`] - unsigned 16-bit. An entry inside a vtable; `0` marks an absent field.
//!
//! # Layout
//!
//! ```text
//! vtable:  [VOffset vtable_len][VOffset object_len][VOffset field_0] ... [VOffset field_n-1]
//! table:   [SOffset to vtable][field data in write order ...]
//! vector:  [UOffset count][element_0] ... [element_count-1]
//! string:  [UOffset len][bytes ...][0x00]
//! ```

/// Unsigned 32-bit offset.
pub type UOffset = u32;

/// Signed 32-bit offset, used from a table to its vtable.
pub type SOffset = i32;

/// Unsigned 16-bit vtable entry.
pub type VOffset = u16;

/// Width of a [`UOffset`] in bytes.
pub const SIZE_UOFFSET: usize = std::mem::size_of::<UOffset>();

/// Width of a [`SOffset`] in bytes.
pub const SIZE_SOFFSET: usize = std::mem::size_of::<SOffset>();

/// Width of a [`VOffset`] in bytes.
pub const SIZE_VOFFSET: usize = std::mem::size_of::<VOffset>();

/// Number of header entries in a vtable (vtable byte length and object byte length).
pub const VTABLE_METADATA_FIELDS: usize = 2;

/// Length of the optional file identifier written right after the root offset.
pub const FILE_IDENTIFIER_LENGTH: usize = 4;

/// Hard upper bound for a buffer. All offsets are 32-bit and a table may point to its
/// vtable with a negative offset, so every position must fit a signed 32-bit value.
pub const MAX_BUFFER_SIZE: usize = i32::MAX as usize;

/// Converts a field's slot index into the byte offset of its vtable entry.
///
/// The builder addresses fields by index (`0..num_fields`), while the reader addresses
/// them by the position of their entry inside the vtable, skipping the two header fields.
///
/// # Examples
///
/// ```rust
/// use flatscope::types::field_index_to_offset;
///
/// assert_eq!(field_index_to_offset(0), 4);
/// assert_eq!(field_index_to_offset(3), 10);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn field_index_to_offset(index: VOffset) -> VOffset {
    ((VTABLE_METADATA_FIELDS + index as usize) * SIZE_VOFFSET) as VOffset
}
