//! Vectors, strings and byte strings.
//!
//! A vector is a 32-bit element count followed by the elements. Since the builder writes
//! backwards, elements are prepended last to first and the count is written when the
//! vector is closed. Strings are byte vectors with a trailing `0` that is not counted.

use super::{to_uoffset, Builder, Nesting};
use crate::{
    io::Scalar,
    types::{UOffset, SIZE_UOFFSET},
    Error, Result,
};

impl Builder {
    /// Opens a vector of `num_elems` elements of `elem_size` bytes each.
    ///
    /// Reserves room for the elements and aligns them to both the count prefix and
    /// `alignment`. Elements are then written with [`Builder::prepend`] or
    /// [`Builder::place`] in reverse order, followed by [`Builder::end_vector`].
    ///
    /// # Errors
    /// Returns [`Error::Nested`] if an object or vector is already open,
    /// [`Error::InvalidAlignment`] for an alignment that is not a power of two, and
    /// [`Error::BufferTooLarge`] if the elements do not fit.
    pub fn start_vector(
        &mut self,
        elem_size: usize,
        num_elems: usize,
        alignment: usize,
    ) -> Result<UOffset> {
        self.assert_not_nested("start_vector")?;

        let payload = elem_size
            .checked_mul(num_elems)
            .ok_or(Error::ValueTooLarge {
                value: num_elems,
                what: "vector payload",
            })?;
        self.prep(SIZE_UOFFSET, payload)?;
        self.prep(alignment, payload)?;

        self.nesting = Some(Nesting::Vector);
        Ok(self.offset())
    }

    /// Closes the open vector by writing its element count, and returns its offset.
    ///
    /// # Errors
    /// Returns [`Error::NotNested`] if no vector is open, [`Error::ValueTooLarge`] if
    /// `num_elems` does not fit 32 bits, and [`Error::VectorOverrun`] if more elements were
    /// written than [`Builder::start_vector`] reserved room for.
    pub fn end_vector(&mut self, num_elems: usize) -> Result<UOffset> {
        self.assert_in(Nesting::Vector, "end_vector")?;
        let count = to_uoffset(num_elems, "vector length")?;

        // start_vector reserved and aligned room for the count, a further prep would pad
        // between the count and the elements
        if self.head < SIZE_UOFFSET {
            return Err(Error::VectorOverrun {
                offset: self.offset(),
            });
        }
        self.place::<UOffset>(count);
        self.nesting = None;
        Ok(self.offset())
    }

    /// Writes a UTF-8 string and returns its offset.
    ///
    /// # Errors
    /// Returns [`Error::Nested`] inside an open object or vector, or
    /// [`Error::BufferTooLarge`].
    pub fn create_string(&mut self, value: &str) -> Result<UOffset> {
        self.create_bytes(value.as_bytes(), true, "create_string")
    }

    /// Writes arbitrary bytes with string framing (length prefix and `0` terminator).
    ///
    /// # Errors
    /// Same as [`Builder::create_string`].
    pub fn create_byte_string(&mut self, value: &[u8]) -> Result<UOffset> {
        self.create_bytes(value, true, "create_byte_string")
    }

    /// Writes a `[u8]` vector without terminator.
    ///
    /// # Errors
    /// Same as [`Builder::create_string`].
    pub fn create_byte_vector(&mut self, value: &[u8]) -> Result<UOffset> {
        self.create_bytes(value, false, "create_byte_vector")
    }

    /// Writes a vector of scalars, preserving their order, and returns its offset.
    ///
    /// # Errors
    /// Same as [`Builder::start_vector`].
    pub fn create_vector<T: Scalar>(&mut self, items: &[T]) -> Result<UOffset> {
        self.start_vector(T::SIZE, items.len(), T::SIZE)?;
        for &item in items.iter().rev() {
            self.place(item);
        }
        self.end_vector(items.len())
    }

    /// Writes a vector of references to previously written strings, vectors or tables.
    ///
    /// # Errors
    /// Same as [`Builder::start_vector`] and [`Builder::prepend_uoffset`].
    pub fn create_offset_vector(&mut self, offsets: &[UOffset]) -> Result<UOffset> {
        self.start_vector(SIZE_UOFFSET, offsets.len(), SIZE_UOFFSET)?;
        for &offset in offsets.iter().rev() {
            self.prepend_uoffset(offset)?;
        }
        self.end_vector(offsets.len())
    }

    fn create_bytes(
        &mut self,
        value: &[u8],
        terminated: bool,
        operation: &'static str,
    ) -> Result<UOffset> {
        self.assert_not_nested(operation)?;

        let terminator = usize::from(terminated);
        self.prep(SIZE_UOFFSET, value.len() + terminator)?;
        self.nesting = Some(Nesting::Vector);

        if terminated {
            self.place::<u8>(0);
        }
        self.head -= value.len();
        self.bytes[self.head..self.head + value.len()].copy_from_slice(value);

        self.end_vector(value.len())
    }
}
