//! In-place mutation of scalar fields.
//!
//! Only fields that are physically present can be changed. A field that was elided
//! because it equaled its default has no storage, so mutating it reports `false` and
//! leaves the buffer untouched.

use super::Table;
use crate::{
    io::{write_scalar, Scalar},
    types::{UOffset, VOffset},
};

impl<B: AsRef<[u8]> + AsMut<[u8]>> Table<B> {
    /// Overwrites the scalar at absolute position `off`.
    ///
    /// # Panics
    /// Panics if the value does not fit inside the buffer.
    pub fn mutate<T: Scalar>(&mut self, off: UOffset, value: T) -> bool {
        write_scalar(&mut self.bytes.as_mut()[off as usize..], value);
        true
    }

    /// Overwrites a scalar field. Returns `false` if the field is absent from the buffer.
    pub fn mutate_slot<T: Scalar>(&mut self, slot: VOffset, value: T) -> bool {
        match self.offset(slot) {
            0 => false,
            off => {
                let position = self.pos + UOffset::from(off);
                self.mutate(position, value)
            }
        }
    }
}
