//! Object construction and vtable emission.
//!
//! An object is written as its field data followed by a signed offset to a vtable. The
//! vtable lists, per field slot, the distance from the start of the object to that
//! field, or `0` when the field is absent. Objects with an identical layout share one
//! vtable: before emitting a new one, the history of committed vtables is scanned from
//! the most recent entry backwards for a byte-identical match.

use log::trace;

use super::{to_voffset, Builder, Nesting};
use crate::{
    io::{read_scalar, write_scalar, Scalar},
    types::{SOffset, UOffset, VOffset, SIZE_VOFFSET, VTABLE_METADATA_FIELDS},
    Error, Result,
};

impl Builder {
    /// Opens a new object with room for `num_fields` field slots.
    ///
    /// # Errors
    /// Returns [`Error::Nested`] if another object or vector is open, or
    /// [`Error::Finished`] if the builder was already finished.
    pub fn start_object(&mut self, num_fields: usize) -> Result<()> {
        self.assert_not_nested("start_object")?;

        self.vtable.clear();
        self.vtable.resize(num_fields, 0);
        self.object_end = self.offset();
        self.nesting = Some(Nesting::Object);
        Ok(())
    }

    /// Records that the value written last belongs to field `slot` of the open object.
    ///
    /// # Errors
    /// Returns [`Error::NotNested`] outside an object and [`Error::SlotOutOfRange`] for a
    /// slot beyond the field count given to [`Builder::start_object`].
    pub fn slot(&mut self, slot: usize) -> Result<()> {
        self.check_slot(slot, "slot")?;
        self.vtable[slot] = self.offset();
        Ok(())
    }

    /// Writes a scalar field unless it equals its default.
    ///
    /// An omitted field reads back as the default, so the two encodings are
    /// indistinguishable to a reader. With [`crate::BuilderConfig::force_defaults`] the
    /// value is always written.
    ///
    /// # Errors
    /// Same as [`Builder::slot`], plus [`Error::BufferTooLarge`] if the storage cannot grow.
    pub fn prepend_slot<T: Scalar>(&mut self, slot: usize, value: T, default: T) -> Result<()> {
        self.check_slot(slot, "prepend_slot")?;
        if value != default || self.config.force_defaults {
            self.prepend(value)?;
            self.vtable[slot] = self.offset();
        }
        Ok(())
    }

    /// Writes a reference field unless it equals `default` (normally `0`, meaning absent).
    ///
    /// # Errors
    /// Same as [`Builder::slot`] and [`Builder::prepend_uoffset`].
    pub fn prepend_uoffset_slot(
        &mut self,
        slot: usize,
        offset: UOffset,
        default: UOffset,
    ) -> Result<()> {
        self.check_slot(slot, "prepend_uoffset_slot")?;
        if offset != default {
            self.prepend_uoffset(offset)?;
            self.vtable[slot] = self.offset();
        }
        Ok(())
    }

    /// Records an inline struct that was just written as field `slot`.
    ///
    /// Structs are stored inside the object, so `offset` must be the current offset,
    /// i.e. the struct must be the last thing written.
    ///
    /// # Errors
    /// Returns [`Error::InlineOutsideObject`] if `offset` is not the current offset, in
    /// addition to the errors of [`Builder::slot`].
    pub fn prepend_struct_slot(
        &mut self,
        slot: usize,
        offset: UOffset,
        default: UOffset,
    ) -> Result<()> {
        self.check_slot(slot, "prepend_struct_slot")?;
        if offset != default {
            let found = self.offset();
            if offset != found {
                return Err(Error::InlineOutsideObject {
                    expected: offset,
                    found,
                });
            }
            self.vtable[slot] = found;
        }
        Ok(())
    }

    /// Closes the open object and returns its offset.
    ///
    /// Writes the object's vtable, or reuses an identical one written earlier, and links the
    /// object to it.
    ///
    /// # Errors
    /// Returns [`Error::NotNested`] if no object is open, [`Error::ValueTooLarge`] if the
    /// object's inline data exceeds 64 KiB, or [`Error::BufferTooLarge`].
    pub fn end_object(&mut self) -> Result<UOffset> {
        self.assert_in(Nesting::Object, "end_object")?;
        let object_offset = self.write_vtable()?;
        self.nesting = None;
        Ok(object_offset)
    }

    fn check_slot(&self, slot: usize, operation: &'static str) -> Result<()> {
        self.assert_in(Nesting::Object, operation)?;
        if slot >= self.vtable.len() {
            return Err(Error::SlotOutOfRange {
                slot,
                num_fields: self.vtable.len(),
            });
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_vtable(&mut self) -> Result<UOffset> {
        // Placeholder for the object's link to its vtable
        self.prepend::<SOffset>(0)?;
        let object_offset = self.offset();

        while self.vtable.last() == Some(&0) {
            self.vtable.pop();
        }

        let object_size = to_voffset((object_offset - self.object_end) as usize, "object size")?;

        let existing = if self.config.deduplicate_vtables {
            self.find_vtable(object_offset)
        } else {
            None
        };

        let vtable_offset = if let Some(existing) = existing {
            trace!("Reusing vtable at offset {existing} for object at {object_offset}");
            existing
        } else {
            for index in (0..self.vtable.len()).rev() {
                let field = self.vtable[index];
                let entry = if field == 0 {
                    0
                } else {
                    to_voffset((object_offset - field) as usize, "field offset")?
                };
                self.prepend::<VOffset>(entry)?;
            }

            self.prepend::<VOffset>(object_size)?;
            let vtable_size = (self.vtable.len() + VTABLE_METADATA_FIELDS) * SIZE_VOFFSET;
            self.prepend::<VOffset>(to_voffset(vtable_size, "vtable size")?)?;

            let offset = self.offset();
            self.vtables.push(offset);
            trace!(
                "Wrote vtable at offset {offset} ({} fields) for object at {object_offset}",
                self.vtable.len()
            );
            offset
        };

        // Both offsets are bounded by MAX_BUFFER_SIZE, so the difference fits an i32
        let link = (i64::from(vtable_offset) - i64::from(object_offset)) as SOffset;
        let object_start = self.bytes.len() - object_offset as usize;
        write_scalar(&mut self.bytes[object_start..], link);

        self.vtable.clear();
        Ok(object_offset)
    }

    /// Scans the committed vtables, newest first, for one matching the open object.
    ///
    /// The object byte length is not compared: it includes alignment padding, which differs
    /// between objects with identical field layouts.
    fn find_vtable(&self, object_offset: UOffset) -> Option<UOffset> {
        let wanted_len = (self.vtable.len() + VTABLE_METADATA_FIELDS) * SIZE_VOFFSET;

        self.vtables.iter().rev().copied().find(|&candidate| {
            let start = self.bytes.len() - candidate as usize;
            let len = usize::from(read_scalar::<VOffset>(&self.bytes[start..]));
            if len != wanted_len {
                return false;
            }

            let entries = &self.bytes[start + VTABLE_METADATA_FIELDS * SIZE_VOFFSET..start + len];
            vtable_equal(&self.vtable, object_offset, entries)
        })
    }
}

/// Compares the field offsets of an open object against the entries of a written vtable.
///
/// Absent fields (`0`) only match absent entries.
fn vtable_equal(fields: &[UOffset], object_offset: UOffset, entries: &[u8]) -> bool {
    if fields.len() * SIZE_VOFFSET != entries.len() {
        return false;
    }

    fields
        .iter()
        .zip(entries.chunks_exact(SIZE_VOFFSET))
        .all(|(&field, entry)| {
            let stored = read_scalar::<VOffset>(entry);
            if field == 0 {
                stored == 0
            } else {
                i64::from(stored) == i64::from(object_offset) - i64::from(field)
            }
        })
}
