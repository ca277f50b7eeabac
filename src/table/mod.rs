//! Zero-copy access to tables inside a finished buffer.
//!
//! A [`Table`] is a view at a position in a byte buffer. It does not copy or validate
//! anything: every accessor trusts that the buffer was produced by a [`crate::Builder`]
//! (or checked with a [`crate::Verifier`]), and panics if it reads past the end of a
//! damaged buffer.
//!
//! Fields are addressed by vtable offset, as returned by
//! [`crate::types::field_index_to_offset`]. A field whose vtable entry is missing or zero
//! reads back as the caller-supplied default, which is what makes schema evolution work:
//! newer readers see defaults for fields older writers never knew about, and older readers
//! simply never look at trailing entries they do not know.
//!
//! # Examples
//!
//! ```rust
//! use flatscope::{Builder, Table};
//! use flatscope::types::field_index_to_offset;
//!
//! let mut builder = Builder::new();
//! let values = builder.create_vector::<u16>(&[1, 2, 3])?;
//! builder.start_object(2)?;
//! builder.prepend_slot::<f32>(0, 0.5, 0.0)?;
//! builder.prepend_uoffset_slot(1, values, 0)?;
//! let root = builder.end_object()?;
//! builder.finish(root)?;
//!
//! let table = Table::root(builder.finished_bytes()?);
//! assert_eq!(table.get_slot::<f32>(field_index_to_offset(0), 0.0), 0.5);
//!
//! let values = table.vector_slot::<u16>(field_index_to_offset(1)).unwrap();
//! assert_eq!(values.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
//! # Ok::<(), flatscope::Error>(())
//! ```

mod mutate;
mod vector;

pub use vector::{TableVector, TableVectorIter, Vector, VectorIter};

use crate::{
    io::{read_scalar, Scalar},
    types::{SOffset, UOffset, VOffset, FILE_IDENTIFIER_LENGTH, SIZE_UOFFSET},
    Result,
};

/// A table at a fixed position inside a buffer.
///
/// `B` is any byte container: a borrowed slice for reading, `&mut [u8]` or `Vec<u8>` for
/// in-place mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table<B> {
    bytes: B,
    pos: UOffset,
}

impl<B: AsRef<[u8]>> Table<B> {
    /// Creates a view of the table starting at `pos`.
    pub fn new(bytes: B, pos: UOffset) -> Self {
        Table { bytes, pos }
    }

    /// Creates a view of the root table of a finished buffer.
    ///
    /// # Panics
    /// Panics if the buffer is shorter than the root reference.
    pub fn root(bytes: B) -> Self {
        let pos = read_scalar::<UOffset>(bytes.as_ref());
        Table { bytes, pos }
    }

    /// Creates a view of the root table if the buffer carries `identifier`.
    ///
    /// Returns `None` for a buffer without the identifier, including buffers too short to
    /// hold one.
    pub fn root_with_identifier(bytes: B, identifier: &[u8]) -> Option<Self> {
        if buffer_has_identifier(bytes.as_ref(), identifier) {
            Some(Table::root(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying buffer.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Returns the position of the table within the buffer.
    pub fn pos(&self) -> UOffset {
        self.pos
    }

    /// Consumes the view and returns the underlying buffer.
    pub fn into_inner(self) -> B {
        self.bytes
    }

    /// Returns a borrowed view of the same table.
    pub fn as_table(&self) -> Table<&[u8]> {
        Table::new(self.bytes.as_ref(), self.pos)
    }

    /// Returns the position of this table's vtable.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn vtable(&self) -> UOffset {
        let link = read_scalar::<SOffset>(&self.bytes()[self.pos as usize..]);
        (i64::from(self.pos) - i64::from(link)) as UOffset
    }

    /// Returns the field offset stored at `vtable_offset` in the vtable, or `0` if the
    /// field is absent or lies beyond the end of the vtable.
    pub fn offset(&self, vtable_offset: VOffset) -> VOffset {
        let vtable = self.vtable() as usize;
        let vtable_len = read_scalar::<VOffset>(&self.bytes()[vtable..]);
        if vtable_offset < vtable_len {
            read_scalar::<VOffset>(&self.bytes()[vtable + usize::from(vtable_offset)..])
        } else {
            0
        }
    }

    /// Follows the reference stored at absolute position `off`.
    pub fn indirect(&self, off: UOffset) -> UOffset {
        off + read_scalar::<UOffset>(&self.bytes()[off as usize..])
    }

    /// Reads a scalar at absolute position `off`.
    pub fn get<T: Scalar>(&self, off: UOffset) -> T {
        read_scalar(&self.bytes()[off as usize..])
    }

    /// Reads a scalar field, or `default` when the field is absent.
    pub fn get_slot<T: Scalar>(&self, slot: VOffset, default: T) -> T {
        match self.offset(slot) {
            0 => default,
            off => self.get(self.pos + UOffset::from(off)),
        }
    }

    /// Returns the bytes of the vector referenced from absolute position `off`.
    pub fn byte_vector(&self, off: UOffset) -> &[u8] {
        let start = self.indirect(off) as usize;
        let len = read_scalar::<UOffset>(&self.bytes()[start..]) as usize;
        let data = start + SIZE_UOFFSET;
        &self.bytes()[data..data + len]
    }

    /// Returns the string referenced from absolute position `off`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Utf8`] if the payload is not valid UTF-8.
    pub fn string(&self, off: UOffset) -> Result<&str> {
        Ok(std::str::from_utf8(self.byte_vector(off))?)
    }

    /// Returns the element count of the vector referenced by the field at `off`,
    /// relative to the table.
    pub fn vector_len(&self, off: UOffset) -> usize {
        let start = self.indirect(self.pos + off);
        self.get::<UOffset>(start) as usize
    }

    /// Returns the position of the first element of the vector referenced by the field
    /// at `off`, relative to the table.
    pub fn vector(&self, off: UOffset) -> UOffset {
        self.indirect(self.pos + off) + SIZE_UOFFSET as UOffset
    }

    /// Returns the table referenced by the union field at `off`, relative to the table.
    pub fn union(&self, off: UOffset) -> Table<&[u8]> {
        Table::new(self.bytes(), self.indirect(self.pos + off))
    }

    /// Reads a string field, or `None` when the field is absent.
    ///
    /// # Errors
    /// Returns [`crate::Error::Utf8`] if the payload is not valid UTF-8.
    pub fn string_slot(&self, slot: VOffset) -> Result<Option<&str>> {
        match self.offset(slot) {
            0 => Ok(None),
            off => self.string(self.pos + UOffset::from(off)).map(Some),
        }
    }

    /// Reads a byte vector field, or `None` when the field is absent.
    pub fn byte_vector_slot(&self, slot: VOffset) -> Option<&[u8]> {
        match self.offset(slot) {
            0 => None,
            off => Some(self.byte_vector(self.pos + UOffset::from(off))),
        }
    }

    /// Reads a scalar vector field, or `None` when the field is absent.
    pub fn vector_slot<T: Scalar>(&self, slot: VOffset) -> Option<Vector<'_, T>> {
        match self.offset(slot) {
            0 => None,
            off => {
                let off = UOffset::from(off);
                Some(Vector::new(self.bytes(), self.vector(off), self.vector_len(off)))
            }
        }
    }

    /// Reads a field holding a vector of tables, or `None` when the field is absent.
    pub fn table_vector_slot(&self, slot: VOffset) -> Option<TableVector<'_>> {
        match self.offset(slot) {
            0 => None,
            off => {
                let off = UOffset::from(off);
                Some(TableVector::new(
                    self.bytes(),
                    self.vector(off),
                    self.vector_len(off),
                ))
            }
        }
    }

    /// Reads a nested table field, or `None` when the field is absent.
    pub fn table_slot(&self, slot: VOffset) -> Option<Table<&[u8]>> {
        match self.offset(slot) {
            0 => None,
            off => Some(Table::new(
                self.bytes(),
                self.indirect(self.pos + UOffset::from(off)),
            )),
        }
    }

    /// Reads a union field, or `None` when the field is absent.
    ///
    /// The union's type tag is an ordinary scalar field and is read with
    /// [`Table::get_slot`].
    pub fn union_slot(&self, slot: VOffset) -> Option<Table<&[u8]>> {
        match self.offset(slot) {
            0 => None,
            off => Some(self.union(UOffset::from(off))),
        }
    }
}

/// Returns `true` if `bytes` is large enough to carry a file identifier and the identifier
/// equals `identifier`.
#[must_use]
pub fn buffer_has_identifier(bytes: &[u8], identifier: &[u8]) -> bool {
    let end = SIZE_UOFFSET + FILE_IDENTIFIER_LENGTH;
    identifier.len() == FILE_IDENTIFIER_LENGTH
        && bytes.len() >= end
        && &bytes[SIZE_UOFFSET..end] == identifier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test::{build_record, Record, CHILD, FLAGS, HALF, ID, NAME, SCORE, TAGS},
        Builder, Float16,
    };

    #[test]
    fn scalar_fields_and_defaults() -> Result<()> {
        let record = Record {
            id: 7,
            score: 2.5,
            ..Record::default()
        };
        let bytes = build_record(&record)?;
        let table = Table::root(bytes.as_slice());

        assert_eq!(table.get_slot::<u32>(ID, 0), 7);
        assert_eq!(table.get_slot::<f64>(SCORE, 0.0), 2.5);
        // not written because it equals the default
        assert_eq!(table.offset(FLAGS), 0);
        assert_eq!(table.get_slot::<u8>(FLAGS, 0xFF), 0xFF);
        assert_eq!(table.string_slot(NAME)?, None);
        assert!(table.vector_slot::<u16>(TAGS).is_none());
        Ok(())
    }

    #[test]
    fn reference_fields() -> Result<()> {
        let record = Record {
            name: Some("record".to_string()),
            tags: Some(vec![5, 6, 7]),
            half: Float16::from_f32(0.25),
            child: Some(Box::new(Record {
                id: 99,
                ..Record::default()
            })),
            ..Record::default()
        };
        let bytes = build_record(&record)?;
        let table = Table::root(bytes.as_slice());

        assert_eq!(table.string_slot(NAME)?, Some("record"));
        assert_eq!(table.byte_vector_slot(NAME), Some(&b"record"[..]));

        let tags = table.vector_slot::<u16>(TAGS).unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags.get(2), Some(7));
        assert_eq!(
            table.vector_len(UOffset::from(table.offset(TAGS))),
            tags.len()
        );

        assert_eq!(
            table.get_slot::<Float16>(HALF, Float16::default()).to_f32(),
            0.25
        );

        let child = table.table_slot(CHILD).unwrap();
        assert_eq!(child.get_slot::<u32>(ID, 0), 99);
        assert!(child.table_slot(CHILD).is_none());
        Ok(())
    }

    #[test]
    fn union_field() -> Result<()> {
        let mut builder = Builder::new();
        builder.start_object(1)?;
        builder.prepend_slot::<i64>(0, -9, 0)?;
        let member = builder.end_object()?;

        builder.start_object(2)?;
        builder.prepend_uoffset_slot(1, member, 0)?;
        builder.prepend_slot::<u8>(0, 3, 0)?;
        let root = builder.end_object()?;
        builder.finish(root)?;

        let table = Table::root(builder.finished_bytes()?);
        assert_eq!(table.get_slot::<u8>(4, 0), 3);
        let member = table.union_slot(6).unwrap();
        assert_eq!(member.get_slot::<i64>(4, 0), -9);
        assert_eq!(member, table.union(UOffset::from(table.offset(6))));
        Ok(())
    }

    #[test]
    fn unknown_slots_read_as_default() -> Result<()> {
        let bytes = build_record(&Record {
            id: 1,
            ..Record::default()
        })?;
        let table = Table::root(bytes.as_slice());
        // far beyond the vtable of this object
        assert_eq!(table.offset(200), 0);
        assert_eq!(table.get_slot::<i32>(200, -4), -4);
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_reported() -> Result<()> {
        let mut builder = Builder::new();
        let name = builder.create_byte_string(&[0xFF, 0xFE])?;
        builder.start_object(1)?;
        builder.prepend_uoffset_slot(0, name, 0)?;
        let root = builder.end_object()?;
        builder.finish(root)?;

        let table = Table::root(builder.finished_bytes()?);
        assert!(matches!(table.string_slot(4), Err(crate::Error::Utf8(_))));
        assert_eq!(table.byte_vector_slot(4), Some(&[0xFF, 0xFE][..]));
        Ok(())
    }

    #[test]
    fn root_with_identifier() -> Result<()> {
        let mut builder = Builder::new();
        builder.start_object(1)?;
        builder.prepend_slot::<u32>(0, 8, 0)?;
        let root = builder.end_object()?;
        builder.finish_with_file_identifier(root, b"RECD")?;
        let bytes = builder.finished_bytes()?;

        let table = Table::root_with_identifier(bytes, b"RECD").unwrap();
        assert_eq!(table.get_slot::<u32>(ID, 0), 8);
        assert!(Table::root_with_identifier(bytes, b"OTHR").is_none());
        assert!(Table::root_with_identifier(&bytes[..6], b"RECD").is_none());
        Ok(())
    }

    #[test]
    fn identifier_check_on_short_buffers() {
        assert!(!buffer_has_identifier(&[0, 0, 0, 0], b"ABCD"));
        assert!(!buffer_has_identifier(&[0, 0, 0, 0, b'A', b'B', b'C', b'D'], b"ABC"));
        assert!(buffer_has_identifier(&[0, 0, 0, 0, b'A', b'B', b'C', b'D'], b"ABCD"));
    }
}
