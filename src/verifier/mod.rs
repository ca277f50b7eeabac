//! Bounds-checked verification of untrusted buffers.
//!
//! [`crate::Table`] accessors trust their input. Before reading a buffer received from
//! an untrusted source, run a [`Verifier`] over it: every offset, vtable, vector and
//! string that the caller's schema walks is checked to lie within the buffer, to be
//! aligned, and to be framed correctly. Once verification succeeds, the unchecked
//! accessors cannot read out of bounds for the fields that were verified.
//!
//! The verifier has no schema of its own. The caller describes the expected shape by
//! calling the `verify_*` methods for each field, in the same way generated code would.
//!
//! # Examples
//!
//! ```rust
//! use flatscope::{Builder, Verifier, VerifierOptions};
//! use flatscope::types::field_index_to_offset;
//!
//! let mut builder = Builder::new();
//! let name = builder.create_string("checked")?;
//! builder.start_object(2)?;
//! builder.prepend_uoffset_slot(1, name, 0)?;
//! builder.prepend_slot::<u16>(0, 7, 0)?;
//! let root = builder.end_object()?;
//! builder.finish(root)?;
//!
//! let mut verifier = Verifier::new(builder.finished_bytes()?, VerifierOptions::default())?;
//! verifier.verify_root(None, |verifier, table| {
//!     verifier.verify_field::<u16>(table, field_index_to_offset(0))?;
//!     verifier.verify_required(table, field_index_to_offset(1))?;
//!     verifier.verify_string_field(table, field_index_to_offset(1))
//! })?;
//! # Ok::<(), flatscope::Error>(())
//! ```

mod options;

pub use options::VerifierOptions;

use log::trace;

use crate::{
    io::{read_le_at, ElementKind, Scalar},
    table::buffer_has_identifier,
    types::{
        SOffset, UOffset, VOffset, FILE_IDENTIFIER_LENGTH, MAX_BUFFER_SIZE, SIZE_SOFFSET,
        SIZE_UOFFSET, SIZE_VOFFSET, VTABLE_METADATA_FIELDS,
    },
    Error, Result,
};

/// Position and extent of a table and its vtable.
struct Layout {
    vtable: usize,
    vtable_len: usize,
    object_len: usize,
}

/// Walks a buffer and checks it against the caller's expectations.
///
/// Tables are entered with [`Verifier::verify_table`] and left with
/// [`Verifier::end_table`]; the callback based helpers ([`Verifier::verify_root`],
/// [`Verifier::verify_table_field`], ...) do both automatically.
#[derive(Debug)]
pub struct Verifier<'a> {
    data: &'a [u8],
    options: VerifierOptions,
    depth: usize,
    num_tables: usize,
}

impl<'a> Verifier<'a> {
    /// Creates a verifier over `data`.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if `data` is larger than any buffer the builder can
    /// produce.
    pub fn new(data: &'a [u8], options: VerifierOptions) -> Result<Self> {
        if data.len() > MAX_BUFFER_SIZE {
            return Err(malformed_error!(
                "Buffer of {} bytes exceeds the maximum size of {} bytes",
                data.len(),
                MAX_BUFFER_SIZE
            ));
        }

        Ok(Verifier {
            data,
            options,
            depth: 0,
            num_tables: 0,
        })
    }

    /// Returns the options in use.
    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    /// Returns the current table nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of tables entered so far.
    pub fn num_tables(&self) -> usize {
        self.num_tables
    }

    /// Checks the root reference and, if given, the file identifier. Returns the position
    /// of the root table.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] for a truncated header or a root outside the buffer,
    /// [`Error::InvalidFileIdentifier`] if `identifier` is not 4 bytes long, and
    /// [`Error::Malformed`] if the identifier does not match.
    pub fn verify_buffer_header(&self, identifier: Option<&[u8]>) -> Result<UOffset> {
        let root = self.read::<UOffset>(0)?;

        if let Some(identifier) = identifier {
            if identifier.len() != FILE_IDENTIFIER_LENGTH {
                return Err(Error::InvalidFileIdentifier(identifier.len()));
            }
            self.check_range(SIZE_UOFFSET, FILE_IDENTIFIER_LENGTH)?;
            if !buffer_has_identifier(self.data, identifier) {
                return Err(malformed_error!(
                    "File identifier mismatch - expected {:?}, found {:?}",
                    identifier,
                    &self.data[SIZE_UOFFSET..SIZE_UOFFSET + FILE_IDENTIFIER_LENGTH]
                ));
            }
        }

        self.check_range(root as usize, SIZE_SOFFSET)?;
        Ok(root)
    }

    /// Verifies the header and the root table, then runs `check` on the root table.
    ///
    /// Returns the position of the root table.
    ///
    /// # Errors
    /// Returns the first error found in the header, the root table, or by `check`.
    pub fn verify_root<F>(&mut self, identifier: Option<&[u8]>, check: F) -> Result<UOffset>
    where
        F: FnOnce(&mut Self, UOffset) -> Result<()>,
    {
        let root = self.verify_buffer_header(identifier)?;
        self.verify_table(root)?;
        check(self, root)?;
        self.end_table();

        trace!(
            "Verified buffer of {} bytes - {} tables",
            self.data.len(),
            self.num_tables
        );
        Ok(root)
    }

    /// Enters the table at `table`, checking its vtable link, vtable and inline data.
    ///
    /// Every successful call must be paired with [`Verifier::end_table`].
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if a depth or table limit is exceeded or the layout is
    /// inconsistent, and [`Error::OutOfBounds`] if any part lies outside the buffer.
    pub fn verify_table(&mut self, table: UOffset) -> Result<()> {
        self.depth += 1;
        self.num_tables += 1;
        if self.depth > self.options.max_depth {
            return Err(malformed_error!(
                "Table nesting exceeds the maximum depth of {}",
                self.options.max_depth
            ));
        }
        if self.num_tables > self.options.max_tables {
            return Err(malformed_error!(
                "Buffer holds more than {} tables",
                self.options.max_tables
            ));
        }

        self.layout(table)?;
        Ok(())
    }

    /// Leaves the table entered last.
    pub fn end_table(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Checks that the scalar field at `slot` lies inside its table and is aligned.
    ///
    /// # Errors
    /// See [`Verifier::verify_field_kind`].
    pub fn verify_field<T: Scalar>(&self, table: UOffset, slot: VOffset) -> Result<()> {
        self.verify_field_kind(table, slot, T::KIND)
    }

    /// Checks that the field at `slot` can hold a value of `kind`. Absent fields pass.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the field overruns its table or is unaligned.
    pub fn verify_field_kind(&self, table: UOffset, slot: VOffset, kind: ElementKind) -> Result<()> {
        if let Some(pos) = self.field(table, slot, kind.size())? {
            self.check_alignment(pos, kind.alignment(), "field")?;
        }
        Ok(())
    }

    /// Checks that the field at `slot` is present.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the field is absent.
    pub fn verify_required(&self, table: UOffset, slot: VOffset) -> Result<()> {
        match self.field(table, slot, 0)? {
            Some(_) => Ok(()),
            None => Err(malformed_error!(
                "Required field at vtable offset {} of table {} is missing",
                slot,
                table
            )),
        }
    }

    /// Checks the vector starting at `pos` and returns its element count.
    ///
    /// # Arguments
    /// * `pos` - Position of the vector's length prefix
    /// * `elem_size` - Size of one element in bytes
    /// * `alignment` - Required alignment of the elements
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if the elements exceed the buffer and
    /// [`Error::Malformed`] if the vector is unaligned.
    pub fn verify_vector(&self, pos: UOffset, elem_size: usize, alignment: usize) -> Result<usize> {
        let pos = pos as usize;
        self.check_alignment(pos, SIZE_UOFFSET, "vector")?;
        let len = self.read::<UOffset>(pos)? as usize;

        let start = pos + SIZE_UOFFSET;
        self.check_alignment(start, alignment, "vector elements")?;
        let Some(bytes) = len.checked_mul(elem_size) else {
            return Err(out_of_bounds_error!());
        };
        self.check_range(start, bytes)?;
        Ok(len)
    }

    /// Checks the string starting at `pos`: framing, terminator and, if enabled, UTF-8.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`], [`Error::Malformed`] for a missing terminator, or
    /// [`Error::Utf8`].
    pub fn verify_string(&self, pos: UOffset) -> Result<()> {
        let len = self.verify_vector(pos, 1, 1)?;
        let start = pos as usize + SIZE_UOFFSET;
        let end = start + len;

        self.check_range(end, 1)?;
        if self.data[end] != 0 {
            return Err(malformed_error!(
                "String at position {} is not zero terminated",
                pos
            ));
        }
        if self.options.check_utf8 {
            std::str::from_utf8(&self.data[start..end])?;
        }
        Ok(())
    }

    /// Checks the string referenced by field `slot`. Absent fields pass.
    ///
    /// # Errors
    /// See [`Verifier::verify_string`].
    pub fn verify_string_field(&self, table: UOffset, slot: VOffset) -> Result<()> {
        if let Some(target) = self.reference(table, slot)? {
            self.verify_string(target)?;
        }
        Ok(())
    }

    /// Checks the scalar vector referenced by field `slot` and returns its length, or
    /// `None` if the field is absent.
    ///
    /// # Errors
    /// See [`Verifier::verify_vector`].
    pub fn verify_vector_field<T: Scalar>(
        &self,
        table: UOffset,
        slot: VOffset,
    ) -> Result<Option<usize>> {
        match self.reference(table, slot)? {
            Some(target) => self
                .verify_vector(target, T::SIZE, T::KIND.alignment())
                .map(Some),
            None => Ok(None),
        }
    }

    /// Checks every string of the string vector referenced by field `slot`.
    ///
    /// # Errors
    /// See [`Verifier::verify_string`].
    pub fn verify_string_vector_field(&self, table: UOffset, slot: VOffset) -> Result<()> {
        if let Some(target) = self.reference(table, slot)? {
            for element in self.offset_vector(target)? {
                let string = self.follow(element)?;
                self.verify_string(string)?;
            }
        }
        Ok(())
    }

    /// Enters the table referenced by field `slot`, runs `check` on it, and leaves it.
    /// Absent fields pass without calling `check`.
    ///
    /// # Errors
    /// Returns the first error found in the child table or by `check`.
    pub fn verify_table_field<F>(&mut self, table: UOffset, slot: VOffset, check: F) -> Result<()>
    where
        F: FnOnce(&mut Self, UOffset) -> Result<()>,
    {
        if let Some(child) = self.reference(table, slot)? {
            self.verify_table(child)?;
            check(self, child)?;
            self.end_table();
        }
        Ok(())
    }

    /// Enters every table of the table vector referenced by field `slot` and runs `check`
    /// on each.
    ///
    /// # Errors
    /// Returns the first error found in any element or by `check`.
    pub fn verify_table_vector_field<F>(
        &mut self,
        table: UOffset,
        slot: VOffset,
        mut check: F,
    ) -> Result<()>
    where
        F: FnMut(&mut Self, UOffset) -> Result<()>,
    {
        if let Some(target) = self.reference(table, slot)? {
            for element in self.offset_vector(target)? {
                let child = self.follow(element)?;
                self.verify_table(child)?;
                check(self, child)?;
                self.end_table();
            }
        }
        Ok(())
    }

    /// Checks a union: the `u8` type tag at `type_slot` and the table at `value_slot`.
    ///
    /// `check` receives the tag and the member table. A tag of `0` means no member; a
    /// member without a tag is rejected.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for a member without a tag, plus the errors of the
    /// member table and `check`.
    pub fn verify_union_field<F>(
        &mut self,
        table: UOffset,
        type_slot: VOffset,
        value_slot: VOffset,
        check: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Self, u8, UOffset) -> Result<()>,
    {
        let tag = match self.field(table, type_slot, 1)? {
            Some(pos) => self.read::<u8>(pos)?,
            None => 0,
        };

        match (tag, self.reference(table, value_slot)?) {
            (_, None) => Ok(()),
            (0, Some(_)) => Err(malformed_error!(
                "Union at vtable offset {} of table {} has a value but no type",
                value_slot,
                table
            )),
            (tag, Some(member)) => {
                self.verify_table(member)?;
                check(self, tag, member)?;
                self.end_table();
                Ok(())
            }
        }
    }

    fn read<T: Scalar>(&self, pos: usize) -> Result<T> {
        let mut offset = pos;
        read_le_at(self.data, &mut offset)
    }

    fn check_range(&self, pos: usize, len: usize) -> Result<()> {
        match pos.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(out_of_bounds_error!()),
        }
    }

    fn check_alignment(&self, pos: usize, alignment: usize, what: &str) -> Result<()> {
        if self.options.check_alignment && alignment > 1 && pos % alignment != 0 {
            return Err(malformed_error!(
                "Unaligned {} at position {} - expected alignment {}",
                what,
                pos,
                alignment
            ));
        }
        Ok(())
    }

    fn layout(&self, table: UOffset) -> Result<Layout> {
        let pos = table as usize;
        self.check_alignment(pos, SIZE_SOFFSET, "table")?;

        let link = self.read::<SOffset>(pos)?;
        let vtable =
            usize::try_from(i64::from(table) - i64::from(link)).map_err(|_| out_of_bounds_error!())?;
        self.check_alignment(vtable, SIZE_VOFFSET, "vtable")?;

        let vtable_len = usize::from(self.read::<VOffset>(vtable)?);
        if vtable_len < VTABLE_METADATA_FIELDS * SIZE_VOFFSET || vtable_len % SIZE_VOFFSET != 0 {
            return Err(malformed_error!(
                "Invalid vtable length {} at position {}",
                vtable_len,
                vtable
            ));
        }
        self.check_range(vtable, vtable_len)?;

        let object_len = usize::from(self.read::<VOffset>(vtable + SIZE_VOFFSET)?);
        if object_len < SIZE_SOFFSET {
            return Err(malformed_error!(
                "Invalid object length {} for table at position {}",
                object_len,
                table
            ));
        }
        self.check_range(pos, object_len)?;

        Ok(Layout {
            vtable,
            vtable_len,
            object_len,
        })
    }

    /// Position of the field at `slot` if present, checked to hold `size` bytes.
    fn field(&self, table: UOffset, slot: VOffset, size: usize) -> Result<Option<usize>> {
        let layout = self.layout(table)?;
        let entry = usize::from(slot);
        if entry + SIZE_VOFFSET > layout.vtable_len {
            return Ok(None);
        }

        let offset = usize::from(self.read::<VOffset>(layout.vtable + entry)?);
        if offset == 0 {
            return Ok(None);
        }
        if offset + size > layout.object_len {
            return Err(malformed_error!(
                "Field at vtable offset {} overruns table {} ({} + {} > {})",
                slot,
                table,
                offset,
                size,
                layout.object_len
            ));
        }

        let pos = table as usize + offset;
        self.check_range(pos, size)?;
        Ok(Some(pos))
    }

    /// Follows the reference stored at `pos`.
    #[allow(clippy::cast_possible_truncation)]
    fn follow(&self, pos: UOffset) -> Result<UOffset> {
        let pos = pos as usize;
        self.check_alignment(pos, SIZE_UOFFSET, "offset")?;

        let relative = self.read::<UOffset>(pos)? as usize;
        if relative == 0 {
            return Err(malformed_error!("Offset at position {} points to itself", pos));
        }
        let Some(target) = pos.checked_add(relative) else {
            return Err(out_of_bounds_error!());
        };
        // Every referenced item starts with a 4-byte header
        self.check_range(target, SIZE_UOFFSET)?;

        // Bounded by the buffer length, which fits an i32
        Ok(target as UOffset)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn reference(&self, table: UOffset, slot: VOffset) -> Result<Option<UOffset>> {
        match self.field(table, slot, SIZE_UOFFSET)? {
            Some(pos) => self.follow(pos as UOffset).map(Some),
            None => Ok(None),
        }
    }

    /// Positions of the elements of the reference vector at `pos`.
    #[allow(clippy::cast_possible_truncation)]
    fn offset_vector(&self, pos: UOffset) -> Result<impl Iterator<Item = UOffset>> {
        let len = self.verify_vector(pos, SIZE_UOFFSET, SIZE_UOFFSET)?;
        let start = pos + SIZE_UOFFSET as UOffset;
        Ok((0..len).map(move |index| start + (index * SIZE_UOFFSET) as UOffset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test::{build_record, verify_record, Record, CHILD, ID, NAME},
        Builder, Table,
    };

    fn nested(depth: usize) -> Record {
        let mut record = Record {
            id: 1,
            ..Record::default()
        };
        for level in 0..depth {
            record = Record {
                id: level as u32 + 2,
                child: Some(Box::new(record)),
                ..Record::default()
            };
        }
        record
    }

    fn verify(bytes: &[u8], options: VerifierOptions) -> Result<UOffset> {
        let mut verifier = Verifier::new(bytes, options)?;
        verifier.verify_root(None, verify_record)
    }

    #[test]
    fn accepts_builder_output() -> Result<()> {
        let bytes = build_record(&Record::sample())?;
        let root = verify(&bytes, VerifierOptions::default())?;
        assert_eq!(root, Table::root(bytes.as_slice()).pos());
        Ok(())
    }

    #[test]
    fn rejects_truncation() -> Result<()> {
        let bytes = build_record(&Record::sample())?;
        for len in [0, 3, 8, bytes.len() / 2] {
            assert!(
                verify(&bytes[..len], VerifierOptions::default()).is_err(),
                "truncated to {len} bytes"
            );
        }
        Ok(())
    }

    #[test]
    fn rejects_broken_vtable_link() -> Result<()> {
        let mut bytes = build_record(&Record::sample())?;
        let root = Table::root(bytes.as_slice()).pos() as usize;
        bytes[root..root + 4].copy_from_slice(&i32::MIN.to_le_bytes());
        assert!(matches!(
            verify(&bytes, VerifierOptions::default()),
            Err(Error::OutOfBounds { .. })
        ));
        Ok(())
    }

    #[test]
    fn rejects_unterminated_string() -> Result<()> {
        let mut bytes = build_record(&Record {
            name: Some("abc".to_string()),
            ..Record::default()
        })?;
        let table = Table::root(bytes.as_slice());
        let field = table.pos() + UOffset::from(table.offset(NAME));
        let string = table.indirect(field) as usize;
        bytes[string + 4 + 3] = b'!';

        assert!(matches!(
            verify(&bytes, VerifierOptions::default()),
            Err(Error::Malformed { .. })
        ));
        Ok(())
    }

    #[test]
    fn utf8_check_is_optional() -> Result<()> {
        let mut builder = Builder::new();
        let name = builder.create_byte_string(&[0xC3, 0x28])?;
        builder.start_object(2)?;
        builder.prepend_uoffset_slot(1, name, 0)?;
        let root = builder.end_object()?;
        builder.finish(root)?;
        let bytes = builder.finished_bytes()?;

        assert!(matches!(
            verify(bytes, VerifierOptions::default()),
            Err(Error::Utf8(_))
        ));
        assert!(verify(bytes, VerifierOptions::permissive()).is_ok());
        Ok(())
    }

    #[test]
    fn depth_limit() -> Result<()> {
        let bytes = build_record(&nested(5))?;
        assert!(verify(&bytes, VerifierOptions::default()).is_ok());

        let options = VerifierOptions {
            max_depth: 3,
            ..VerifierOptions::default()
        };
        assert!(matches!(verify(&bytes, options), Err(Error::Malformed { .. })));
        Ok(())
    }

    #[test]
    fn table_limit() -> Result<()> {
        let mut builder = Builder::new();
        let mut tables = Vec::new();
        for value in 0..10u32 {
            builder.start_object(1)?;
            builder.prepend_slot::<u32>(0, value + 1, 0)?;
            tables.push(builder.end_object()?);
        }
        let vector = builder.create_offset_vector(&tables)?;
        builder.start_object(1)?;
        builder.prepend_uoffset_slot(0, vector, 0)?;
        let root = builder.end_object()?;
        builder.finish(root)?;
        let bytes = builder.finished_bytes()?;

        let check = |verifier: &mut Verifier<'_>, table: UOffset| {
            verifier.verify_table_vector_field(table, 4, |verifier, child| {
                verifier.verify_field::<u32>(child, 4)
            })
        };

        let mut verifier = Verifier::new(bytes, VerifierOptions::default())?;
        verifier.verify_root(None, check)?;
        assert_eq!(verifier.num_tables(), 11);
        assert_eq!(verifier.depth(), 0);

        let options = VerifierOptions {
            max_tables: 5,
            ..VerifierOptions::default()
        };
        let mut verifier = Verifier::new(bytes, options)?;
        assert!(verifier.verify_root(None, check).is_err());
        Ok(())
    }

    #[test]
    fn required_fields() -> Result<()> {
        let bytes = build_record(&Record {
            id: 4,
            ..Record::default()
        })?;
        let mut verifier = Verifier::new(&bytes, VerifierOptions::default())?;
        verifier.verify_root(None, |verifier, table| verifier.verify_required(table, ID))?;

        let mut verifier = Verifier::new(&bytes, VerifierOptions::default())?;
        assert!(matches!(
            verifier.verify_root(None, |verifier, table| verifier.verify_required(table, NAME)),
            Err(Error::Malformed { .. })
        ));
        Ok(())
    }

    #[test]
    fn file_identifier() -> Result<()> {
        let mut builder = Builder::new();
        builder.start_object(0)?;
        let root = builder.end_object()?;
        builder.finish_with_file_identifier(root, b"TEST")?;
        let bytes = builder.finished_bytes()?;

        let mut verifier = Verifier::new(bytes, VerifierOptions::default())?;
        verifier.verify_root(Some(b"TEST".as_slice()), |_, _| Ok(()))?;
        assert!(matches!(
            verifier.verify_buffer_header(Some(b"NOPE".as_slice())),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            verifier.verify_buffer_header(Some(b"NO".as_slice())),
            Err(Error::InvalidFileIdentifier(2))
        ));
        Ok(())
    }

    #[test]
    fn alignment_check() -> Result<()> {
        // root table at an odd position, vtable behind it
        let mut bytes = vec![0u8; 14];
        bytes[0..4].copy_from_slice(&5u32.to_le_bytes());
        bytes[5..9].copy_from_slice(&(-5i32).to_le_bytes());
        bytes[10..12].copy_from_slice(&4u16.to_le_bytes());
        bytes[12..14].copy_from_slice(&4u16.to_le_bytes());

        let check = |_: &mut Verifier<'_>, _: UOffset| Ok(());
        let mut verifier = Verifier::new(&bytes, VerifierOptions::default())?;
        assert!(matches!(
            verifier.verify_root(None, check),
            Err(Error::Malformed { .. })
        ));

        let mut verifier = Verifier::new(&bytes, VerifierOptions::permissive())?;
        assert_eq!(verifier.verify_root(None, check)?, 5);
        Ok(())
    }

    #[test]
    fn field_overrunning_table() -> Result<()> {
        let mut bytes = build_record(&Record {
            id: 9,
            ..Record::default()
        })?;
        let table = Table::root(bytes.as_slice());
        let vtable = table.vtable() as usize;
        // shrink the object so the id field no longer fits
        bytes[vtable + 2..vtable + 4].copy_from_slice(&4u16.to_le_bytes());

        let mut verifier = Verifier::new(&bytes, VerifierOptions::default())?;
        assert!(matches!(
            verifier.verify_root(None, |verifier, table| verifier.verify_field::<u32>(table, ID)),
            Err(Error::Malformed { .. })
        ));
        Ok(())
    }

    #[test]
    fn union_member() -> Result<()> {
        let mut builder = Builder::new();
        builder.start_object(1)?;
        builder.prepend_slot::<u16>(0, 5, 0)?;
        let member = builder.end_object()?;
        builder.start_object(2)?;
        builder.prepend_uoffset_slot(1, member, 0)?;
        builder.prepend_slot::<u8>(0, 2, 0)?;
        let root = builder.end_object()?;
        builder.finish(root)?;
        let bytes = builder.finished_bytes()?;

        let mut seen = None;
        let mut verifier = Verifier::new(bytes, VerifierOptions::default())?;
        verifier.verify_root(None, |verifier, table| {
            verifier.verify_union_field(table, 4, 6, |verifier, tag, member| {
                seen = Some(tag);
                verifier.verify_field::<u16>(member, 4)
            })
        })?;
        assert_eq!(seen, Some(2));
        Ok(())
    }

    #[test]
    fn child_table_is_checked() -> Result<()> {
        let mut bytes = build_record(&nested(1))?;
        let root = Table::root(bytes.as_slice());
        let child = root.table_slot(CHILD).unwrap().pos() as usize;
        // vtable length below the two header entries
        let vtable = Table::new(bytes.as_slice(), child as UOffset).vtable() as usize;
        bytes[vtable..vtable + 2].copy_from_slice(&2u16.to_le_bytes());

        assert!(verify(&bytes, VerifierOptions::default()).is_err());
        Ok(())
    }
}
