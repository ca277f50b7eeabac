//! Shared factories for unit tests.
//!
//! Every test that needs a realistic buffer builds a `Record`, a table that exercises
//! each kind of field the format supports.
//!
//! ```text
//! table Record {
//!     id: uint;              // slot 0
//!     name: string;          // slot 1
//!     score: double;         // slot 2
//!     flags: ubyte;          // slot 3
//!     tags: [ushort];        // slot 4
//!     child: Record;         // slot 5
//!     half: half;            // slot 6
//!     metadata: [KeyValue];  // slot 7
//! }
//! ```

use crate::{
    metadata::Metadata,
    types::{field_index_to_offset, UOffset, VOffset},
    Builder, Float16, Result, Table, Verifier,
};

pub const ID: VOffset = field_index_to_offset(0);
pub const NAME: VOffset = field_index_to_offset(1);
pub const SCORE: VOffset = field_index_to_offset(2);
pub const FLAGS: VOffset = field_index_to_offset(3);
pub const TAGS: VOffset = field_index_to_offset(4);
pub const CHILD: VOffset = field_index_to_offset(5);
pub const HALF: VOffset = field_index_to_offset(6);
pub const METADATA: VOffset = field_index_to_offset(7);

const RECORD_FIELDS: usize = 8;

/// Owned form of a `Record` table; all defaults are zero or absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub id: u32,
    pub name: Option<String>,
    pub score: f64,
    pub flags: u8,
    pub tags: Option<Vec<u16>>,
    pub child: Option<Box<Record>>,
    pub half: Float16,
    pub metadata: Option<Metadata>,
}

impl Record {
    /// A record with every field set and one child.
    pub fn sample() -> Self {
        Record {
            id: 42,
            name: Some("sample".to_string()),
            score: 1.25,
            flags: 3,
            tags: Some(vec![1, 2, 3]),
            child: Some(Box::new(Record {
                id: 7,
                name: Some("abc".to_string()),
                ..Record::default()
            })),
            half: Float16::from_f32(0.5),
            metadata: Some(Metadata::from_pairs([("origin", "test")])),
        }
    }
}

/// Builds a finished buffer whose root is `record`.
pub fn build_record(record: &Record) -> Result<Vec<u8>> {
    let mut builder = Builder::with_capacity(64);
    let root = write_record(&mut builder, record)?;
    builder.finish(root)?;
    Ok(builder.finished_bytes()?.to_vec())
}

/// Writes `record` and its children, returning the offset of the record.
pub fn write_record(builder: &mut Builder, record: &Record) -> Result<UOffset> {
    let child = match &record.child {
        Some(child) => write_record(builder, child)?,
        None => 0,
    };
    let name = match &record.name {
        Some(name) => builder.create_string(name)?,
        None => 0,
    };
    let tags = match &record.tags {
        Some(tags) => builder.create_vector(tags.as_slice())?,
        None => 0,
    };
    let metadata = match &record.metadata {
        Some(metadata) => metadata.write(builder)?,
        None => 0,
    };

    // Widest fields first keeps padding inside the object minimal
    builder.start_object(RECORD_FIELDS)?;
    builder.prepend_slot::<f64>(2, record.score, 0.0)?;
    builder.prepend_slot::<u32>(0, record.id, 0)?;
    builder.prepend_uoffset_slot(1, name, 0)?;
    builder.prepend_uoffset_slot(4, tags, 0)?;
    builder.prepend_uoffset_slot(5, child, 0)?;
    builder.prepend_uoffset_slot(7, metadata, 0)?;
    builder.prepend_slot::<Float16>(6, record.half, Float16::default())?;
    builder.prepend_slot::<u8>(3, record.flags, 0)?;
    builder.end_object()
}

/// Reads a `Record` table back into its owned form.
pub fn read_record(table: Table<&[u8]>) -> Result<Record> {
    let child = match table.table_slot(CHILD) {
        Some(child) => Some(Box::new(read_record(child)?)),
        None => None,
    };
    let metadata = match table.offset(METADATA) {
        0 => None,
        _ => Some(Metadata::read(&table, METADATA)?),
    };

    Ok(Record {
        id: table.get_slot(ID, 0),
        name: table.string_slot(NAME)?.map(str::to_string),
        score: table.get_slot(SCORE, 0.0),
        flags: table.get_slot(FLAGS, 0),
        tags: table
            .vector_slot::<u16>(TAGS)
            .map(|tags| tags.iter().collect()),
        child,
        half: table.get_slot(HALF, Float16::default()),
        metadata,
    })
}

/// Verifies every field of the `Record` at `table`, recursing into the child.
pub fn verify_record(verifier: &mut Verifier<'_>, table: UOffset) -> Result<()> {
    verifier.verify_field::<u32>(table, ID)?;
    verifier.verify_string_field(table, NAME)?;
    verifier.verify_field::<f64>(table, SCORE)?;
    verifier.verify_field::<u8>(table, FLAGS)?;
    verifier.verify_vector_field::<u16>(table, TAGS)?;
    verifier.verify_table_field(table, CHILD, verify_record)?;
    verifier.verify_field::<Float16>(table, HALF)?;
    Metadata::verify(verifier, table, METADATA)
}

#[test]
fn record_roundtrip() -> Result<()> {
    let record = Record::sample();
    let bytes = build_record(&record)?;
    assert_eq!(read_record(Table::root(bytes.as_slice()))?, record);
    Ok(())
}
