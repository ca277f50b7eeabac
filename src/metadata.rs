//! Ordered key/value metadata attached to schema elements.
//!
//! [`Metadata`] keeps two parallel lists of keys and values. Insertion order is
//! preserved and duplicate keys are allowed; lookups return the first match.
//!
//! In a buffer, metadata is a vector of `KeyValue` tables with two string fields,
//! `key` (slot 0) and `value` (slot 1).
//!
//! # Examples
//!
//! ```rust
//! use flatscope::metadata::Metadata;
//!
//! let metadata = Metadata::from_pairs([("unit", "ms")]).with_original_map_type();
//! assert_eq!(metadata.value("unit"), Some("ms"));
//! assert!(metadata.is_original_map_type());
//! ```

use crate::{
    table::{Table, TableVector},
    types::{field_index_to_offset, UOffset, VOffset},
    verifier::Verifier,
    Builder, Result,
};

/// Key holding the original type of a converted schema element.
pub const ORIGINAL_TYPE_KEY: &str = "GOMEM_DATAFRAME_ORIGINAL_TYPE";

/// Key holding the logical type of a schema element. Takes precedence over
/// [`ORIGINAL_TYPE_KEY`].
pub const LOGICAL_TYPE_KEY: &str = "LogicalType";

/// Type name marking an element that was a map before conversion.
pub const MAP_TYPE: &str = "MAP";

const KEY_SLOT: usize = 0;
const VALUE_SLOT: usize = 1;
const KEY_VALUE_FIELDS: usize = 2;

/// Ordered list of key/value string pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    keys: Vec<String>,
    values: Vec<String>,
}

impl Metadata {
    /// Creates metadata from parallel key and value lists.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the lists differ in length.
    pub fn new(keys: Vec<String>, values: Vec<String>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(malformed_error!(
                "Metadata has {} keys but {} values",
                keys.len(),
                values.len()
            ));
        }
        Ok(Metadata { keys, values })
    }

    /// Creates metadata from key/value pairs, in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (keys, values) = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .unzip();
        Metadata { keys, values }
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the values in insertion order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns an iterator over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .zip(&self.values)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the index of the first pair with `key`.
    pub fn find_key(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|candidate| candidate == key)
    }

    /// Returns the value of the first pair with `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.find_key(key).map(|index| self.values[index].as_str())
    }

    /// Appends a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.keys.push(key.into());
        self.values.push(value.into());
    }

    /// Returns a copy with the original type recorded under both type keys.
    #[must_use]
    pub fn with_original_type(&self, original_type: &str) -> Metadata {
        let mut metadata = self.clone();
        metadata.push(ORIGINAL_TYPE_KEY, original_type);
        metadata.push(LOGICAL_TYPE_KEY, original_type);
        metadata
    }

    /// Returns a copy marked as an original map type.
    #[must_use]
    pub fn with_original_map_type(&self) -> Metadata {
        self.with_original_type(MAP_TYPE)
    }

    /// Returns `true` if the element was a map before conversion.
    ///
    /// The logical type is consulted first; the original type only decides when no
    /// logical type is recorded.
    pub fn is_original_map_type(&self) -> bool {
        self.value(LOGICAL_TYPE_KEY)
            .or_else(|| self.value(ORIGINAL_TYPE_KEY))
            .is_some_and(|value| value == MAP_TYPE)
    }

    /// Writes the pairs as a vector of `KeyValue` tables and returns its offset.
    ///
    /// # Errors
    /// Returns the builder's error if the builder is nested, finished or full.
    pub fn write(&self, builder: &mut Builder) -> Result<UOffset> {
        let mut entries = Vec::with_capacity(self.len());
        for (key, value) in self.iter() {
            let key = builder.create_string(key)?;
            let value = builder.create_string(value)?;

            builder.start_object(KEY_VALUE_FIELDS)?;
            builder.prepend_uoffset_slot(VALUE_SLOT, value, 0)?;
            builder.prepend_uoffset_slot(KEY_SLOT, key, 0)?;
            entries.push(builder.end_object()?);
        }
        builder.create_offset_vector(&entries)
    }

    /// Reads the metadata stored in field `slot` of `table`. An absent field is empty
    /// metadata.
    ///
    /// # Errors
    /// Returns [`crate::Error::Utf8`] if a key or value is not valid UTF-8.
    pub fn read<B: AsRef<[u8]>>(table: &Table<B>, slot: VOffset) -> Result<Metadata> {
        match table.table_vector_slot(slot) {
            Some(entries) => Metadata::read_entries(entries),
            None => Ok(Metadata::default()),
        }
    }

    /// Reads metadata from a vector of `KeyValue` tables. Missing keys or values read as
    /// empty strings.
    ///
    /// # Errors
    /// Returns [`crate::Error::Utf8`] if a key or value is not valid UTF-8.
    pub fn read_entries(entries: TableVector<'_>) -> Result<Metadata> {
        let mut metadata = Metadata {
            keys: Vec::with_capacity(entries.len()),
            values: Vec::with_capacity(entries.len()),
        };

        for entry in entries {
            let key = entry.string_slot(key_offset())?.unwrap_or_default();
            let value = entry.string_slot(value_offset())?.unwrap_or_default();
            metadata.push(key, value);
        }
        Ok(metadata)
    }

    /// Verifies the metadata stored in field `slot` of `table`.
    ///
    /// # Errors
    /// Returns the verifier's error for a damaged entry.
    pub fn verify(verifier: &mut Verifier<'_>, table: UOffset, slot: VOffset) -> Result<()> {
        verifier.verify_table_vector_field(table, slot, |verifier, entry| {
            verifier.verify_string_field(entry, key_offset())?;
            verifier.verify_string_field(entry, value_offset())
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn key_offset() -> VOffset {
    field_index_to_offset(KEY_SLOT as VOffset)
}

#[allow(clippy::cast_possible_truncation)]
const fn value_offset() -> VOffset {
    field_index_to_offset(VALUE_SLOT as VOffset)
}
