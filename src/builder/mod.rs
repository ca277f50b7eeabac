//! Back-to-front buffer builder.
//!
//! The [`Builder`] serializes data into a growable byte region that is filled from the
//! end toward the front. Children are always written before their parents, so a parent can
//! refer to any child with a forward, relative [`UOffset`] and the finished buffer needs
//! no fix-up pass.
//!
//! # Construction protocol
//!
//! - At most one object or vector is open at any time. Strings, vectors and child objects
//!   must be completed before the object that references them is started.
//! - Object fields are recorded by slot index (`0..num_fields`) and may be written in any
//!   order between [`Builder::start_object`] and [`Builder::end_object`].
//! - [`Builder::finish`] writes the root reference; afterwards the finished bytes can be
//!   taken with [`Builder::finished_bytes`] or [`Builder::into_finished_buffer`].
//!
//! Every violation of the protocol is reported as an [`Error`] instead of producing a
//! corrupt buffer.
//!
//! # Examples
//!
//! ```rust
//! use flatscope::{Builder, Table};
//! use flatscope::types::field_index_to_offset;
//!
//! let mut builder = Builder::new();
//! let name = builder.create_string("hello")?;
//!
//! builder.start_object(3)?;
//! builder.prepend_slot::<i32>(0, 42, 0)?;
//! builder.prepend_uoffset_slot(1, name, 0)?;
//! builder.prepend_slot::<i16>(2, 0, 0)?;
//! let root = builder.end_object()?;
//! builder.finish(root)?;
//!
//! let table = Table::root(builder.finished_bytes()?);
//! assert_eq!(table.get_slot::<i32>(field_index_to_offset(0), 0), 42);
//! assert_eq!(table.string_slot(field_index_to_offset(1))?, Some("hello"));
//! assert_eq!(table.get_slot::<i16>(field_index_to_offset(2), 7), 7);
//! # Ok::<(), flatscope::Error>(())
//! ```

mod config;
mod finish;
mod growth;
mod vector;
mod vtable;

pub use config::BuilderConfig;

use log::debug;

use crate::{
    types::{UOffset, VOffset},
    Error, Result,
};

/// The kind of construction that is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    Object,
    Vector,
}

/// Serializes tables, vectors and strings into a single contiguous buffer.
///
/// Data lives in `bytes[head..]`. Offsets handed out by the builder are measured from
/// the end of that region, so they stay valid when the region is grown and moved.
#[derive(Debug, Clone)]
pub struct Builder {
    /// Backing storage. Only `bytes[head..]` holds written data
    bytes: Vec<u8>,
    /// Index of the first written byte
    head: usize,
    /// Largest alignment requested so far
    minalign: usize,
    /// Field offsets of the open object, `0` for absent fields
    vtable: Vec<UOffset>,
    /// Offset at which the open object started
    object_end: UOffset,
    /// Offsets of every vtable emitted so far, in write order
    vtables: Vec<UOffset>,
    nesting: Option<Nesting>,
    finished: bool,
    config: BuilderConfig,
}

impl Default for Builder {
    fn default() -> Self {
        Builder::with_config(BuilderConfig::default())
    }
}

impl Builder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Builder::default()
    }

    /// Creates a builder that allocates `capacity` bytes up front.
    ///
    /// The capacity only affects how often the buffer has to grow, never the output.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Builder::with_config(BuilderConfig::default().with_initial_capacity(capacity))
    }

    /// Creates a builder from an explicit configuration.
    ///
    /// The initial capacity is clamped to the configured growth ceiling.
    #[must_use]
    pub fn with_config(config: BuilderConfig) -> Self {
        let capacity = config.initial_capacity.min(config.buffer_limit());
        Builder {
            bytes: vec![0; capacity],
            head: capacity,
            minalign: 1,
            vtable: Vec::new(),
            object_end: 0,
            vtables: Vec::new(),
            nesting: None,
            finished: false,
            config,
        }
    }

    /// Clears all written data so the builder can be reused.
    ///
    /// The allocation is kept. Offsets obtained before the reset are meaningless afterwards.
    pub fn reset(&mut self) {
        debug!(
            "Resetting builder - {} bytes written, {} vtables",
            self.offset(),
            self.vtables.len()
        );

        self.head = self.bytes.len();
        self.minalign = 1;
        self.vtable.clear();
        self.object_end = 0;
        self.vtables.clear();
        self.nesting = None;
        self.finished = false;
    }

    /// Returns the number of bytes written so far.
    ///
    /// This is the offset of the most recently written value, measured from the end of the
    /// buffer. It is the value to keep for referencing that value later.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn offset(&self) -> UOffset {
        // The buffer never grows past MAX_BUFFER_SIZE
        (self.bytes.len() - self.head) as UOffset
    }

    /// Returns the index of the first written byte within the backing storage.
    #[must_use]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the largest alignment requested so far.
    #[must_use]
    pub fn minalign(&self) -> usize {
        self.minalign
    }

    /// Returns the size of the backing storage in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the configuration this builder was created with.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Returns `true` while an object or vector is open.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.nesting.is_some()
    }

    /// Returns `true` once [`Builder::finish`] has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the number of distinct vtables written so far.
    #[must_use]
    pub fn num_vtables(&self) -> usize {
        self.vtables.len()
    }

    /// Returns the bytes written so far, finished or not.
    #[must_use]
    pub fn written_bytes(&self) -> &[u8] {
        &self.bytes[self.head..]
    }

    fn assert_not_nested(&self, operation: &'static str) -> Result<()> {
        if self.finished {
            return Err(Error::Finished { operation });
        }
        if self.nesting.is_some() {
            return Err(Error::Nested { operation });
        }
        Ok(())
    }

    fn assert_in(&self, nesting: Nesting, operation: &'static str) -> Result<()> {
        if self.nesting == Some(nesting) {
            Ok(())
        } else {
            Err(Error::NotNested { operation })
        }
    }

    fn assert_finished(&self) -> Result<()> {
        if self.finished {
            Ok(())
        } else {
            Err(Error::NotFinished)
        }
    }
}

/// Narrows a length or distance to a 16-bit vtable entry.
fn to_voffset(value: usize, what: &'static str) -> Result<VOffset> {
    VOffset::try_from(value).map_err(|_| Error::ValueTooLarge { value, what })
}

/// Narrows a length to a 32-bit offset.
fn to_uoffset(value: usize, what: &'static str) -> Result<UOffset> {
    UOffset::try_from(value).map_err(|_| Error::ValueTooLarge { value, what })
}
