//! Storage for finished buffers.
//!
//! A finished buffer is an immutable byte sequence that starts with the root reference.
//! [`FinishedBuffer`] wraps it behind a [`Backend`], so the same read and verification
//! code works for buffers produced in memory by a [`crate::Builder`] and for buffers
//! memory-mapped from disk.
//!
//! # Key Components
//!
//! - [`Backend`] - Bounds-checked access to the raw bytes
//! - [`Memory`] - Owned in-memory backend
//! - [`Physical`] - Memory-mapped file backend
//! - [`FinishedBuffer`] - Cheaply cloneable handle used to read the root table
//!
//! # Examples
//!
//! ```rust
//! use flatscope::{Builder, FinishedBuffer, VerifierOptions};
//!
//! let mut builder = Builder::new();
//! builder.start_object(1)?;
//! builder.prepend_slot::<u32>(0, 12, 0)?;
//! let root = builder.end_object()?;
//! builder.finish_with_file_identifier(root, b"DEMO")?;
//!
//! let buffer = builder.into_finished_buffer()?;
//! assert!(buffer.has_identifier(b"DEMO"));
//!
//! let root = buffer.verify(Some(b"DEMO".as_slice()), VerifierOptions::default())?;
//! assert_eq!(root.get_slot::<u32>(4, 0), 12);
//! # Ok::<(), flatscope::Error>(())
//! ```

mod memory;
mod physical;

pub use memory::Memory;
pub use physical::Physical;

use std::{fmt, fs, path::Path, sync::Arc};

use log::debug;

use crate::{
    table::{buffer_has_identifier, Table},
    types::UOffset,
    verifier::{Verifier, VerifierOptions},
    Result,
};

/// Backend trait for finished buffer storage.
///
/// Implementations own the bytes and hand out bounds-checked views of them. Backends are
/// shared between threads by [`FinishedBuffer`], hence the `Send + Sync` bound.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Arguments
    ///
    /// * `offset` - The starting offset within the data.
    /// * `len` - The length of the slice in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finished, immutable buffer.
///
/// Cloning is cheap; all clones share the same backend.
#[derive(Debug, Clone)]
pub struct FinishedBuffer {
    backend: Arc<dyn Backend>,
}

impl FinishedBuffer {
    /// Wraps bytes already held in memory.
    #[must_use]
    pub fn from_mem(data: Vec<u8>) -> Self {
        FinishedBuffer {
            backend: Arc::new(Memory::new(data)),
        }
    }

    /// Memory-maps a buffer stored on disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let physical = Physical::new(path)?;
        debug!(
            "Mapped finished buffer {} ({} bytes)",
            path.display(),
            physical.len()
        );

        Ok(FinishedBuffer {
            backend: Arc::new(physical),
        })
    }

    /// Memory-maps a buffer from an already opened file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be mapped.
    pub fn from_std_file(file: fs::File) -> Result<Self> {
        Ok(FinishedBuffer {
            backend: Arc::new(Physical::from_std_file(file)?),
        })
    }

    /// Wraps a custom backend.
    #[must_use]
    pub fn from_backend(backend: Arc<dyn Backend>) -> Self {
        FinishedBuffer { backend }
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.backend.data()
    }

    /// Returns a bounds-checked slice of the raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the buffer.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.backend.data_slice(offset, len)
    }

    /// Returns the length of the buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    /// Returns `true` if the buffer carries the given 4-byte file identifier.
    #[must_use]
    pub fn has_identifier(&self, identifier: &[u8]) -> bool {
        buffer_has_identifier(self.data(), identifier)
    }

    /// Returns the root table without any validation.
    ///
    /// # Panics
    /// Accessors on the returned table panic if the buffer is damaged. Use
    /// [`FinishedBuffer::verify`] for untrusted input.
    #[must_use]
    pub fn root(&self) -> Table<&[u8]> {
        Table::root(self.data())
    }

    /// Checks the buffer header and the structure of the root table, then returns it.
    ///
    /// Only the root table itself is checked. Use [`FinishedBuffer::verify_with`] to also
    /// check its fields and children.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] or [`crate::Error::Malformed`] if the buffer is
    /// damaged or does not carry `identifier`.
    pub fn verify(
        &self,
        identifier: Option<&[u8]>,
        options: VerifierOptions,
    ) -> Result<Table<&[u8]>> {
        self.verify_with(identifier, options, |_, _| Ok(()))
    }

    /// Checks the buffer header and the root table, runs `check` on the root table, and
    /// returns it.
    ///
    /// # Errors
    /// Returns the first error found by the verifier or by `check`.
    pub fn verify_with<F>(
        &self,
        identifier: Option<&[u8]>,
        options: VerifierOptions,
        check: F,
    ) -> Result<Table<&[u8]>>
    where
        F: FnOnce(&mut Verifier<'_>, UOffset) -> Result<()>,
    {
        let mut verifier = Verifier::new(self.data(), options)?;
        let root = verifier.verify_root(identifier, check)?;
        Ok(Table::new(self.data(), root))
    }

    /// Writes the raw bytes to `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be written.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.data())?;
        Ok(())
    }
}

impl AsRef<[u8]> for FinishedBuffer {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}
