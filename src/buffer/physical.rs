//! Memory-mapped backend for finished buffers stored on disk.
//!
//! Mapping a file avoids reading it up front. Tables are read lazily as the pages they
//! touch are faulted in, which suits large buffers of which only a few fields are needed.

use super::Backend;
use crate::Result;

use memmap2::Mmap;
use std::{fs, path::Path};

/// A finished buffer backed by a read-only memory mapping of a file.
///
/// The file must not be modified while it is mapped.
///
/// # Examples
///
/// ```rust,no_run
/// use flatscope::{Backend, Physical};
///
/// let physical = Physical::new("record.bin")?;
/// println!("Buffer size: {} bytes", physical.len());
///
/// let root_reference = physical.data_slice(0, 4)?;
/// # Ok::<(), flatscope::Error>(())
/// ```
#[derive(Debug)]
pub struct Physical {
    /// Memory-mapped file data
    data: Mmap,
}

impl Physical {
    /// Create a new physical backend by memory-mapping the specified file.
    ///
    /// # Arguments
    /// * `path` - Path to the buffer on disk. Accepts `&Path`, `&str`, `String`, or `PathBuf`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;
        Physical::from_std_file(file)
    }

    /// Creates a new physical backend from an opened [`std::fs::File`].
    ///
    /// # Arguments
    /// * `file` - An opened file handle
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if memory mapping fails.
    #[allow(clippy::needless_pass_by_value)]
    pub fn from_std_file(file: fs::File) -> Result<Physical> {
        // The mapping is read-only; concurrent writers to the file are not supported
        let data = unsafe { Mmap::map(&file) }?;

        Ok(Physical { data })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(out_of_bounds_error!());
        };

        if offset_end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
