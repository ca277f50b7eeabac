//! Finalization of a buffer.

use log::debug;

use super::Builder;
use crate::{
    buffer::FinishedBuffer,
    types::{UOffset, FILE_IDENTIFIER_LENGTH, SIZE_UOFFSET},
    Error, Result,
};

impl Builder {
    /// Finalizes the buffer by writing the reference to the root object.
    ///
    /// The whole buffer is padded to the largest alignment used, so that every value is
    /// correctly aligned once the buffer starts at an address with that alignment.
    ///
    /// # Errors
    /// Returns [`Error::Nested`] if an object or vector is still open,
    /// [`Error::Finished`] if the buffer was already finished, and the errors of
    /// [`Builder::prepend_uoffset`] for an invalid root.
    pub fn finish(&mut self, root: UOffset) -> Result<()> {
        self.assert_not_nested("finish")?;
        let minalign = self.minalign;
        self.prep(minalign, SIZE_UOFFSET)?;
        self.prepend_uoffset(root)?;
        self.finished = true;

        debug!(
            "Finished buffer - {} bytes, {} vtables, alignment {}",
            self.offset(),
            self.vtables.len(),
            self.minalign
        );
        Ok(())
    }

    /// Finalizes the buffer with a 4-byte file identifier placed right after the root
    /// reference.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFileIdentifier`] unless `identifier` is exactly 4 bytes
    /// long, in addition to the errors of [`Builder::finish`].
    pub fn finish_with_file_identifier(&mut self, root: UOffset, identifier: &[u8]) -> Result<()> {
        if identifier.len() != FILE_IDENTIFIER_LENGTH {
            return Err(Error::InvalidFileIdentifier(identifier.len()));
        }
        self.assert_not_nested("finish_with_file_identifier")?;

        let minalign = self.minalign;
        self.prep(minalign, SIZE_UOFFSET + FILE_IDENTIFIER_LENGTH)?;
        for &byte in identifier.iter().rev() {
            self.place::<u8>(byte);
        }
        self.finish(root)
    }

    /// Returns the finished buffer.
    ///
    /// # Errors
    /// Returns [`Error::NotFinished`] before [`Builder::finish`] was called.
    pub fn finished_bytes(&self) -> Result<&[u8]> {
        self.assert_finished()?;
        Ok(&self.bytes[self.head..])
    }

    /// Consumes the builder and hands the finished bytes over without copying them.
    ///
    /// # Errors
    /// Returns [`Error::NotFinished`] before [`Builder::finish`] was called.
    pub fn into_finished_buffer(mut self) -> Result<FinishedBuffer> {
        self.assert_finished()?;
        self.bytes.drain(..self.head);
        Ok(FinishedBuffer::from_mem(self.bytes))
    }

    /// Copies the finished bytes into a [`FinishedBuffer`], keeping the builder usable.
    ///
    /// # Errors
    /// Returns [`Error::NotFinished`] before [`Builder::finish`] was called.
    pub fn to_finished_buffer(&self) -> Result<FinishedBuffer> {
        Ok(FinishedBuffer::from_mem(self.finished_bytes()?.to_vec()))
    }
}
