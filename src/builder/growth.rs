//! Low-level placement: growth, alignment padding and raw scalar writes.

use log::debug;

use super::Builder;
use crate::{
    io::{write_scalar, Scalar},
    types::{SOffset, UOffset, SIZE_SOFFSET, SIZE_UOFFSET},
    Error, Result,
};

impl Builder {
    /// Doubles the backing storage, moving the written data to the tail of the new region.
    ///
    /// The newly exposed front is zeroed. Growth is capped at the configured maximum; once
    /// the storage has reached it, further growth fails.
    fn grow(&mut self) -> Result<()> {
        let old_len = self.bytes.len();
        let limit = self.config.buffer_limit();
        let doubled = old_len.saturating_mul(2).max(1);
        if old_len >= limit {
            return Err(Error::BufferTooLarge {
                requested: doubled,
                limit,
            });
        }

        let new_len = doubled.min(limit);
        let middle = new_len - old_len;

        self.bytes.resize(new_len, 0);
        self.bytes.copy_within(0..old_len, middle);
        self.bytes[..middle].fill(0);
        self.head += middle;

        debug!("Grew builder buffer from {old_len} to {new_len} bytes");
        Ok(())
    }

    /// Prepares to write a value of `size` bytes after `additional_bytes` more bytes
    /// have been written.
    ///
    /// Pads so that the value ends up aligned to `size` relative to the end of the buffer,
    /// and grows the storage until the padding, the value and `additional_bytes` all fit.
    /// The alignment is also recorded as a candidate for the buffer's minimum alignment.
    ///
    /// # Arguments
    /// * `size` - Size and alignment of the value about to be written, a power of two
    /// * `additional_bytes` - Bytes that will be written before that value
    ///
    /// # Errors
    /// Returns [`Error::Finished`] once the buffer is finished,
    /// [`Error::InvalidAlignment`] if `size` is not a power of two, and
    /// [`Error::BufferTooLarge`] if the storage would have to grow past its maximum.
    pub fn prep(&mut self, size: usize, additional_bytes: usize) -> Result<()> {
        // the root reference must stay the first value of a finished buffer
        if self.finished {
            return Err(Error::Finished { operation: "prep" });
        }
        if !size.is_power_of_two() {
            return Err(Error::InvalidAlignment(size));
        }
        if size > self.minalign {
            self.minalign = size;
        }

        let used = self.bytes.len() - self.head;
        let align_size = used.wrapping_add(additional_bytes).wrapping_neg() & (size - 1);

        let needed = align_size
            .checked_add(size)
            .and_then(|n| n.checked_add(additional_bytes))
            .ok_or(Error::BufferTooLarge {
                requested: usize::MAX,
                limit: self.config.buffer_limit(),
            })?;

        while self.head <= needed {
            self.grow()?;
        }

        self.pad(align_size);
        Ok(())
    }

    /// Writes `count` zero bytes.
    ///
    /// # Panics
    /// Panics if fewer than `count` bytes are free; callers must [`Builder::prep`] first.
    pub fn pad(&mut self, count: usize) {
        self.head -= count;
        self.bytes[self.head..self.head + count].fill(0);
    }

    /// Writes a scalar without any alignment or space check.
    ///
    /// # Panics
    /// Panics if the value does not fit in front of the head; callers must
    /// [`Builder::prep`] first.
    pub fn place<T: Scalar>(&mut self, value: T) {
        self.head -= T::SIZE;
        write_scalar(&mut self.bytes[self.head..], value);
    }

    /// Aligns, grows if needed, and writes a scalar.
    ///
    /// # Errors
    /// Returns [`Error::Finished`] once the buffer is finished, or
    /// [`Error::BufferTooLarge`] if the storage cannot grow.
    pub fn prepend<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.prep(T::SIZE, 0)?;
        self.place(value);
        Ok(())
    }

    /// Writes a reference to previously written data.
    ///
    /// `offset` is a value returned by an earlier builder call. It is stored relative to
    /// its own position, so the reference stays valid wherever the buffer is placed.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOffset`] if `offset` lies past the written data, or
    /// [`Error::BufferTooLarge`] if the storage cannot grow.
    #[allow(clippy::cast_possible_truncation)]
    pub fn prepend_uoffset(&mut self, offset: UOffset) -> Result<()> {
        self.prep(SIZE_UOFFSET, 0)?;
        let written = self.offset();
        if offset > written {
            return Err(Error::InvalidOffset { offset, written });
        }

        self.place::<UOffset>(written - offset + SIZE_UOFFSET as UOffset);
        Ok(())
    }

    /// Writes a signed reference to previously written data.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOffset`] if `offset` lies past the written data, or
    /// [`Error::BufferTooLarge`] if the storage cannot grow.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn prepend_soffset(&mut self, offset: SOffset) -> Result<()> {
        self.prep(SIZE_SOFFSET, 0)?;
        let written = self.offset();
        let target = UOffset::try_from(offset).map_err(|_| Error::InvalidOffset {
            offset: offset as UOffset,
            written,
        })?;
        if target > written {
            return Err(Error::InvalidOffset {
                offset: target,
                written,
            });
        }

        // Bounded by MAX_BUFFER_SIZE, so the distance fits a positive i32
        self.place::<SOffset>((written - target + SIZE_SOFFSET as UOffset) as SOffset);
        Ok(())
    }
}
