//! Builder configuration
//!
//! Controls the initial allocation, the growth ceiling, and the two encoding
//! choices that change the produced bytes without changing what a reader sees:
//! vtable deduplication and default elision.

use crate::types::MAX_BUFFER_SIZE;

/// Configuration for a [`crate::Builder`]
///
/// The defaults match the canonical encoding: vtables are shared between objects with the
/// same layout, fields equal to their default are omitted, and the buffer may grow up to
/// [`MAX_BUFFER_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Number of bytes allocated up front (default: 1024)
    pub initial_capacity: usize,

    /// Growth ceiling in bytes; growing past it fails with `BufferTooLarge`.
    /// Values above [`MAX_BUFFER_SIZE`] are clamped to it.
    pub max_buffer_size: usize,

    /// Reuse a previously written, byte-identical vtable instead of emitting a new one
    pub deduplicate_vtables: bool,

    /// Write scalar fields even when they equal their declared default.
    /// Readers observe the same values either way; the buffer only gets larger.
    pub force_defaults: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_buffer_size: MAX_BUFFER_SIZE,
            deduplicate_vtables: true,
            force_defaults: false,
        }
    }
}

impl BuilderConfig {
    /// Creates a configuration for many small buffers: no up-front allocation.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            initial_capacity: 0,
            ..Self::default()
        }
    }

    /// Creates a configuration that skips the vtable history scan.
    ///
    /// Every object gets its own vtable. Useful when objects are heterogeneous and the
    /// scan cost dominates, at the price of larger output.
    #[must_use]
    pub fn streaming() -> Self {
        Self {
            deduplicate_vtables: false,
            ..Self::default()
        }
    }

    /// Sets the number of bytes allocated up front
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the growth ceiling, clamped to [`MAX_BUFFER_SIZE`]
    #[must_use]
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size.min(MAX_BUFFER_SIZE);
        self
    }

    /// Enables or disables vtable deduplication
    #[must_use]
    pub fn with_deduplicate_vtables(mut self, deduplicate_vtables: bool) -> Self {
        self.deduplicate_vtables = deduplicate_vtables;
        self
    }

    /// Enables or disables writing of default-valued fields
    #[must_use]
    pub fn with_force_defaults(mut self, force_defaults: bool) -> Self {
        self.force_defaults = force_defaults;
        self
    }

    /// The effective growth ceiling
    pub(crate) fn buffer_limit(&self) -> usize {
        self.max_buffer_size.min(MAX_BUFFER_SIZE)
    }
}
