// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'buffer/physical.rs' uses mmap to map a finished buffer into memory

//! # flatscope
//!
//! A zero-copy binary serialization library. Structured data is encoded into a single
//! contiguous, little-endian byte buffer that can be read in place, without parsing or
//! allocating, from memory or straight from a memory-mapped file.
//!
//! ## Features
//!
//! - **📦 Zero-copy reads** - Fields are read directly from the buffer on access
//! - **🧬 Schema evolution** - Absent fields read as defaults, unknown fields are skipped
//! - **🗜️ Compact encoding** - Default values are elided and identical vtables are shared
//! - **🛡️ Verification** - Untrusted buffers are checked before any unchecked read
//! - **⚡ Relocatable buffers** - All references are relative; no fix-up after loading
//!
//! ## Wire format
//!
//! A buffer starts with a 32-bit reference to its root table, optionally followed by a
//! 4-byte file identifier. A table begins with a signed offset to its vtable; the vtable
//! lists where each field lives inside the table, with `0` marking an absent field.
//! Vectors and strings are a 32-bit length followed by their elements; strings carry an
//! extra `0` terminator. See [`types`] for the exact layout.
//!
//! ## Quick Start
//!
//! ```rust
//! use flatscope::prelude::*;
//! use flatscope::types::field_index_to_offset;
//!
//! // Children first: the string must exist before the table that refers to it
//! let mut builder = Builder::new();
//! let name = builder.create_string("hello")?;
//!
//! builder.start_object(3)?;
//! builder.prepend_slot::<i32>(0, 42, 0)?;
//! builder.prepend_uoffset_slot(1, name, 0)?;
//! builder.prepend_slot::<i16>(2, 0, 0)?; // equals its default, so it is not written
//! let root = builder.end_object()?;
//! builder.finish(root)?;
//!
//! let table = Table::root(builder.finished_bytes()?);
//! assert_eq!(table.get_slot::<i32>(field_index_to_offset(0), 0), 42);
//! assert_eq!(table.string_slot(field_index_to_offset(1))?, Some("hello"));
//! assert_eq!(table.get_slot::<i16>(field_index_to_offset(2), 0), 0);
//! # Ok::<(), flatscope::Error>(())
//! ```
//!
//! ## Reading untrusted input
//!
//! ```rust
//! use flatscope::prelude::*;
//!
//! # let mut builder = Builder::new();
//! # builder.start_object(0)?;
//! # let root = builder.end_object()?;
//! # builder.finish(root)?;
//! # let received = builder.finished_bytes()?.to_vec();
//! let buffer = FinishedBuffer::from_mem(received);
//! let root = buffer.verify(None, VerifierOptions::strict())?;
//! println!("root table at {}", root.pos());
//! # Ok::<(), flatscope::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result`]. Builder misuse, such as starting an object
//! while another one is open, is reported as an [`Error`] rather than producing a
//! corrupt buffer. The unchecked [`Table`] accessors panic on damaged input; use the
//! [`Verifier`] first when the producer is not trusted.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use flatscope::prelude::*;
///
/// let mut builder = Builder::new();
/// let root = builder.create_string("root")?;
/// builder.finish(root)?;
/// # Ok::<(), flatscope::Error>(())
/// ```
pub mod prelude;

/// Offset kinds, layout constants and slot helpers of the wire format.
pub mod types;

/// Scalar encoding and bounds-checked little-endian access.
///
/// # Key Types
///
/// - [`io::Scalar`] - Fixed-size value that can be stored in a buffer
/// - [`io::ElementKind`] - Registry of all scalar kinds with size and alignment
pub mod io;

/// Back-to-front construction of buffers.
///
/// The [`Builder`] is the only way to produce buffers; see the module documentation for
/// the construction protocol.
pub mod builder;

/// Zero-copy readers for tables and vectors.
pub mod table;

/// Owned and memory-mapped storage of finished buffers.
pub mod buffer;

/// Bounds-checked verification of untrusted buffers.
pub mod verifier;

/// Key/value metadata stored as a vector of tables.
pub mod metadata;

mod float16;

/// `flatscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `flatscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// Builder and its configuration.
pub use builder::{Builder, BuilderConfig};

/// Table readers.
pub use table::{buffer_has_identifier, Table, TableVector, Vector};

/// Finished buffer storage.
pub use buffer::{Backend, FinishedBuffer, Memory, Physical};

/// Verification of untrusted buffers.
pub use verifier::{Verifier, VerifierOptions};

/// Half-precision floating point scalar.
pub use float16::Float16;
