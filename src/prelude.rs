//! # flatscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! of the flatscope library. Import it to build and read buffers with a single `use`.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all flatscope operations
pub use crate::Error;

/// The result type used throughout flatscope
pub use crate::Result;

// ================================================================================================
// Building
// ================================================================================================

/// Buffer construction
pub use crate::{Builder, BuilderConfig};

// ================================================================================================
// Reading
// ================================================================================================

/// Zero-copy table and vector views
pub use crate::{buffer_has_identifier, Table, TableVector, Vector};

/// Finished buffers and their storage backends
pub use crate::{Backend, FinishedBuffer};

/// Verification of untrusted input
pub use crate::{Verifier, VerifierOptions};

// ================================================================================================
// Scalars and Offsets
// ================================================================================================

/// Scalar encoding
pub use crate::io::{ElementKind, Scalar};

/// Half-precision floats
pub use crate::Float16;

/// Offset kinds
pub use crate::types::{SOffset, UOffset, VOffset};

/// Key/value metadata
pub use crate::metadata::Metadata;
