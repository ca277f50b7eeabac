//! Verifier limits and checks

/// Options controlling how strictly a [`crate::Verifier`] checks a buffer
///
/// The depth and table limits bound the work done on hostile input, for example a buffer
/// whose tables reference each other in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierOptions {
    /// Maximum nesting depth of tables (default: 64)
    pub max_depth: usize,

    /// Maximum number of tables visited in one verification (default: 1,000,000)
    pub max_tables: usize,

    /// Reject scalars, offsets and vtables that are not naturally aligned
    pub check_alignment: bool,

    /// Reject strings whose payload is not valid UTF-8
    pub check_utf8: bool,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_tables: 1_000_000,
            check_alignment: true,
            check_utf8: true,
        }
    }
}

impl VerifierOptions {
    /// Creates options for small messages from untrusted peers
    ///
    /// Same checks as the default with much tighter work limits.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_depth: 16,
            max_tables: 10_000,
            ..Self::default()
        }
    }

    /// Creates options that only guard against out of bounds access
    ///
    /// Alignment and UTF-8 are not checked, and the work limits are raised. Suited for
    /// buffers from a trusted producer that were copied to an unaligned location.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_depth: 256,
            max_tables: usize::MAX,
            check_alignment: false,
            check_utf8: false,
        }
    }
}
