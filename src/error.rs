use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors fall into three groups. Protocol and capacity violations are raised by the
/// [`crate::Builder`] and signal a defect in the calling code; they abort the current
/// operation and are never worth retrying. Read errors are only produced by the checked
/// paths ([`crate::Verifier`], [`crate::io::read_le_at`], string decoding); the unchecked
/// [`crate::Table`] accessors trust their input and do not return them.
///
/// # Error Categories
///
/// ## Builder protocol violations
/// - [`Error::Nested`] - An object, vector or string was started while another one is open
/// - [`Error::NotNested`] - An operation that requires an open object or vector was called outside one
/// - [`Error::Finished`] - New data was started on a builder that is already finished
/// - [`Error::NotFinished`] - Finished bytes were requested before [`crate::Builder::finish`]
/// - [`Error::SlotOutOfRange`] - A field slot index exceeds the count given to `start_object`
/// - [`Error::InlineOutsideObject`] - An inline struct was not written at the current offset
/// - [`Error::InvalidFileIdentifier`] - A file identifier was not exactly 4 bytes
/// - [`Error::InvalidAlignment`] - An alignment that is not a power of two was requested
/// - [`Error::InvalidOffset`] - A referenced offset does not point into already written data
///
/// ## Capacity violations
/// - [`Error::BufferTooLarge`] - Growing the buffer would exceed the configured maximum
/// - [`Error::ValueTooLarge`] - A length or offset does not fit its on-wire width
///
/// ## Read and verification errors
/// - [`Error::OutOfBounds`] - A checked read would have left the buffer
/// - [`Error::Malformed`] - The buffer does not follow the table/vtable layout
/// - [`Error::Utf8`] - A string payload is not valid UTF-8
///
/// ## I/O
/// - [`Error::FileError`] - Filesystem errors while mapping a buffer from disk
///
/// # Examples
///
/// ```rust
/// use flatscope::{Builder, Error};
///
/// let mut builder = Builder::new();
/// builder.start_object(1)?;
///
/// // A string may not be created while an object is open
/// match builder.create_string("name") {
///     Err(Error::Nested { operation }) => assert_eq!(operation, "create_string"),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// # Ok::<(), flatscope::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Builder protocol errors
    /// An object, vector or string was started while another one is still open.
    ///
    /// Children must be fully built before their parent, and only one object or vector
    /// may be under construction at any time.
    #[error("Incorrect creation order in `{operation}`: object must not be nested")]
    Nested {
        /// The builder operation that was called out of order
        operation: &'static str,
    },

    /// An operation that must run inside an open object or vector was called outside one.
    #[error("Incorrect creation order in `{operation}`: must be inside object")]
    NotNested {
        /// The builder operation that was called out of order
        operation: &'static str,
    },

    /// A builder that was already finished was used to start new data.
    ///
    /// Call [`crate::Builder::reset`] to reuse the allocation for an unrelated buffer.
    #[error("Incorrect use of `{operation}`: builder is already finished")]
    Finished {
        /// The builder operation that was called after `finish`
        operation: &'static str,
    },

    /// The finished bytes of a builder were requested before `finish` was called.
    #[error("Incorrect use of finished bytes: must call `finish` first")]
    NotFinished,

    /// A field slot index is outside the field count passed to `start_object`.
    #[error("Field slot {slot} is out of range for an object with {num_fields} fields")]
    SlotOutOfRange {
        /// The slot index that was written
        slot: usize,
        /// The field count of the currently open object
        num_fields: usize,
    },

    /// An inline struct slot was recorded without the struct being the last written value.
    #[error("Inline data write outside of object - expected offset {expected}, found {found}")]
    InlineOutsideObject {
        /// The offset the caller claims the struct was written at
        expected: u32,
        /// The current builder offset
        found: u32,
    },

    /// A file identifier was provided that is not exactly 4 bytes long.
    #[error("Incorrect file identifier length - {0}")]
    InvalidFileIdentifier(usize),

    /// An alignment or scalar size that is not a power of two was requested.
    #[error("Alignment must be a power of two - {0}")]
    InvalidAlignment(usize),

    /// A referenced offset does not point into data that has already been written.
    #[error("Offset {offset} points past the written data ({written} bytes)")]
    InvalidOffset {
        /// The offset that was referenced
        offset: u32,
        /// The number of bytes written so far
        written: u32,
    },

    /// More vector elements were written than [`crate::Builder::start_vector`] reserved,
    /// leaving no room for the element count.
    #[error("Vector elements overran the space reserved by `start_vector` at offset {offset}")]
    VectorOverrun {
        /// The builder offset when the vector was closed
        offset: u32,
    },

    // Capacity errors
    /// Growing the buffer would exceed the configured maximum buffer size.
    ///
    /// The hard limit is [`crate::types::MAX_BUFFER_SIZE`] (2 GiB), since every offset in
    /// the format is a 32-bit value.
    #[error("Cannot grow buffer to {requested} bytes - maximum is {limit} bytes")]
    BufferTooLarge {
        /// The size the buffer would have grown to
        requested: usize,
        /// The configured maximum size
        limit: usize,
    },

    /// A length or offset does not fit the width it is serialized with.
    ///
    /// Vtable entries are 16-bit, so a single object is limited to 64 KiB of inline data.
    #[error("Value {value} does not fit into {what}")]
    ValueTooLarge {
        /// The value that was too large
        value: usize,
        /// Description of the target field
        what: &'static str,
    },

    // Read errors
    /// An out of bound access was attempted while reading the buffer.
    ///
    /// Only the checked read helpers and the verifier report this error. The fields carry
    /// the source location where the check failed.
    #[error("Out of Bound read would have occurred! - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The buffer is damaged and does not follow the table layout.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A string payload is not valid UTF-8.
    #[error("{0}")]
    Utf8(#[from] std::str::Utf8Error),

    // I/O
    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while opening or mapping a finished
    /// buffer from disk.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
