//! Error types for the GBKF codec.
//!
//! Every failure aborts the encode or decode operation in progress. A checksum
//! mismatch is deliberately absent here: it is reported by
//! [`crate::Reader::verifies_checksum`] and never prevents decoding.

use thiserror::Error;

use crate::value_type::{EncodingChoice, StringEncoding, ValueType};

/// Result type for codec operations.
pub type GbkfResult<T> = Result<T, GbkfError>;

/// Errors raised while encoding or decoding a GBKF buffer.
#[derive(Debug, Error)]
pub enum GbkfError {
    /// The buffer does not start with the `gbkf` magic bytes.
    #[error("invalid magic bytes: expected {}, found {}", hex::encode(crate::format::MAGIC), hex::encode(.found))]
    InvalidMagic {
        /// Bytes found where the magic was expected.
        found: Vec<u8>,
    },

    /// A field, header or payload extends past the end of the buffer.
    #[error("truncated data while reading {context}: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedData {
        /// What was being read.
        context: String,
        /// Offset at which the read started.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left in the buffer from `offset`.
        available: usize,
    },

    /// The entry carries a type tag outside the closed tag set.
    #[error("unsupported value type tag: {0}")]
    UnsupportedType(u8),

    /// The header declares a string encoding id this codec does not know.
    #[error("unsupported string encoding id: {0}")]
    UnsupportedEncoding(u16),

    /// Values were accessed or appended with a Rust type that does not match the entry tag.
    #[error("type mismatch: entry holds {stored}, requested {requested}")]
    TypeMismatch {
        /// Tag of the entry.
        stored: ValueType,
        /// Tag corresponding to the requested Rust type.
        requested: ValueType,
    },

    /// A key length disagrees with the declared key width.
    #[error("key width mismatch: declared {declared}, key '{key}' is {found} bytes")]
    KeyWidthMismatch {
        /// Declared key width.
        declared: u8,
        /// Offending key.
        key: String,
        /// Byte length of the offending key.
        found: usize,
    },

    /// A key cannot be stored (for instance it contains a NUL byte).
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// Offending key.
        key: String,
        /// Why the key was rejected.
        reason: String,
    },

    /// A value or parameter exceeds what the wire format can represent.
    #[error("value out of range: {0}")]
    ValueOutOfRange(String),

    /// A string writer was used with a slot whose declared encoding differs.
    #[error("encoding mismatch: {choice} slot declares {declared}, writer requested {requested}")]
    EncodingMismatch {
        /// Slot selected by the call.
        choice: EncodingChoice,
        /// Encoding declared in the header for that slot.
        declared: StringEncoding,
        /// Encoding of the writer that was called.
        requested: StringEncoding,
    },

    /// A string cannot be represented in the requested encoding.
    #[error("invalid {encoding} string {value:?}: {reason}")]
    InvalidString {
        /// Target encoding.
        encoding: StringEncoding,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The buffer is long enough but its content is structurally inconsistent.
    #[error("corrupted data: {context}")]
    CorruptedData {
        /// Description of the inconsistency.
        context: String,
    },

    /// Reading or writing the byte source/sink failed.
    #[error("I/O error during {context}: {source}")]
    Io {
        /// Operation being performed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl GbkfError {
    /// Creates a truncated data error for a read of `needed` bytes at `offset`.
    pub fn truncated<S: Into<String>>(
        context: S,
        offset: usize,
        needed: usize,
        buffer_len: usize,
    ) -> Self {
        Self::TruncatedData {
            context: context.into(),
            offset,
            needed,
            available: buffer_len.saturating_sub(offset),
        }
    }

    /// Creates a corrupted data error.
    pub fn corrupted<S: Into<String>>(context: S) -> Self {
        Self::CorruptedData {
            context: context.into(),
        }
    }

    /// Creates a value out of range error.
    pub fn out_of_range<S: Into<String>>(reason: S) -> Self {
        Self::ValueOutOfRange(reason.into())
    }

    /// Creates an I/O error with context.
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
