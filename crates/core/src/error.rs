//! Error types for the serialized codec
//!
//! Decoding reports where it stopped and why. Every variant carries the byte offset
//! into the input so a caller can point at the offending part of a column value.

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Decoding failure for malformed or unsupported serialized text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before the value was complete
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd {
        /// Offset where more input was expected
        offset: usize,
    },

    /// A structural byte was not the one the grammar requires
    #[error("expected {expected} at offset {offset}, found {found:?}")]
    UnexpectedByte {
        /// What the grammar requires here
        expected: &'static str,
        /// The byte actually found
        found: char,
        /// Offset of the byte
        offset: usize,
    },

    /// A numeric field could not be parsed
    #[error("invalid {kind} literal {literal:?} at offset {offset}")]
    InvalidNumber {
        /// Which field was being parsed (integer, float, length, count)
        kind: &'static str,
        /// The literal text
        literal: String,
        /// Offset of the literal
        offset: usize,
    },

    /// A declared string length runs past the end of the input
    #[error("declared length {declared} at offset {offset} exceeds the {available} bytes available")]
    LengthOverrun {
        /// Length declared in the header
        declared: usize,
        /// Bytes remaining after the opening quote
        available: usize,
        /// Offset of the string body
        offset: usize,
    },

    /// Array or object key that is neither an integer nor a string
    #[error("invalid {found} key at offset {offset}")]
    InvalidKey {
        /// Type name of the decoded key
        found: &'static str,
        /// Offset of the key
        offset: usize,
    },

    /// A token of the wider format that cannot be represented in a `Value`
    #[error("unsupported token '{tag}' at offset {offset}")]
    UnsupportedToken {
        /// Type tag of the token
        tag: char,
        /// Offset of the tag
        offset: usize,
    },

    /// Unknown type tag
    #[error("unknown type tag {tag:?} at offset {offset}")]
    UnknownTag {
        /// The tag byte
        tag: char,
        /// Offset of the tag
        offset: usize,
    },

    /// Bytes remain after a complete top-level value
    #[error("trailing data after offset {offset}")]
    TrailingData {
        /// Offset of the first trailing byte
        offset: usize,
    },

    /// Arrays/objects nest deeper than the codec allows
    #[error("nesting depth exceeds maximum of {max} levels at offset {offset}")]
    NestingTooDeep {
        /// Maximum allowed depth
        max: usize,
        /// Offset of the container that exceeded it
        offset: usize,
    },
}

impl DecodeError {
    /// Byte offset the error refers to
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::UnexpectedEnd { offset }
            | DecodeError::UnexpectedByte { offset, .. }
            | DecodeError::InvalidNumber { offset, .. }
            | DecodeError::LengthOverrun { offset, .. }
            | DecodeError::InvalidKey { offset, .. }
            | DecodeError::UnsupportedToken { offset, .. }
            | DecodeError::UnknownTag { offset, .. }
            | DecodeError::TrailingData { offset }
            | DecodeError::NestingTooDeep { offset, .. } => *offset,
        }
    }

    /// True when the input was well-formed but uses a token the value model cannot hold.
    ///
    /// Callers report these as an unknown shape rather than as corrupt data.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DecodeError::UnsupportedToken { .. })
    }
}
