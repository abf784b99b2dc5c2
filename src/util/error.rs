//! Error types for the 3dm library.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for archive and dictionary operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The frame does not carry the expected format identifier
    #[error("Format mismatch: expected {expected}, found {found}")]
    FormatMismatch { expected: Uuid, found: Uuid },

    /// Stream is truncated
    #[error("Unexpected end of archive at position {0}")]
    UnexpectedEof(u64),

    /// Chunk framing is broken or the frame calls are unbalanced
    #[error("Invalid archive structure: {0}")]
    InvalidStructure(String),

    /// A length or depth read from the archive exceeds the configured limit
    #[error("{what} {value} exceeds limit {limit}")]
    LimitExceeded {
        what: &'static str,
        value: u64,
        limit: u64,
    },

    /// Payload bytes do not decode to a valid value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create an invalid value error.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// True for failures of the underlying stream or its framing, as opposed
    /// to a format mismatch or a bad payload.
    pub fn is_archive_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::UnexpectedEof(_) | Self::InvalidStructure(_) | Self::LimitExceeded { .. }
        )
    }
}

/// Result type alias for archive and dictionary operations.
pub type Result<T> = std::result::Result<T, Error>;
