use std::path::PathBuf;

use ctx_codec::CodecError;
use ctx_types::{Format, TypeError};

/// Errors from context store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The format name is not one of the recognized formats.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The context is neither in memory nor on disk in the requested format.
    #[error("context not found: {name} ({format})")]
    NotFound { name: String, format: Format },

    /// A value could not be encoded, or a file could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A binary file is damaged (bad magic, truncated, checksum mismatch).
    #[error("corrupt file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// A binary file was written by an unknown envelope version.
    #[error("unsupported binary format version: {0}")]
    UnsupportedVersion(u32),

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnsupportedFormat(name) => Self::UnsupportedFormat(name),
            TypeError::NotRepresentable(reason) => Self::Serialization(reason),
        }
    }
}

impl StoreError {
    /// Classify a decode failure for the file at `path`.
    pub(crate) fn from_decode(path: PathBuf, err: CodecError) -> Self {
        match err {
            CodecError::UnsupportedVersion(v) => Self::UnsupportedVersion(v),
            CodecError::Serialization(reason) => Self::Serialization(reason),
            other => Self::Corrupt {
                path,
                reason: other.to_string(),
            },
        }
    }

    /// Classify an encode failure.
    pub(crate) fn from_encode(err: CodecError) -> Self {
        match err {
            CodecError::Serialization(reason) => Self::Serialization(reason),
            other => Self::Serialization(other.to_string()),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
