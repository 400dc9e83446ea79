use thiserror::Error;

/// Errors from encoding or decoding a stored value.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    #[error("unsupported binary format version: {0}")]
    UnsupportedVersion(u32),

    #[error("input too short: {len} bytes, need at least {min}")]
    Truncated { len: usize, min: usize },

    #[error("checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch { expected: u32, computed: u32 },

    /// The value cannot be represented in the target format, or the payload
    /// does not decode to a value.
    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
