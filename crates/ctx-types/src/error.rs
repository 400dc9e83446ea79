use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("value not representable as JSON: {0}")]
    NotRepresentable(String),
}
