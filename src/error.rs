//! Error types for the List-of-Clusters index

use thiserror::Error;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, LcError>;

/// Error types that can occur while building, searching, or loading an index
#[derive(Error, Debug)]
pub enum LcError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
