//! Error types for Gossamer Core.

use thiserror::Error;

/// Core errors that can occur on the wire boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("message id mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: String, actual: String },
}
