//! Error types for the bloom filter.

use thiserror::Error;

/// Errors that can occur when reconstructing a filter from wire bytes.
#[derive(Debug, Error)]
pub enum BloomError {
    /// The serialized bit array does not match the locally configured
    /// filter geometry.
    #[error("filter length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
