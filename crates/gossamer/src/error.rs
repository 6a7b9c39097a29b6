//! Node-level error types.

use thiserror::Error;

use gossamer_core::{ChannelId, CoreError};

use crate::transport::PublishError;

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors surfaced by [`Node`] operations.
///
/// Note what is *not* here: a failed publish of a regular message, a
/// message buffered on missing dependencies, an undecodable bloom filter.
/// Those are protocol states, not errors, and are reported through
/// [`ReceiveOutcome`] and the sweep results instead.
///
/// [`Node`]: crate::node::Node
/// [`ReceiveOutcome`]: gossamer_channel::ReceiveOutcome
#[derive(Debug, Error)]
pub enum NodeError {
    /// The node has not joined this channel.
    #[error("not joined to channel {0}")]
    UnknownChannel(ChannelId),

    /// Wire encoding or decoding failed, or a message id did not match its
    /// content.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),

    /// The transport rejected a publish the caller needed to succeed.
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
}
