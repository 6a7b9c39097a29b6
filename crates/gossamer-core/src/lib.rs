//! # Gossamer Core
//!
//! Pure primitives for the Gossamer reliability layer: the message model,
//! content-addressed message ids, and the wire codec.
//!
//! This crate contains no I/O, no networking, and no protocol state. It is
//! pure computation over the data that crosses the transport boundary.
//!
//! ## Key Types
//!
//! - [`Message`] - The wire-level unit of the protocol
//! - [`MessageId`] - Content-addressed identifier (SHA-256 of content)
//! - [`ChannelId`] - Logical channel/topic identifier
//! - [`MessageKind`] - Content, sync, or ephemeral classification
//!
//! ## Determinism
//!
//! [`MessageId::compute`] must yield byte-identical ids for byte-identical
//! content on every replica; the entire acknowledgment scheme depends on it.

pub mod error;
pub mod message;
pub mod types;

pub use error::CoreError;
pub use message::{Message, MessageKind};
pub use types::{ChannelId, MessageId};
