//! # Gossamer
//!
//! Eventual, causally-consistent messaging over lossy pub/sub transports.
//!
//! Gossamer assumes nothing about the transport beyond best-effort
//! broadcast: messages may be lost, duplicated, or reordered. On top of
//! that it provides, per logical channel:
//!
//! - **Causal ordering**: a message is delivered only after the
//!   dependencies it declares, and all replicas converge on the same
//!   deterministic log order
//! - **Acknowledgment without acks**: every message piggybacks a bounded
//!   causal history (certain) and a bloom filter snapshot (probabilistic),
//!   so senders learn what peers have seen without any ack traffic
//! - **Bounded metadata**: per-message overhead is a fixed-length id list
//!   plus a constant-size filter, independent of channel history
//!
//! ## Quick Start
//!
//! ```no_run
//! use bytes::Bytes;
//! use gossamer::{ChannelId, GossipNetwork, Node, NodeConfig};
//!
//! #[tokio::main]
//! async fn main() -> gossamer::Result<()> {
//!     let network = GossipNetwork::new();
//!     let (endpoint, mut inbox) = network.create_endpoint().await;
//!
//!     let mut node = Node::new(endpoint, NodeConfig::default());
//!     let channel = ChannelId::from("my-channel");
//!     node.join_channel(channel.clone());
//!
//!     node.send(&channel, Bytes::from_static(b"hello")).await?;
//!
//!     while let Some(payload) = inbox.recv().await {
//!         node.handle_wire(&payload)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Crate Layout
//!
//! - [`gossamer_core`]: wire message record, content-addressed ids, codec
//! - [`gossamer_bloom`]: the bloom filter used for probabilistic acks
//! - [`gossamer_channel`]: the per-channel protocol state machine
//! - this crate: the [`Node`] front door and transport abstraction

pub mod error;
pub mod node;
pub mod transport;

pub use error::{NodeError, Result};
pub use node::{Node, NodeConfig};
pub use transport::memory::{GossipEndpoint, GossipNetwork, Inbox};
pub use transport::{PublishError, Publisher};

// Re-export the protocol layer so most users need only this crate.
pub use gossamer_channel::{
    BloomFilter, BloomOptions, ChannelConfig, ChannelEvent, IgnoreReason, MessageChannel,
    OutgoingPartition, ReceiveOutcome,
};
pub use gossamer_core::{ChannelId, CoreError, Message, MessageId, MessageKind};
