//! Transport abstraction for channel messages.
//!
//! The protocol only needs a best-effort broadcast primitive: hand encoded
//! bytes to the pub/sub layer, learn whether the handoff succeeded.
//! Implementations may use libp2p gossipsub, MQTT, or any other fan-out
//! transport; delivery, ordering, and deduplication guarantees are all
//! supplied above the transport by the channel state machine.

use async_trait::async_trait;
use thiserror::Error;

/// The transport refused or failed a publish.
///
/// For regular messages this is not fatal: the message stays in the outgoing
/// buffer and is retried on the next flush.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct PublishError(pub String);

/// Best-effort broadcast into the pub/sub mesh.
///
/// Implementations must be thread-safe (Send + Sync). `Ok(())` means the
/// payload was durably handed to the transport, not that any peer received
/// it.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish an encoded message to all subscribers.
    async fn publish(&self, payload: Vec<u8>) -> Result<(), PublishError>;
}

/// A simple in-memory pub/sub mesh for testing.
///
/// Uses channels to simulate broadcast between endpoints. An endpoint never
/// receives its own publications, matching gossip meshes that suppress
/// self-delivery.
pub mod memory {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::{mpsc, RwLock};

    /// Shared state for the in-memory mesh.
    pub struct GossipNetwork {
        /// Inbox senders for each endpoint, indexed by endpoint id.
        senders: RwLock<Vec<mpsc::Sender<Vec<u8>>>>,
    }

    impl GossipNetwork {
        /// Create a new mesh.
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                senders: RwLock::new(Vec::new()),
            })
        }

        /// Attach an endpoint to this mesh.
        ///
        /// Returns the publishing handle and the endpoint's inbox.
        pub async fn create_endpoint(self: &Arc<Self>) -> (GossipEndpoint, Inbox) {
            let (tx, rx) = mpsc::channel(1000);
            let mut senders = self.senders.write().await;
            let id = senders.len();
            senders.push(tx);
            (
                GossipEndpoint {
                    id,
                    network: Arc::clone(self),
                },
                Inbox { receiver: rx },
            )
        }
    }

    /// A publishing handle attached to a [`GossipNetwork`].
    pub struct GossipEndpoint {
        id: usize,
        network: Arc<GossipNetwork>,
    }

    #[async_trait]
    impl Publisher for GossipEndpoint {
        async fn publish(&self, payload: Vec<u8>) -> Result<(), PublishError> {
            let senders = self.network.senders.read().await;
            for (id, sender) in senders.iter().enumerate() {
                if id != self.id {
                    // Ignore per-peer errors; a full or closed inbox is a
                    // slow subscriber, not a failed broadcast.
                    let _ = sender.send(payload.clone()).await;
                }
            }
            Ok(())
        }
    }

    /// The receiving side of a mesh endpoint.
    pub struct Inbox {
        receiver: mpsc::Receiver<Vec<u8>>,
    }

    impl Inbox {
        /// Receive the next published payload.
        ///
        /// Returns `None` once the mesh is gone.
        pub async fn recv(&mut self) -> Option<Vec<u8>> {
            self.receiver.recv().await
        }

        /// Receive with timeout.
        ///
        /// Returns `None` if the timeout expires before a payload arrives.
        pub async fn recv_timeout(&mut self, timeout: std::time::Duration) -> Option<Vec<u8>> {
            tokio::time::timeout(timeout, self.receiver.recv())
                .await
                .ok()
                .flatten()
        }

        /// Drain everything currently queued without waiting.
        pub fn drain(&mut self) -> Vec<Vec<u8>> {
            let mut payloads = Vec::new();
            while let Ok(payload) = self.receiver.try_recv() {
                payloads.push(payload);
            }
            payloads
        }
    }
}
