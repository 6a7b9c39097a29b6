//! The Node: unified API for one participant across its channels.
//!
//! A node owns one [`MessageChannel`] per joined channel, routes incoming
//! wire payloads by channel id, and drives the periodic sweeps that make
//! delivery eventual.

use std::collections::HashMap;

use bytes::Bytes;
use tracing::{debug, warn};

use gossamer_channel::{ChannelConfig, ChannelEvent, MessageChannel, OutgoingPartition, ReceiveOutcome};
use gossamer_core::{ChannelId, Message, MessageId};

use crate::error::{NodeError, Result};
use crate::transport::Publisher;

/// Configuration for a node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Per-channel protocol configuration, applied to every joined channel.
    pub channel: ChannelConfig,
    /// Whether to check that incoming message ids match their content.
    pub verify_ids: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            channel: ChannelConfig::default(),
            verify_ids: true,
        }
    }
}

/// One participant's view of the mesh.
///
/// All mutators take `&mut self`; the caller serializes sends, receives,
/// and sweeps, typically from a single task draining the transport inbox.
pub struct Node<P: Publisher> {
    publisher: P,
    channels: HashMap<ChannelId, MessageChannel>,
    config: NodeConfig,
}

impl<P: Publisher> Node<P> {
    /// Create a node publishing through the given transport.
    pub fn new(publisher: P, config: NodeConfig) -> Self {
        Self {
            publisher,
            channels: HashMap::new(),
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Channel Membership
    // ─────────────────────────────────────────────────────────────────────────

    /// Join a channel, creating fresh protocol state for it.
    ///
    /// Returns `false` if the node was already joined (existing state is
    /// kept).
    pub fn join_channel(&mut self, channel_id: ChannelId) -> bool {
        if self.channels.contains_key(&channel_id) {
            return false;
        }
        let channel = MessageChannel::with_config(channel_id.clone(), self.config.channel.clone());
        self.channels.insert(channel_id, channel);
        true
    }

    /// Leave a channel, discarding its protocol state.
    pub fn leave_channel(&mut self, channel_id: &ChannelId) -> bool {
        self.channels.remove(channel_id).is_some()
    }

    /// The channels this node is joined to.
    pub fn joined_channels(&self) -> Vec<ChannelId> {
        self.channels.keys().cloned().collect()
    }

    /// Protocol state for one channel, for inspection.
    pub fn channel(&self, channel_id: &ChannelId) -> Option<&MessageChannel> {
        self.channels.get(channel_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sending
    // ─────────────────────────────────────────────────────────────────────────

    /// Send a content message on a channel.
    ///
    /// The message is minted and queued before the publish; if the publish
    /// fails the send stays unconfirmed and is retried by [`flush`]. The
    /// returned message is the exact wire record either way.
    ///
    /// [`flush`]: Self::flush
    pub async fn send(&mut self, channel_id: &ChannelId, content: Bytes) -> Result<Message> {
        let channel = self
            .channels
            .get_mut(channel_id)
            .ok_or_else(|| NodeError::UnknownChannel(channel_id.clone()))?;
        let publisher = &self.publisher;

        let message = channel
            .send_message(content, |message| publish_encoded(publisher, message.clone()))
            .await;
        Ok(message)
    }

    /// Send a sync message: acknowledgment metadata with no payload.
    ///
    /// Returns whether the transport accepted it. Sync messages are
    /// fire-and-forget, so a failed publish is simply dropped.
    pub async fn send_sync(&mut self, channel_id: &ChannelId) -> Result<bool> {
        let channel = self
            .channels
            .get_mut(channel_id)
            .ok_or_else(|| NodeError::UnknownChannel(channel_id.clone()))?;
        let publisher = &self.publisher;

        Ok(channel
            .send_sync_message(|message| publish_encoded(publisher, message.clone()))
            .await)
    }

    /// Send an ephemeral message: immediate, untracked, unordered.
    pub async fn send_ephemeral(&mut self, channel_id: &ChannelId, content: Bytes) -> Result<bool> {
        let channel = self
            .channels
            .get(channel_id)
            .ok_or_else(|| NodeError::UnknownChannel(channel_id.clone()))?;
        let publisher = &self.publisher;

        Ok(channel
            .send_ephemeral_message(content, |message| publish_encoded(publisher, message.clone()))
            .await)
    }

    /// Republish every outgoing message with no acknowledgment evidence.
    ///
    /// Covers both sends whose original publish failed and sends no peer
    /// has acknowledged yet. Returns how many messages were republished.
    pub async fn flush(&mut self, channel_id: &ChannelId) -> Result<usize> {
        let channel = self
            .channels
            .get_mut(channel_id)
            .ok_or_else(|| NodeError::UnknownChannel(channel_id.clone()))?;

        let unacknowledged = channel.sweep_outgoing_buffer().unacknowledged;
        let mut republished = 0;
        for message in unacknowledged {
            if publish_encoded(&self.publisher, message.clone()).await {
                // No-op for messages already confirmed on first publish.
                channel.confirm_sent(&message);
                republished += 1;
            }
        }
        Ok(republished)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Receiving
    // ─────────────────────────────────────────────────────────────────────────

    /// Process an encoded message from the transport.
    ///
    /// Decodes, optionally verifies the content address, and routes to the
    /// owning channel. Payloads for channels this node never joined are an
    /// error the caller may choose to ignore; a subscribed transport
    /// normally only delivers joined channels.
    pub fn handle_wire(&mut self, payload: &[u8]) -> Result<ReceiveOutcome> {
        let message = Message::decode(payload)?;
        if self.config.verify_ids {
            message.verify_id()?;
        }

        let Some(channel) = self.channels.get_mut(&message.channel_id) else {
            debug!(channel = %message.channel_id, "payload for unjoined channel");
            return Err(NodeError::UnknownChannel(message.channel_id));
        };
        Ok(channel.receive_message(message))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sweeps
    // ─────────────────────────────────────────────────────────────────────────

    /// Sweep every channel's incoming buffer.
    ///
    /// Returns the dependency ids still missing, per channel; channels with
    /// nothing missing are omitted.
    pub fn sweep_incoming(&mut self) -> HashMap<ChannelId, Vec<MessageId>> {
        let mut missing = HashMap::new();
        for (channel_id, channel) in &mut self.channels {
            let channel_missing = channel.sweep_incoming_buffer();
            if !channel_missing.is_empty() {
                missing.insert(channel_id.clone(), channel_missing);
            }
        }
        missing
    }

    /// Partition every channel's outgoing buffer for the resend policy.
    pub fn sweep_outgoing(&self) -> HashMap<ChannelId, OutgoingPartition> {
        self.channels
            .iter()
            .map(|(channel_id, channel)| (channel_id.clone(), channel.sweep_outgoing_buffer()))
            .collect()
    }

    /// Drain accumulated events from every channel.
    pub fn take_events(&mut self) -> Vec<(ChannelId, ChannelEvent)> {
        let mut events = Vec::new();
        for (channel_id, channel) in &mut self.channels {
            for event in channel.take_events() {
                events.push((channel_id.clone(), event));
            }
        }
        events
    }
}

/// Encode and publish, reporting success as a bool for the channel's
/// confirm callbacks.
async fn publish_encoded<P: Publisher>(publisher: &P, message: Message) -> bool {
    let payload = match message.encode() {
        Ok(payload) => payload,
        Err(e) => {
            warn!(id = %message.message_id, error = %e, "failed to encode message");
            return false;
        }
    };
    match publisher.publish(payload).await {
        Ok(()) => true,
        Err(e) => {
            warn!(id = %message.message_id, error = %e, "publish failed, send stays queued");
            false
        }
    }
}
