//! The per-channel protocol state machine.

use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, warn};

use gossamer_bloom::{BloomFilter, BloomOptions};
use gossamer_core::{ChannelId, Message, MessageId, MessageKind};

use crate::events::ChannelEvent;
use crate::log::CausalLog;

/// Default number of log-tail ids attached to each message.
pub const DEFAULT_CAUSAL_HISTORY_SIZE: usize = 2;

/// Default number of distinct bloom filter sightings required to consider an
/// outgoing message acknowledged.
pub const DEFAULT_ACKNOWLEDGEMENT_COUNT: u32 = 2;

/// Default time a dependency-blocked message may sit in the incoming buffer
/// before the timeout policy (if enabled) drops it.
pub const DEFAULT_RECEIVED_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Configuration for channel behavior.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// How many trailing log entries each message declares as its causal
    /// history.
    pub causal_history_size: usize,
    /// Bloom filter sightings required for probabilistic acknowledgment.
    pub acknowledgement_count: u32,
    /// Whether dependency-blocked messages are eventually dropped.
    pub received_message_timeout_enabled: bool,
    /// Time in the incoming buffer after which a blocked message is dropped.
    pub received_message_timeout: Duration,
    /// Bloom filter geometry; must match across all participants of the
    /// channel.
    pub bloom: BloomOptions,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            causal_history_size: DEFAULT_CAUSAL_HISTORY_SIZE,
            acknowledgement_count: DEFAULT_ACKNOWLEDGEMENT_COUNT,
            received_message_timeout_enabled: false,
            received_message_timeout: DEFAULT_RECEIVED_MESSAGE_TIMEOUT,
            bloom: BloomOptions::default(),
        }
    }
}

/// Result of [`MessageChannel::receive_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Dependencies were satisfied; the message was delivered.
    Delivered,
    /// Dependencies were missing; the message was parked in the incoming
    /// buffer.
    Buffered,
    /// The message was dropped before processing.
    Ignored(IgnoreReason),
}

/// Why a received message was dropped without processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The message id was already received or delivered.
    Duplicate,
    /// This channel originated the message (gossip echo).
    OwnMessage,
    /// The message belongs to a different channel.
    ChannelMismatch,
}

/// Result of [`MessageChannel::sweep_outgoing_buffer`]: the resend-policy
/// partition. The channel makes no retry decision itself.
#[derive(Debug, Clone, Default)]
pub struct OutgoingPartition {
    /// Messages with no acknowledgment evidence at all.
    pub unacknowledged: Vec<Message>,
    /// Messages sighted in at least one peer bloom filter.
    pub possibly_acknowledged: Vec<Message>,
}

/// A message parked until its causal dependencies are satisfied.
#[derive(Debug, Clone)]
struct BufferedMessage {
    message: Message,
    received_at: Instant,
}

/// Protocol state for one participant on one channel.
///
/// Single-owner: all mutators take `&mut self`; the host serializes calls
/// and drives the periodic sweeps.
pub struct MessageChannel {
    channel_id: ChannelId,
    lamport_timestamp: u64,
    filter: BloomFilter,
    outgoing_buffer: Vec<Message>,
    incoming_buffer: Vec<BufferedMessage>,
    acknowledgements: HashMap<MessageId, u32>,
    local_log: CausalLog,
    time_received: HashMap<MessageId, Instant>,
    own_outgoing: HashSet<MessageId>,
    events: VecDeque<ChannelEvent>,
    config: ChannelConfig,
}

impl MessageChannel {
    /// Create a channel with default configuration.
    pub fn new(channel_id: ChannelId) -> Self {
        Self::with_config(channel_id, ChannelConfig::default())
    }

    /// Create a channel with explicit configuration.
    pub fn with_config(channel_id: ChannelId, config: ChannelConfig) -> Self {
        Self {
            channel_id,
            lamport_timestamp: 0,
            filter: BloomFilter::new(&config.bloom),
            outgoing_buffer: Vec::new(),
            incoming_buffer: Vec::new(),
            acknowledgements: HashMap::new(),
            local_log: CausalLog::new(),
            time_received: HashMap::new(),
            own_outgoing: HashSet::new(),
            events: VecDeque::new(),
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sending
    // ─────────────────────────────────────────────────────────────────────────

    /// Phase one of a send: mint the message and queue it.
    ///
    /// Increments the lamport clock and builds a message carrying the log
    /// tail and the current filter snapshot (taken before this message's own
    /// id is inserted). The message is appended to the outgoing buffer
    /// unconditionally; the log and filter stay untouched until
    /// [`confirm_sent`].
    ///
    /// [`confirm_sent`]: Self::confirm_sent
    pub fn prepare_message(&mut self, content: Bytes) -> Message {
        self.lamport_timestamp += 1;
        let message_id = MessageId::compute(&content);
        self.own_outgoing.insert(message_id);

        let message = Message {
            message_id,
            channel_id: self.channel_id.clone(),
            lamport_timestamp: Some(self.lamport_timestamp),
            causal_history: self.local_log.tail(self.config.causal_history_size),
            bloom_filter: Some(Bytes::from(self.filter.to_bytes())),
            content,
        };
        self.outgoing_buffer.push(message.clone());
        message
    }

    /// Phase two of a send: the transport confirmed durable handoff.
    ///
    /// Commits the message into the filter and the causal log. The message
    /// stays in the outgoing buffer until peers acknowledge it. Calling this
    /// for a message that was never prepared, or twice, is a no-op.
    pub fn confirm_sent(&mut self, message: &Message) {
        let Some(timestamp) = message.lamport_timestamp else {
            return;
        };
        if self.local_log.contains(&message.message_id) {
            return;
        }
        self.filter.insert(&message.message_id);
        self.local_log.insert(timestamp, message.message_id);
        self.time_received.insert(message.message_id, Instant::now());
        self.events
            .push_back(ChannelEvent::MessageSent(message.message_id));
    }

    /// Send a message through a transport confirm callback.
    ///
    /// The callback returning `true` means the message was durably handed to
    /// the network; only then is the send committed. A `false` return leaves
    /// the message queued but unconfirmed, which is not an error: the caller
    /// retries via the `unacknowledged` partition of
    /// [`sweep_outgoing_buffer`].
    ///
    /// [`sweep_outgoing_buffer`]: Self::sweep_outgoing_buffer
    pub async fn send_message<F, Fut>(&mut self, content: Bytes, confirm: F) -> Message
    where
        F: FnOnce(&Message) -> Fut,
        Fut: Future<Output = bool>,
    {
        let message = self.prepare_message(content);
        if confirm(&message).await {
            self.confirm_sent(&message);
        }
        message
    }

    /// Build a sync message: an empty-content acknowledgment carrier.
    ///
    /// Increments the lamport clock and snapshots history and filter like a
    /// regular send, but never touches the outgoing buffer, the filter, or
    /// the log.
    pub fn prepare_sync_message(&mut self) -> Message {
        self.lamport_timestamp += 1;
        let content = Bytes::new();
        Message {
            message_id: MessageId::compute(&content),
            channel_id: self.channel_id.clone(),
            lamport_timestamp: Some(self.lamport_timestamp),
            causal_history: self.local_log.tail(self.config.causal_history_size),
            bloom_filter: Some(Bytes::from(self.filter.to_bytes())),
            content,
        }
    }

    /// Send a sync message through a transport confirm callback.
    ///
    /// Returns whether the transport confirmed the handoff.
    pub async fn send_sync_message<F, Fut>(&mut self, confirm: F) -> bool
    where
        F: FnOnce(&Message) -> Fut,
        Fut: Future<Output = bool>,
    {
        let message = self.prepare_sync_message();
        let confirmed = confirm(&message).await;
        if confirmed {
            self.events
                .push_back(ChannelEvent::SyncSent(message.message_id));
        }
        confirmed
    }

    /// Build an ephemeral message: no timestamp, no history, no filter.
    ///
    /// Ephemeral messages carry no reliability metadata and are never
    /// buffered or tracked on either side.
    pub fn prepare_ephemeral_message(&self, content: Bytes) -> Message {
        Message {
            message_id: MessageId::compute(&content),
            channel_id: self.channel_id.clone(),
            lamport_timestamp: None,
            causal_history: Vec::new(),
            bloom_filter: None,
            content,
        }
    }

    /// Send an ephemeral message through a transport confirm callback.
    pub async fn send_ephemeral_message<F, Fut>(&self, content: Bytes, confirm: F) -> bool
    where
        F: FnOnce(&Message) -> Fut,
        Fut: Future<Output = bool>,
    {
        let message = self.prepare_ephemeral_message(content);
        confirm(&message).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Receiving
    // ─────────────────────────────────────────────────────────────────────────

    /// Process a message that arrived from the network.
    ///
    /// First reconciles the sender's acknowledgment evidence against the
    /// outgoing buffer, then either delivers the message (dependencies
    /// satisfied) or parks it in the incoming buffer. Buffered messages do
    /// not advance the lamport clock.
    pub fn receive_message(&mut self, message: Message) -> ReceiveOutcome {
        if message.channel_id != self.channel_id {
            warn!(
                channel = %self.channel_id,
                received = %message.channel_id,
                "dropping message for foreign channel"
            );
            return ReceiveOutcome::Ignored(IgnoreReason::ChannelMismatch);
        }

        let has_content = !message.content.is_empty();
        if has_content && self.time_received.contains_key(&message.message_id) {
            debug!(id = %message.message_id, "dropping duplicate message");
            return ReceiveOutcome::Ignored(IgnoreReason::Duplicate);
        }
        if has_content && self.own_outgoing.contains(&message.message_id) {
            debug!(id = %message.message_id, "dropping echo of own message");
            return ReceiveOutcome::Ignored(IgnoreReason::OwnMessage);
        }

        // Ephemeral messages skip dependency checks and tracking entirely.
        if message.is_ephemeral() {
            self.events
                .push_back(ChannelEvent::MessageDelivered(message.message_id));
            return ReceiveOutcome::Delivered;
        }

        match message.kind() {
            MessageKind::Sync => self
                .events
                .push_back(ChannelEvent::SyncReceived(message.message_id)),
            _ => self
                .events
                .push_back(ChannelEvent::MessageReceived(message.message_id)),
        }

        self.review_ack_status(&message);

        if has_content {
            self.filter.insert(&message.message_id);
        }

        let dependencies_met = message
            .causal_history
            .iter()
            .all(|dep| self.local_log.contains(dep));

        if dependencies_met {
            self.deliver_message(message);
            ReceiveOutcome::Delivered
        } else {
            self.time_received
                .insert(message.message_id, Instant::now());
            self.incoming_buffer.push(BufferedMessage {
                message,
                received_at: Instant::now(),
            });
            ReceiveOutcome::Buffered
        }
    }

    /// Deliver a message whose dependencies are satisfied.
    ///
    /// Advances the lamport clock to `max(local, message)`. Sync messages
    /// stop there: they never enter the log, and `SyncReceived` is their
    /// only event. Ids already in the log are left alone, so redelivery
    /// cannot create duplicate entries.
    fn deliver_message(&mut self, message: Message) {
        let Some(timestamp) = message.lamport_timestamp else {
            return;
        };
        if timestamp > self.lamport_timestamp {
            self.lamport_timestamp = timestamp;
        }
        if message.content.is_empty() {
            return;
        }

        if self.local_log.insert(timestamp, message.message_id) {
            self.time_received
                .insert(message.message_id, Instant::now());
        }
        self.events
            .push_back(ChannelEvent::MessageDelivered(message.message_id));
    }

    /// Reconcile a received message's acknowledgment evidence against the
    /// outgoing buffer.
    ///
    /// Causal-history ids are certain acknowledgments: the peer has the
    /// message in its log. Bloom filter hits are probabilistic and must be
    /// sighted `acknowledgement_count` times before an entry is considered
    /// acknowledged.
    fn review_ack_status(&mut self, received: &Message) {
        for dep in &received.causal_history {
            let before = self.outgoing_buffer.len();
            self.outgoing_buffer.retain(|m| m.message_id != *dep);
            if self.outgoing_buffer.len() != before {
                debug!(id = %dep, "message acknowledged via causal history");
                self.events.push_back(ChannelEvent::MessageAcknowledged(*dep));
            }
            self.acknowledgements.remove(dep);
            // The peer has logged this id; make sure our own future acks
            // reflect it even if we never saw the message ourselves.
            if !self.filter.lookup(dep) {
                self.filter.insert(dep);
            }
        }

        let Some(filter_bytes) = &received.bloom_filter else {
            return;
        };
        let remote = match BloomFilter::from_bytes(filter_bytes, &self.config.bloom) {
            Ok(filter) => filter,
            Err(e) => {
                // A bad filter only disables this phase for this message.
                debug!(id = %received.message_id, error = %e, "undecodable bloom filter");
                return;
            }
        };

        let threshold = self.config.acknowledgement_count;
        let acknowledgements = &mut self.acknowledgements;
        let events = &mut self.events;
        self.outgoing_buffer.retain(|message| {
            if !remote.lookup(&message.message_id) {
                return true;
            }
            let count = acknowledgements
                .get(&message.message_id)
                .copied()
                .unwrap_or(0)
                + 1;
            if count < threshold {
                acknowledgements.insert(message.message_id, count);
                events.push_back(ChannelEvent::PartialAcknowledgement {
                    message_id: message.message_id,
                    count,
                });
                true
            } else {
                acknowledgements.remove(&message.message_id);
                events.push_back(ChannelEvent::MessageAcknowledged(message.message_id));
                false
            }
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sweeps
    // ─────────────────────────────────────────────────────────────────────────

    /// Retry delivery of buffered messages and report what is still missing.
    ///
    /// Messages whose dependencies are now satisfied are delivered and
    /// removed. If the timeout policy is enabled, messages that waited too
    /// long are dropped without delivery (irretrievable loss is a configured
    /// policy outcome, not a protocol error). Returns the deduplicated union
    /// of dependency ids still missing across everything left in the buffer;
    /// acting on it (e.g. requesting retransmission) is the caller's job.
    pub fn sweep_incoming_buffer(&mut self) -> Vec<MessageId> {
        let now = Instant::now();
        let buffered = std::mem::take(&mut self.incoming_buffer);
        let mut missing = Vec::new();
        let mut seen = HashSet::new();

        for entry in buffered {
            let missing_deps: Vec<MessageId> = entry
                .message
                .causal_history
                .iter()
                .filter(|dep| !self.local_log.contains(dep))
                .copied()
                .collect();

            if missing_deps.is_empty() {
                self.deliver_message(entry.message);
                continue;
            }

            if self.config.received_message_timeout_enabled
                && now.duration_since(entry.received_at) > self.config.received_message_timeout
            {
                debug!(
                    id = %entry.message.message_id,
                    "dropping message from incoming buffer after timeout"
                );
                continue;
            }

            for dep in missing_deps {
                if seen.insert(dep) {
                    missing.push(dep);
                }
            }
            self.incoming_buffer.push(entry);
        }

        if !missing.is_empty() {
            self.events
                .push_back(ChannelEvent::MissedMessages(missing.clone()));
        }
        missing
    }

    /// Partition the outgoing buffer for the caller's resend policy.
    ///
    /// Pure: nothing is mutated. A message is possibly acknowledged iff it
    /// has a nonzero sighting count.
    pub fn sweep_outgoing_buffer(&self) -> OutgoingPartition {
        let mut partition = OutgoingPartition::default();
        for message in &self.outgoing_buffer {
            if self.acknowledgements.contains_key(&message.message_id) {
                partition.possibly_acknowledged.push(message.clone());
            } else {
                partition.unacknowledged.push(message.clone());
            }
        }
        partition
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// The channel this state machine belongs to.
    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Current lamport clock value.
    pub fn lamport_timestamp(&self) -> u64 {
        self.lamport_timestamp
    }

    /// The confirmed causal log.
    pub fn local_log(&self) -> &CausalLog {
        &self.local_log
    }

    /// The filter of everything confirmed sent or delivered.
    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    /// Own messages still awaiting acknowledgment.
    pub fn outgoing(&self) -> &[Message] {
        &self.outgoing_buffer
    }

    /// Number of messages blocked on missing dependencies.
    pub fn incoming_len(&self) -> usize {
        self.incoming_buffer.len()
    }

    /// Partial sighting counts for outgoing messages.
    pub fn acknowledgements(&self) -> &HashMap<MessageId, u32> {
        &self.acknowledgements
    }

    /// Drain accumulated channel events.
    pub fn take_events(&mut self) -> Vec<ChannelEvent> {
        self.events.drain(..).collect()
    }
}
