//! Channel lifecycle events.
//!
//! The channel records noteworthy transitions into an internal queue that
//! the host drains with [`MessageChannel::take_events`]. There is no
//! callback machinery: the channel is single-owner, and the host polls.
//!
//! [`MessageChannel::take_events`]: crate::channel::MessageChannel::take_events

use gossamer_core::MessageId;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A locally originated message was confirmed sent (in log and filter).
    MessageSent(MessageId),
    /// A content message arrived and entered receive processing.
    MessageReceived(MessageId),
    /// A message was delivered (its dependencies were satisfied).
    MessageDelivered(MessageId),
    /// A sync message was handed to the transport.
    SyncSent(MessageId),
    /// A sync message arrived from a peer.
    SyncReceived(MessageId),
    /// An outgoing message was fully acknowledged and left the buffer.
    MessageAcknowledged(MessageId),
    /// An outgoing message was sighted in a peer's bloom filter but has not
    /// yet reached the acknowledgment threshold.
    PartialAcknowledgement {
        message_id: MessageId,
        /// Sightings so far.
        count: u32,
    },
    /// Dependencies still missing after an incoming-buffer sweep.
    MissedMessages(Vec<MessageId>),
}
