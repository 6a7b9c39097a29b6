//! Common channel fixtures for unit and integration tests.

use bytes::Bytes;

use gossamer_channel::{ChannelConfig, MessageChannel, ReceiveOutcome};
use gossamer_core::{ChannelId, Message};

/// Two channels joined to the same channel id, ready to exchange messages.
pub fn channel_pair(name: &str) -> (MessageChannel, MessageChannel) {
    channel_pair_with_config(name, ChannelConfig::default())
}

/// Like [`channel_pair`] but with explicit configuration on both sides.
pub fn channel_pair_with_config(
    name: &str,
    config: ChannelConfig,
) -> (MessageChannel, MessageChannel) {
    (
        MessageChannel::with_config(ChannelId::from(name), config.clone()),
        MessageChannel::with_config(ChannelId::from(name), config),
    )
}

/// Prepare and confirm in one step: a send whose transport succeeded.
pub fn send_confirmed(channel: &mut MessageChannel, content: &str) -> Message {
    let message = channel.prepare_message(Bytes::copy_from_slice(content.as_bytes()));
    channel.confirm_sent(&message);
    message
}

/// Send from one channel and receive on another, as a perfect mesh would.
///
/// Panics if the receiver does not deliver immediately; use the lower-level
/// calls for loss and reordering scenarios.
pub fn exchange(from: &mut MessageChannel, to: &mut MessageChannel, content: &str) -> Message {
    let message = send_confirmed(from, content);
    let outcome = to.receive_message(message.clone());
    assert_eq!(
        outcome,
        ReceiveOutcome::Delivered,
        "exchange expected immediate delivery of {:?}",
        message.message_id
    );
    message
}
