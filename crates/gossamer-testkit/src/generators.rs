//! Proptest strategies for protocol types.

use bytes::Bytes;
use proptest::prelude::*;

use gossamer_bloom::{BloomFilter, BloomOptions};
use gossamer_core::{ChannelId, Message, MessageId};

/// Arbitrary non-empty payload bytes.
pub fn arb_payload() -> impl Strategy<Value = Bytes> {
    proptest::collection::vec(any::<u8>(), 1..256).prop_map(Bytes::from)
}

/// Arbitrary 32-byte message id (not content-addressed).
pub fn arb_message_id() -> impl Strategy<Value = MessageId> {
    any::<[u8; 32]>().prop_map(MessageId::from_bytes)
}

/// Arbitrary short channel name.
pub fn arb_channel_id() -> impl Strategy<Value = ChannelId> {
    "[a-z][a-z0-9-]{0,15}".prop_map(ChannelId::from)
}

/// Arbitrary causal history of up to `max` ids.
pub fn arb_causal_history(max: usize) -> impl Strategy<Value = Vec<MessageId>> {
    proptest::collection::vec(arb_message_id(), 0..=max)
}

/// Arbitrary serialized filter snapshot: a real filter built under the
/// given options with up to 64 random ids inserted.
pub fn arb_bloom_snapshot(options: BloomOptions) -> impl Strategy<Value = Bytes> {
    proptest::collection::vec(any::<[u8; 32]>(), 0..64).prop_map(move |raw| {
        let mut filter = BloomFilter::new(&options);
        for bytes in raw {
            filter.insert(&MessageId::from_bytes(bytes));
        }
        Bytes::from(filter.to_bytes())
    })
}

/// Arbitrary well-formed content message: the id matches the content, the
/// timestamp is present, the bloom filter is absent or arbitrary bytes.
pub fn arb_content_message() -> impl Strategy<Value = Message> {
    (
        arb_payload(),
        arb_channel_id(),
        1..10_000u64,
        arb_causal_history(4),
        proptest::option::of(proptest::collection::vec(any::<u8>(), 1..64)),
    )
        .prop_map(|(content, channel_id, lamport_timestamp, causal_history, filter)| {
            Message {
                message_id: MessageId::compute(&content),
                channel_id,
                lamport_timestamp: Some(lamport_timestamp),
                causal_history,
                bloom_filter: filter.map(Bytes::from),
                content,
            }
        })
}
