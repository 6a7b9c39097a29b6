//! The wire-level message record.
//!
//! A [`Message`] carries the reliability metadata the protocol needs: a
//! bounded causal history and a bloom filter snapshot of everything the
//! sender has confirmed sent or delivered. Required and optional fields are
//! explicit:
//!
//! - `causal_history` is always present, possibly empty
//! - `bloom_filter` is optional; a missing or undecodable filter disables
//!   probabilistic acknowledgment for that message, nothing more
//! - `content` is required; zero length marks a *sync* message
//! - `lamport_timestamp` is absent only on *ephemeral* messages

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{ChannelId, MessageId};

/// The wire-level unit of the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Content hash, `SHA-256(content)`.
    pub message_id: MessageId,
    /// Channel this message belongs to.
    pub channel_id: ChannelId,
    /// Sender's logical clock at send time. `None` for ephemeral messages.
    pub lamport_timestamp: Option<u64>,
    /// The tail of the sender's local log at send time, oldest first.
    pub causal_history: Vec<MessageId>,
    /// Serialized snapshot of the sender's bloom filter at send time,
    /// taken before inserting this message's own id.
    pub bloom_filter: Option<Bytes>,
    /// Payload bytes. Empty content marks a sync message.
    pub content: Bytes,
}

/// Classification of a message by its reliability semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Regular payload-carrying message, subject to causal ordering and
    /// acknowledgment tracking.
    Content,
    /// Empty-content message carrying only acknowledgment metadata. Advances
    /// the receiver's lamport clock on delivery but never enters any log or
    /// filter.
    Sync,
    /// Short-lived message with no timestamp, history, or filter. Delivered
    /// immediately on receipt, never tracked.
    Ephemeral,
}

impl Message {
    /// Classify this message.
    pub fn kind(&self) -> MessageKind {
        match self.lamport_timestamp {
            None => MessageKind::Ephemeral,
            Some(_) if self.content.is_empty() => MessageKind::Sync,
            Some(_) => MessageKind::Content,
        }
    }

    /// True if this is a sync (pure acknowledgment) message.
    pub fn is_sync(&self) -> bool {
        self.kind() == MessageKind::Sync
    }

    /// True if this is an ephemeral message.
    pub fn is_ephemeral(&self) -> bool {
        self.kind() == MessageKind::Ephemeral
    }

    /// Encode to wire bytes (CBOR).
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(self, &mut buf)
            .map_err(|e| CoreError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    /// Decode from wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        ciborium::de::from_reader(bytes).map_err(|e| CoreError::Decoding(e.to_string()))
    }

    /// Check that the message id matches its content.
    ///
    /// Sync and content messages are content-addressed; a mismatch means the
    /// sender computed ids differently, which the protocol cannot recover
    /// from.
    pub fn verify_id(&self) -> Result<(), CoreError> {
        let expected = MessageId::compute(&self.content);
        if expected != self.message_id {
            return Err(CoreError::IdMismatch {
                expected: expected.to_hex(),
                actual: self.message_id.to_hex(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_message(payload: &[u8], timestamp: u64) -> Message {
        Message {
            message_id: MessageId::compute(payload),
            channel_id: ChannelId::from("test-channel"),
            lamport_timestamp: Some(timestamp),
            causal_history: vec![MessageId::compute(b"earlier")],
            bloom_filter: Some(Bytes::from_static(&[0u8; 8])),
            content: Bytes::copy_from_slice(payload),
        }
    }

    #[test]
    fn test_kind_content() {
        let msg = content_message(b"payload", 3);
        assert_eq!(msg.kind(), MessageKind::Content);
        assert!(!msg.is_sync());
        assert!(!msg.is_ephemeral());
    }

    #[test]
    fn test_kind_sync() {
        let msg = Message {
            message_id: MessageId::compute(b""),
            channel_id: ChannelId::from("test-channel"),
            lamport_timestamp: Some(7),
            causal_history: vec![],
            bloom_filter: None,
            content: Bytes::new(),
        };
        assert_eq!(msg.kind(), MessageKind::Sync);
    }

    #[test]
    fn test_kind_ephemeral() {
        let msg = Message {
            message_id: MessageId::compute(b"transient"),
            channel_id: ChannelId::from("test-channel"),
            lamport_timestamp: None,
            causal_history: vec![],
            bloom_filter: None,
            content: Bytes::from_static(b"transient"),
        };
        assert_eq!(msg.kind(), MessageKind::Ephemeral);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let msg = content_message(b"over the wire", 42);
        let bytes = msg.encode().unwrap();
        let decoded = Message::decode(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(Message::decode(&[0xff, 0x00, 0x13, 0x37]).is_err());
    }

    #[test]
    fn test_verify_id() {
        let msg = content_message(b"verified", 1);
        assert!(msg.verify_id().is_ok());

        let mut tampered = msg;
        tampered.message_id = MessageId::ZERO;
        assert!(tampered.verify_id().is_err());
    }
}
