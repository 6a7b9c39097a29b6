//! Strong type definitions for the Gossamer protocol.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte message identifier, computed as SHA-256(content).
///
/// This is the content-address of a message. Two messages with the same
/// content will have the same MessageId on every replica.
///
/// Ids order by byte comparison, which is the protocol's deterministic
/// tie-break for log entries with equal lamport timestamps.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub [u8; 32]);

impl MessageId {
    /// Compute the id of a message from its content bytes.
    pub fn compute(content: &[u8]) -> Self {
        let digest = Sha256::digest(content);
        Self(digest.into())
    }

    /// Create a new MessageId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero message ID (used as a sentinel).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for MessageId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for MessageId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A logical channel/topic identifier.
///
/// Messages from different channels are never compared.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl ChannelId {
    /// Create a channel id from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the channel name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelId({})", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_deterministic() {
        let content = b"the same bytes";
        assert_eq!(MessageId::compute(content), MessageId::compute(content));
    }

    #[test]
    fn test_message_id_distinct_content() {
        assert_ne!(
            MessageId::compute(b"message-1"),
            MessageId::compute(b"message-2")
        );
    }

    #[test]
    fn test_message_id_empty_content_golden() {
        // SHA-256 of the empty string, the id every sync message carries.
        let id = MessageId::compute(b"");
        assert_eq!(
            id.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_message_id_hex_roundtrip() {
        let id = MessageId::from_bytes([0x42; 32]);
        let hex = id.to_hex();
        let recovered = MessageId::from_hex(&hex).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_message_id_order_matches_hex_order() {
        let a = MessageId::from_bytes([0x01; 32]);
        let b = MessageId::from_bytes([0xfe; 32]);
        assert!(a < b);
        assert!(a.to_hex() < b.to_hex());
    }

    #[test]
    fn test_message_id_display() {
        let id = MessageId::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", id), "abababababababab");
    }

    #[test]
    fn test_channel_id_from_str() {
        let id = ChannelId::from("chat-room");
        assert_eq!(id.as_str(), "chat-room");
        assert_eq!(format!("{}", id), "chat-room");
    }
}
