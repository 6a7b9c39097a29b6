//! The sorted causal message log.
//!
//! A deterministically ordered sequence of `(lamport_timestamp, message_id)`
//! entries: ascending by timestamp, ties broken by id byte order. The
//! tie-break is the protocol's conflict-resolution rule; every replica that
//! delivers the same set of messages ends up with the same log.

use std::collections::HashSet;

use gossamer_core::MessageId;

/// One confirmed entry in the causal log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry {
    /// Lamport timestamp the message was delivered or confirmed-sent with.
    pub timestamp: u64,
    /// Content-address of the message.
    pub message_id: MessageId,
}

/// Append-friendly ordered container of confirmed message ids.
///
/// Duplicate ids are rejected: redelivery of an already-logged message must
/// not produce a second entry.
#[derive(Debug, Clone, Default)]
pub struct CausalLog {
    entries: Vec<LogEntry>,
    ids: HashSet<MessageId>,
}

impl CausalLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, keeping the log sorted.
    ///
    /// Returns `false` if the id is already present (the log is unchanged).
    pub fn insert(&mut self, timestamp: u64, message_id: MessageId) -> bool {
        if !self.ids.insert(message_id) {
            return false;
        }
        let key = (timestamp, message_id);
        let idx = self
            .entries
            .partition_point(|e| (e.timestamp, e.message_id) < key);
        self.entries.insert(idx, LogEntry {
            timestamp,
            message_id,
        });
        true
    }

    /// Whether an id has been confirmed into the log.
    pub fn contains(&self, message_id: &MessageId) -> bool {
        self.ids.contains(message_id)
    }

    /// The ids of the last `n` entries, oldest first.
    ///
    /// This is the causal history a new message declares.
    pub fn tail(&self, n: usize) -> Vec<MessageId> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].iter().map(|e| e.message_id).collect()
    }

    /// All entries in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
