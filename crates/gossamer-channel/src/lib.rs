//! # Gossamer Channel
//!
//! The protocol state machine that turns an unordered, lossy, best-effort
//! pub/sub transport into eventual, causally-consistent delivery on a
//! logical channel.
//!
//! ## Overview
//!
//! Each participant owns one [`MessageChannel`] per channel. Every message a
//! participant sends carries two pieces of bounded-size acknowledgment
//! evidence: the tail of its causal log (certain acknowledgment for the ids
//! listed) and a snapshot of its bloom filter (probabilistic acknowledgment
//! for everything else it has seen). Receivers reconcile that evidence
//! against their own outgoing buffer before deciding whether the message's
//! declared dependencies are satisfied.
//!
//! ## Key Properties
//!
//! - **Deterministic ordering**: the causal log sorts by
//!   `(lamport_timestamp, message_id)`, so all replicas converge on one order
//! - **Bounded metadata**: a fixed-length causal history plus a constant-size
//!   bloom filter per message, never full vector clocks
//! - **Failure as data**: an unconfirmed send stays queued and an unsatisfied
//!   dependency stays buffered; neither is an error
//!
//! ## Concurrency
//!
//! A channel is a single-owner state machine: all mutators take `&mut self`
//! and the host serializes calls. The two-phase send API
//! ([`MessageChannel::prepare_message`] / [`MessageChannel::confirm_sent`])
//! decouples transport I/O from state mutation so a slow publish only delays
//! commitment of that one message.

pub mod channel;
pub mod events;
pub mod log;

pub use channel::{
    ChannelConfig, IgnoreReason, MessageChannel, OutgoingPartition, ReceiveOutcome,
};
pub use events::ChannelEvent;
pub use log::{CausalLog, LogEntry};

// Filter types appear in `ChannelConfig` and the channel accessors; re-export
// them so callers can configure geometry without a separate dependency.
pub use gossamer_bloom::{BloomFilter, BloomOptions};
