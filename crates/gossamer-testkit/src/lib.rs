//! # Gossamer Testkit
//!
//! Shared test infrastructure: channel fixtures, proptest generators, and
//! golden vectors. Test-only; never a dependency of production code.

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{channel_pair, channel_pair_with_config, exchange, send_confirmed};
