//! # Gossamer Bloom
//!
//! The constant-size probabilistic set the protocol attaches to every
//! message: "everything I have confirmed sent or delivered", compressed into
//! a fixed bit array.
//!
//! False positives are possible (a message may look acknowledged when it is
//! not, which is why acknowledgment requires repeated sightings); false
//! negatives are not.
//!
//! Filter geometry is derived deterministically from
//! [`BloomOptions`]`{capacity, error_rate}`, so two replicas configured the
//! same way always agree on the wire size and hash count.

pub mod error;
pub mod filter;
pub mod params;

mod hashing;

pub use error::BloomError;
pub use filter::{BloomFilter, BloomOptions};
pub use params::{fpr, optimal_params, FilterParams};
