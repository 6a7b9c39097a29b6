//! The bloom filter itself.

use bitvec::prelude::*;

use gossamer_core::MessageId;

use crate::error::BloomError;
use crate::hashing::positions;
use crate::params::{optimal_params, FilterParams};

/// Construction options for a filter.
///
/// Both sides of a channel must use the same options: the serialized form
/// carries only the bit array, and the receiver reconstructs geometry from
/// its own configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomOptions {
    /// Expected number of message ids the filter is sized for.
    pub capacity: usize,
    /// Target false positive rate at capacity.
    pub error_rate: f64,
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            error_rate: 0.001,
        }
    }
}

/// A probabilistic set of seen message ids.
///
/// No false negatives: a looked-up id that was inserted always reports
/// present. False positives occur at roughly the configured error rate.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    bits: BitVec<u8, Lsb0>,
    params: FilterParams,
}

impl BloomFilter {
    /// Create an empty filter sized for the given options.
    pub fn new(options: &BloomOptions) -> Self {
        let params = optimal_params(options.capacity, options.error_rate);
        Self {
            bits: bitvec![u8, Lsb0; 0; params.size_bits],
            params,
        }
    }

    /// Insert a message id.
    pub fn insert(&mut self, id: &MessageId) {
        for pos in positions(id.as_bytes(), self.params.hash_count, self.params.size_bits) {
            self.bits.set(pos, true);
        }
    }

    /// Test whether a message id might be present.
    ///
    /// `false` is definitive; `true` may be a false positive.
    pub fn lookup(&self, id: &MessageId) -> bool {
        positions(id.as_bytes(), self.params.hash_count, self.params.size_bits)
            .iter()
            .all(|&pos| self.bits[pos])
    }

    /// Serialize to the raw bit-array bytes carried on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.as_raw_slice().to_vec()
    }

    /// Reconstruct a filter from wire bytes under the given options.
    ///
    /// The byte length must match the options-derived geometry; a mismatch
    /// means sender and receiver disagree on filter configuration.
    pub fn from_bytes(bytes: &[u8], options: &BloomOptions) -> Result<Self, BloomError> {
        let params = optimal_params(options.capacity, options.error_rate);
        if bytes.len() != params.size_bytes() {
            return Err(BloomError::LengthMismatch {
                expected: params.size_bytes(),
                actual: bytes.len(),
            });
        }
        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes.to_vec());
        bits.truncate(params.size_bits);
        Ok(Self { bits, params })
    }

    /// The derived geometry of this filter.
    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// Number of bits currently set.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }
}
