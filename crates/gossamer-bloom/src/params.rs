//! Bloom filter parameter derivation.
//!
//! Formulas:
//! - m = ceil(-n*ln(p) / ln(2)^2)  -- optimal bits
//! - k = round((m/n) * ln(2))      -- optimal hash functions
//! - FPR = (1 - e^(-kn/m))^k

use std::f64::consts::LN_2;

/// Derived filter geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    /// Number of bits in the filter (m).
    pub size_bits: usize,
    /// Number of hash functions (k).
    pub hash_count: usize,
}

impl FilterParams {
    /// Size of the serialized bit array in bytes.
    pub const fn size_bytes(&self) -> usize {
        (self.size_bits + 7) / 8
    }
}

/// Derive optimal parameters for `capacity` elements at `error_rate`.
pub fn optimal_params(capacity: usize, error_rate: f64) -> FilterParams {
    if capacity == 0 {
        return FilterParams {
            size_bits: 1,
            hash_count: 1,
        };
    }

    let n = capacity as f64;
    let m = (-n * error_rate.ln() / (LN_2 * LN_2)).ceil() as usize;
    let k = ((m as f64 / n) * LN_2).round() as usize;

    FilterParams {
        size_bits: m.max(1),
        hash_count: k.clamp(1, 32),
    }
}

/// False positive rate for m bits, n inserted elements, k hashes.
pub fn fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_channel_geometry() {
        // capacity=10_000 at 0.1% error: ~14.4 bits per element, 10 hashes.
        let params = optimal_params(10_000, 0.001);
        assert_eq!(params.hash_count, 10);
        let bits_per_elem = params.size_bits as f64 / 10_000.0;
        assert!(
            bits_per_elem > 14.0 && bits_per_elem < 15.0,
            "got {} bits per element",
            bits_per_elem
        );
    }

    #[test]
    fn test_params_deterministic() {
        assert_eq!(optimal_params(10_000, 0.001), optimal_params(10_000, 0.001));
    }

    #[test]
    fn test_lower_error_rate_needs_more_bits() {
        let loose = optimal_params(1000, 0.1);
        let tight = optimal_params(1000, 0.001);
        assert!(tight.size_bits > loose.size_bits);
    }

    #[test]
    fn test_larger_capacity_needs_more_bits() {
        let small = optimal_params(100, 0.01);
        let large = optimal_params(10_000, 0.01);
        assert!(large.size_bits > small.size_bits);
    }

    #[test]
    fn test_zero_capacity() {
        let params = optimal_params(0, 0.01);
        assert_eq!(params.size_bits, 1);
        assert_eq!(params.hash_count, 1);
    }

    #[test]
    fn test_k_clamped() {
        let params = optimal_params(10, 0.000_000_1);
        assert!(params.hash_count >= 1 && params.hash_count <= 32);
    }

    #[test]
    fn test_fpr_at_capacity_near_target() {
        let params = optimal_params(10_000, 0.001);
        let rate = fpr(params.size_bits, 10_000, params.hash_count);
        assert!(rate < 0.002, "expected <0.2% at capacity, got {}", rate);
    }
}
