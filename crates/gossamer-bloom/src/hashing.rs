//! Hash position derivation for the filter.
//!
//! Uses murmur3 with the double hashing technique h(i) = h1 + i * h2, which
//! gives k independent-enough positions from two hash evaluations.

use std::io::Cursor;

/// Hash an element with murmur3 under the given seed.
fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);
    // 128-bit hash, lower 64 bits. Reading from an in-memory cursor cannot fail.
    murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0) as u64
}

/// Compute the k bit positions for an element in an m-bit filter.
pub fn positions(element: &[u8], k: usize, m: usize) -> Vec<usize> {
    let h1 = murmur_hash(element, 0);
    let h2 = murmur_hash(element, 1);

    (0..k)
        .map(|i| {
            let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
            (hash % m as u64) as usize
        })
        .collect()
}
