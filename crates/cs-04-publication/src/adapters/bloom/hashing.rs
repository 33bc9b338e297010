//! Element hashing for cascade levels.

use std::io::Cursor;

/// MurmurHash3 x64/128 truncated to 64 bits.
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);
    match murmur3::murmur3_x64_128(&mut cursor, seed) {
        Ok(hash) => hash as u64,
        // The only error source is the reader, and a slice cursor never fails.
        Err(e) => unreachable!("in-memory read failed: {}", e),
    }
}

/// `k` bit positions in `[0, m)` by double hashing: `h1 + i·h2`.
pub fn hash_positions(element: &[u8], k: usize, m: usize) -> impl Iterator<Item = usize> {
    let h1 = murmur_hash(element, 0);
    let h2 = murmur_hash(element, 1);
    let m = m.max(1) as u64;

    (0..k as u64).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
}

/// Bytes hashed for `id` at `level`: `salt || level || id`.
pub fn level_key(salt: &[u8], level: u8, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(salt.len() + 1 + id.len());
    key.extend_from_slice(salt);
    key.push(level);
    key.extend_from_slice(id.as_bytes());
    key
}
