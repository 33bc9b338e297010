//! Scalar-safe block layout.
//!
//! A block is one zero byte followed by 31 payload bytes. The top byte being
//! zero bounds every block below 2^248, far under the scalar field modulus.

use super::errors::EncodingError;
use crset_types::strip_hex_prefix;

/// Size of one canonical block.
pub const BLOCK_SIZE: usize = 32;

/// Payload bytes carried by one block.
pub const PAYLOAD_BYTES_PER_BLOCK: usize = BLOCK_SIZE - 1;

/// Decode a hex payload, with or without `0x`.
pub fn decode_payload_hex(payload: &str) -> Result<Vec<u8>, EncodingError> {
    let body = strip_hex_prefix(payload);
    if body.len() % 2 != 0 {
        return Err(EncodingError::format(format!(
            "odd number of hex digits ({})",
            body.len()
        )));
    }
    hex::decode(body).map_err(|e| EncodingError::format(e.to_string()))
}

/// Expand raw bytes into canonical blocks.
///
/// The output is `ceil(len / 31) * 32` bytes; the last window is zero padded.
pub fn canonicalize(raw: &[u8]) -> Vec<u8> {
    let blocks = raw.len().div_ceil(PAYLOAD_BYTES_PER_BLOCK);
    let mut out = Vec::with_capacity(blocks * BLOCK_SIZE);

    for window in raw.chunks(PAYLOAD_BYTES_PER_BLOCK) {
        out.push(0);
        out.extend_from_slice(window);
        out.resize(out.len() + PAYLOAD_BYTES_PER_BLOCK - window.len(), 0);
    }
    out
}

/// Recover the original payload from blob bytes.
///
/// Drops the leading byte of every block and truncates to `logical_len`,
/// which must come from outside the blobs; padding is indistinguishable from
/// trailing zero payload bytes.
pub fn decode<B: AsRef<[u8]>>(blobs: &[B], logical_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(logical_len);
    'blobs: for blob in blobs {
        for block in blob.as_ref().chunks(BLOCK_SIZE) {
            if out.len() >= logical_len {
                break 'blobs;
            }
            out.extend_from_slice(&block[1.min(block.len())..]);
        }
    }
    out.truncate(logical_len);
    out
}
