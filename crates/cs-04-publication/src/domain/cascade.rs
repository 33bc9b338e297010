//! Serialized cascade payload.

use crset_types::to_prefixed_hex;

/// Salt length prepended to the cascade bytes.
pub const SALT_LEN: usize = 32;

/// Output of a cascade build. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedCascade {
    pub bytes: Vec<u8>,
    pub salt: [u8; SALT_LEN],
    /// Number of filter levels.
    pub depth: usize,
}

impl SerializedCascade {
    /// `"0x" || hex(salt || bytes)`.
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes, &self.salt)
    }

    /// Size of the published payload, salt included.
    pub fn byte_size(&self) -> usize {
        SALT_LEN + self.bytes.len()
    }
}

/// `"0x" || hex(salt || bytes)`.
pub fn to_hex(bytes: &[u8], salt: &[u8; SALT_LEN]) -> String {
    let mut payload = Vec::with_capacity(SALT_LEN + bytes.len());
    payload.extend_from_slice(salt);
    payload.extend_from_slice(bytes);
    to_prefixed_hex(&payload)
}
