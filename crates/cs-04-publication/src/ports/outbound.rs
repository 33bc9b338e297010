//! # Outbound Ports (Driven Ports)

use std::collections::HashSet;

use crate::domain::{cascade, CascadeError, SerializedCascade, SALT_LEN};

/// Builds a revocation filter cascade from the two id sets.
///
/// Production: `BloomCascadeBuilder`
pub trait CascadeBuilder: Send + Sync {
    /// Build a cascade sized for `capacity` valid ids.
    fn build(
        &self,
        valid: &HashSet<String>,
        invalid: &HashSet<String>,
        capacity: f64,
    ) -> Result<SerializedCascade, CascadeError>;

    /// Hex form of a built cascade.
    fn to_hex(&self, bytes: &[u8], salt: &[u8; SALT_LEN]) -> String {
        cascade::to_hex(bytes, salt)
    }
}
