//! Results of issuer operations.

use crset_types::PublicationRecord;

/// A successful publish.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicationOutcome {
    pub log_id: u64,
    pub record: PublicationRecord,
}

/// What a revoke request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// The entry was valid and is now revoked.
    Revoked,
    /// The entry was already revoked, possibly by a concurrent request.
    AlreadyRevoked,
    /// No entry with that id.
    Unknown,
}

impl RevokeOutcome {
    /// Whether this call performed the revocation.
    pub fn revoked(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}
