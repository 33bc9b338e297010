//! # Outbound Ports (Driven Ports)

use crate::domain::ProverError;

/// KZG commitment and proof computation for one blob.
///
/// Blobs are passed as `0x`-prefixed hex; results are `0x`-prefixed hex of
/// 48 bytes. Calls are CPU bound and made from a blocking thread.
///
/// Production: `CKzgProver` (feature `kzg`)
pub trait CommitmentProver: Send + Sync {
    /// Commit to a blob.
    fn commit(&self, blob_hex: &str) -> Result<String, ProverError>;

    /// Prove a blob against its commitment.
    fn prove(&self, blob_hex: &str, commitment_hex: &str) -> Result<String, ProverError>;
}
