//! Prover backed by `c-kzg` and the embedded Ethereum trusted setup.

use c_kzg::{Blob, Bytes48, KzgSettings};
use crset_types::to_prefixed_hex;
use tracing::debug;

use crate::domain::ProverError;
use crate::ports::CommitmentProver;

/// `CommitmentProver` using the mainnet KZG settings.
pub struct CKzgProver {
    settings: &'static KzgSettings,
}

impl CKzgProver {
    /// Load the embedded trusted setup (without precomputation).
    pub fn new() -> Self {
        Self {
            settings: c_kzg::ethereum_kzg_settings(0),
        }
    }

    fn blob(blob_hex: &str) -> Result<Blob, ProverError> {
        Blob::from_hex(blob_hex).map_err(|e| ProverError(format!("invalid blob: {:?}", e)))
    }
}

impl Default for CKzgProver {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitmentProver for CKzgProver {
    fn commit(&self, blob_hex: &str) -> Result<String, ProverError> {
        let blob = Self::blob(blob_hex)?;
        let commitment = self
            .settings
            .blob_to_kzg_commitment(&blob)
            .map_err(|e| ProverError(format!("commitment failed: {:?}", e)))?;
        debug!("KZG commitment computed");
        Ok(to_prefixed_hex(&commitment.to_bytes().into_inner()))
    }

    fn prove(&self, blob_hex: &str, commitment_hex: &str) -> Result<String, ProverError> {
        let blob = Self::blob(blob_hex)?;
        let commitment = Bytes48::from_hex(commitment_hex)
            .map_err(|e| ProverError(format!("invalid commitment: {:?}", e)))?;
        let proof = self
            .settings
            .compute_blob_kzg_proof(&blob, &commitment)
            .map_err(|e| ProverError(format!("proof failed: {:?}", e)))?;
        Ok(to_prefixed_hex(&proof.to_bytes().into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_blob_commitment_and_proof() {
        let prover = CKzgProver::new();
        let blob_hex = to_prefixed_hex(&vec![0u8; 131_072]);

        let commitment = prover.commit(&blob_hex).unwrap();
        let proof = prover.prove(&blob_hex, &commitment).unwrap();

        assert_eq!(commitment.len(), 2 + 96);
        assert_eq!(proof.len(), 2 + 96);
    }

    #[test]
    fn test_wrong_size_blob_is_rejected() {
        let prover = CKzgProver::new();
        assert!(prover.commit("0x00ff").is_err());
    }
}
