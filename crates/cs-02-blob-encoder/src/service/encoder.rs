//! Blob encoder service.

use std::sync::Arc;

use crset_types::to_prefixed_hex;
use tracing::{debug, info, warn};

use crate::domain::{
    blob_count, canonicalize, decode_payload_hex, partition, BlobSet, EncodingError, ProvenBlob,
    ProverError, BLOCK_SIZE, DEFAULT_BLOB_SIZE_KIB, MAX_BLOBS_PER_TX,
};
use crate::ports::CommitmentProver;

/// Encodes hex payloads into proven blob sets.
pub struct BlobEncoder {
    prover: Arc<dyn CommitmentProver>,
    blob_size_kib: usize,
}

impl BlobEncoder {
    /// Encoder with the default 128 KiB blob size.
    pub fn new(prover: Arc<dyn CommitmentProver>) -> Self {
        Self::with_blob_size(prover, DEFAULT_BLOB_SIZE_KIB)
    }

    pub fn with_blob_size(prover: Arc<dyn CommitmentProver>, blob_size_kib: usize) -> Self {
        Self {
            prover,
            blob_size_kib,
        }
    }

    pub fn blob_size_kib(&self) -> usize {
        self.blob_size_kib
    }

    /// Blob size in bytes.
    pub fn blob_size(&self) -> usize {
        self.blob_size_kib * 1024
    }

    /// Encode `payload` into an ordered, proven blob set.
    ///
    /// # Errors
    /// - `Format` for malformed hex or a zero blob size
    /// - `CapacityExceeded` when more than six blobs are needed; the prover is
    ///   not called
    /// - `Prover` when commitment or proof fails
    pub async fn encode(&self, payload: &str) -> Result<BlobSet, EncodingError> {
        let blob_size = self.blob_size();
        if blob_size == 0 || blob_size % BLOCK_SIZE != 0 {
            return Err(EncodingError::Format {
                message: format!("blob size {} KiB is not usable", self.blob_size_kib),
            });
        }

        let raw = decode_payload_hex(payload)?;
        let canonical = canonicalize(&raw);

        let count = blob_count(canonical.len(), blob_size);
        if count > MAX_BLOBS_PER_TX {
            warn!(
                payload_bytes = raw.len(),
                blob_count = count,
                "Payload exceeds blob capacity"
            );
            return Err(EncodingError::CapacityExceeded {
                blob_count: count,
                max: MAX_BLOBS_PER_TX,
            });
        }

        let mut proven = Vec::with_capacity(count);
        for (index, data) in partition(&canonical, blob_size).into_iter().enumerate() {
            proven.push(self.prove_blob(index, data).await?);
        }

        info!(
            payload_bytes = raw.len(),
            canonical_bytes = canonical.len(),
            blob_count = proven.len(),
            "Payload encoded into blobs"
        );
        Ok(BlobSet::new(proven, raw.len()))
    }

    async fn prove_blob(&self, index: usize, data: Vec<u8>) -> Result<ProvenBlob, EncodingError> {
        let prover = Arc::clone(&self.prover);

        let proven = tokio::task::spawn_blocking(move || -> Result<ProvenBlob, ProverError> {
            let blob_hex = to_prefixed_hex(&data);
            let commitment = prover.commit(&blob_hex)?;
            let proof = prover.prove(&blob_hex, &commitment)?;
            Ok(ProvenBlob {
                data,
                commitment,
                proof,
            })
        })
        .await
        .map_err(|e| EncodingError::Prover {
            index,
            source: ProverError(format!("prover task failed: {}", e)),
        })?
        .map_err(|source| EncodingError::Prover { index, source })?;

        debug!(index, commitment = %proven.commitment, "Blob proven");
        Ok(proven)
    }
}
