//! Blob partitioning and the proven blob set.

/// Most blobs one type-3 transaction may carry.
pub const MAX_BLOBS_PER_TX: usize = 6;

/// Number of blobs needed for `canonical_len` bytes. Never zero.
pub fn blob_count(canonical_len: usize, blob_size: usize) -> usize {
    canonical_len.div_ceil(blob_size).max(1)
}

/// Split canonical bytes into `blob_size` windows, zero padding the last.
///
/// Empty input yields a single all-zero blob.
pub fn partition(canonical: &[u8], blob_size: usize) -> Vec<Vec<u8>> {
    if canonical.is_empty() {
        return vec![vec![0u8; blob_size]];
    }
    canonical
        .chunks(blob_size)
        .map(|window| {
            let mut blob = window.to_vec();
            blob.resize(blob_size, 0);
            blob
        })
        .collect()
}

/// One blob with its commitment and proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenBlob {
    /// Exact bytes handed to the prover.
    pub data: Vec<u8>,
    /// `0x`-prefixed 48-byte commitment.
    pub commitment: String,
    /// `0x`-prefixed 48-byte proof.
    pub proof: String,
}

/// Ordered blobs of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobSet {
    blobs: Vec<ProvenBlob>,
    logical_len: usize,
}

impl BlobSet {
    pub(crate) fn new(blobs: Vec<ProvenBlob>, logical_len: usize) -> Self {
        Self { blobs, logical_len }
    }

    /// Proven blobs in transaction order.
    pub fn blobs(&self) -> &[ProvenBlob] {
        &self.blobs
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Payload length before canonicalization.
    pub fn logical_len(&self) -> usize {
        self.logical_len
    }

    /// Raw blob bytes, in order.
    pub fn data(&self) -> impl Iterator<Item = &[u8]> {
        self.blobs.iter().map(|b| b.data.as_slice())
    }

    /// Recover the payload carried by this set.
    pub fn payload(&self) -> Vec<u8> {
        let data: Vec<&[u8]> = self.data().collect();
        super::canonical::decode(&data, self.logical_len)
    }

    pub fn into_blobs(self) -> Vec<ProvenBlob> {
        self.blobs
    }
}
