//! Domain layer: block canonicalization, blob partitioning, errors.

pub mod blob;
pub mod canonical;
pub mod errors;

pub use blob::{blob_count, partition, BlobSet, ProvenBlob, MAX_BLOBS_PER_TX};
pub use canonical::{
    canonicalize, decode, decode_payload_hex, BLOCK_SIZE, PAYLOAD_BYTES_PER_BLOCK,
};
pub use errors::{EncodingError, ProverError};

/// Blob size used by the publication pipeline, in KiB.
pub const DEFAULT_BLOB_SIZE_KIB: usize = 128;
