//! # CS-02 Blob Encoder
//!
//! Turns an opaque hex payload into the ordered set of proven blobs carried
//! by one type-3 transaction.
//!
//! ## Pipeline
//!
//! ```text
//! "0x…" ──decode──► bytes ──canonicalize──► 32-byte blocks
//!                                                │
//!                              partition (blob_size_kib × 1024)
//!                                                │
//!                          count ≤ 6 ? ──no──► CapacityExceeded
//!                                                │ yes
//!                         CommitmentProver::commit / prove, in order
//!                                                │
//!                                             BlobSet
//! ```
//!
//! ## Invariants
//!
//! - Every block starts with a zero byte, so its big-endian value is below
//!   the BLS12-381 scalar modulus without any rejection loop.
//! - The blob count is known before the first prover call; an oversized
//!   payload costs no proving work.
//! - An empty payload still yields one all-zero blob.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(feature = "kzg")]
pub use adapters::CKzgProver;
pub use domain::{
    blob_count, canonicalize, decode, partition, BlobSet, EncodingError, ProvenBlob,
    ProverError, BLOCK_SIZE, DEFAULT_BLOB_SIZE_KIB, MAX_BLOBS_PER_TX, PAYLOAD_BYTES_PER_BLOCK,
};
pub use ports::CommitmentProver;
pub use service::BlobEncoder;
