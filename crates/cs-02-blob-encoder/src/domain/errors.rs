//! Error types for blob encoding.

use thiserror::Error;

/// Failure reported by a `CommitmentProver`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProverError(pub String);

/// Errors from encoding a payload into a blob set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// Payload is not even-length hex, or the blob size is unusable.
    #[error("Malformed payload: {message}")]
    Format { message: String },

    /// Payload needs more blobs than one transaction may carry.
    #[error("Payload needs {blob_count} blobs, at most {max} fit in one transaction")]
    CapacityExceeded { blob_count: usize, max: usize },

    /// Commitment or proof computation failed.
    #[error("Prover failed on blob {index}: {source}")]
    Prover {
        index: usize,
        #[source]
        source: ProverError,
    },
}

impl EncodingError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}
