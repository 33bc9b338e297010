//! Error types for the status store.

use thiserror::Error;

/// Errors surfaced by the status store and publication log.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    /// No row exists for the id.
    #[error("Status entry not found: {id}")]
    NotFound { id: String },

    /// A row already exists for the id.
    #[error("Status entry already exists: {id}")]
    Conflict { id: String },

    /// Attempt to move a revoked credential back to valid.
    #[error("Illegal status transition for {id}: revoked entries cannot be reinstated")]
    IllegalTransition { id: String },

    /// A stored value could not be decoded.
    #[error("Corrupt value under key {key}: {message}")]
    Corrupt { key: String, message: String },

    /// Backend I/O failure.
    #[error("Store error: {0}")]
    Store(#[from] KVStoreError),
}

/// Key-value backend errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_error_converts_to_store_error() {
        let kv_err = KVStoreError::IOError {
            message: "disk failure".to_string(),
        };
        let err: StatusError = kv_err.into();

        assert!(matches!(err, StatusError::Store(_)));
        assert!(err.to_string().contains("disk failure"));
    }
}
