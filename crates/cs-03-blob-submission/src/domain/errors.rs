//! Error types for blob submission.

use cs_02_blob_encoder::EncodingError;
use thiserror::Error;

/// Errors from assembling, submitting or awaiting a blob transaction.
///
/// All variants are terminal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// Recipient is not `0x` followed by 40 hex digits.
    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    /// Payload was not `0x`-prefixed.
    #[error("Payload is not 0x-prefixed hex")]
    MissingHexPrefix,

    /// Payload could not be encoded into blobs.
    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    /// Node or wallet refused the transaction, or it reverted.
    #[error("Transaction rejected: {message}")]
    Rejected { message: String },

    /// No receipt within the configured inclusion timeout.
    #[error("Transaction {tx_hash} not included within {seconds}s")]
    InclusionTimeout { tx_hash: String, seconds: u64 },

    /// The chain returned no receipt.
    #[error("No receipt for transaction {tx_hash}")]
    NullReceipt { tx_hash: String },

    /// Connection or protocol failure talking to the node.
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl SubmissionError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
