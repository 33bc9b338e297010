//! # Outbound Ports (Driven Ports)

use async_trait::async_trait;

use crate::domain::{BlobTransactionRequest, InclusionReceipt, SubmissionError};

/// Signs, sends and tracks blob transactions.
///
/// Production: `JsonRpcChainClient` (feature `rpc`)
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Sign and broadcast the transaction, returning its hash.
    ///
    /// # Errors
    /// `Rejected` when the node refuses it, `Transport` on I/O failure.
    async fn send_blob_transaction(
        &self,
        request: &BlobTransactionRequest,
    ) -> Result<String, SubmissionError>;

    /// Wait until the transaction is included.
    ///
    /// `Ok(None)` means the client gave up without finding a receipt.
    async fn wait_for_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<InclusionReceipt>, SubmissionError>;
}
