//! Transaction assembler service.

use std::sync::Arc;
use std::time::Duration;

use crset_types::{is_hex_prefixed, is_valid_address};
use cs_02_blob_encoder::{BlobEncoder, BlobSet};
use tracing::{debug, info, warn};

use crate::domain::{BlobTransactionRequest, FeeCaps, InclusionReceipt, SubmissionError};
use crate::ports::ChainClient;

/// Result of a submitted and included transaction.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Exactly the blobs that were proven and sent.
    pub blobs: BlobSet,
    pub receipt: InclusionReceipt,
}

/// Validates, encodes, submits and awaits one blob transaction.
pub struct TransactionAssembler {
    encoder: BlobEncoder,
    chain: Arc<dyn ChainClient>,
    address: String,
    fees: FeeCaps,
    inclusion_timeout: Option<Duration>,
}

impl TransactionAssembler {
    pub fn new(
        encoder: BlobEncoder,
        chain: Arc<dyn ChainClient>,
        address: impl Into<String>,
        fees: FeeCaps,
    ) -> Self {
        Self {
            encoder,
            chain,
            address: address.into(),
            fees,
            inclusion_timeout: None,
        }
    }

    /// Bound the wait for inclusion.
    pub fn with_inclusion_timeout(mut self, timeout: Duration) -> Self {
        self.inclusion_timeout = Some(timeout);
        self
    }

    /// Self address the transaction is sent to.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn fees(&self) -> FeeCaps {
        self.fees
    }

    /// Publish `payload` as blob data: `prepare` followed by `send`.
    pub async fn submit(&self, payload: &str) -> Result<Submission, SubmissionError> {
        let blobs = self.prepare(payload).await?;
        self.send(blobs).await
    }

    /// Validate the address and payload, then encode and prove the blobs.
    ///
    /// # Errors
    /// `InvalidAddress` and `MissingHexPrefix` are raised before any encoding
    /// work. Encoding errors are passed through as is.
    pub async fn prepare(&self, payload: &str) -> Result<BlobSet, SubmissionError> {
        self.check_address()?;
        if !is_hex_prefixed(payload) {
            return Err(SubmissionError::MissingHexPrefix);
        }

        let blobs = self.encoder.encode(payload).await?;
        debug!(blob_count = blobs.len(), "Blobs prepared");
        Ok(blobs)
    }

    /// Send prepared blobs as a self-transfer and await inclusion.
    ///
    /// # Errors
    /// Chain and inclusion errors are passed through as is.
    pub async fn send(&self, blobs: BlobSet) -> Result<Submission, SubmissionError> {
        self.check_address()?;
        let request = BlobTransactionRequest::self_transfer(&self.address, self.fees, blobs);

        let tx_hash = self.chain.send_blob_transaction(&request).await?;
        info!(%tx_hash, blob_count = request.blobs.len(), "Blob transaction sent");

        let receipt = self.await_inclusion(&tx_hash).await?;
        debug!(
            %tx_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            blob_gas_used = receipt.blob_gas_used,
            "Blob transaction included"
        );

        Ok(Submission {
            blobs: request.blobs,
            receipt,
        })
    }

    fn check_address(&self) -> Result<(), SubmissionError> {
        if is_valid_address(&self.address) {
            Ok(())
        } else {
            Err(SubmissionError::InvalidAddress {
                address: self.address.clone(),
            })
        }
    }

    async fn await_inclusion(&self, tx_hash: &str) -> Result<InclusionReceipt, SubmissionError> {
        let receipt = match self.inclusion_timeout {
            Some(limit) => tokio::time::timeout(limit, self.chain.wait_for_receipt(tx_hash))
                .await
                .map_err(|_| {
                    warn!(%tx_hash, "Inclusion wait timed out");
                    SubmissionError::InclusionTimeout {
                        tx_hash: tx_hash.to_string(),
                        seconds: limit.as_secs(),
                    }
                })??,
            None => self.chain.wait_for_receipt(tx_hash).await?,
        };

        receipt.ok_or_else(|| SubmissionError::NullReceipt {
            tx_hash: tx_hash.to_string(),
        })
    }
}
