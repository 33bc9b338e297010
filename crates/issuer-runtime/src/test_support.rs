//! Offline stand-ins for the prover and the chain.

use async_trait::async_trait;
use crset_types::to_prefixed_hex;
use cs_02_blob_encoder::{CommitmentProver, ProverError};
use cs_03_blob_submission::{
    BlobTransactionRequest, ChainClient, InclusionReceipt, SubmissionError,
};

pub const ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

pub struct StubProver;

impl CommitmentProver for StubProver {
    fn commit(&self, _blob_hex: &str) -> Result<String, ProverError> {
        Ok(to_prefixed_hex(&[0xc0; 48]))
    }

    fn prove(&self, _blob_hex: &str, _commitment_hex: &str) -> Result<String, ProverError> {
        Ok(to_prefixed_hex(&[0xd0; 48]))
    }
}

/// Includes every transaction in block 1.
pub struct StubChain;

#[async_trait]
impl ChainClient for StubChain {
    async fn send_blob_transaction(
        &self,
        request: &BlobTransactionRequest,
    ) -> Result<String, SubmissionError> {
        Ok(format!("0x{:064x}", request.blobs.len()))
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<InclusionReceipt>, SubmissionError> {
        Ok(Some(InclusionReceipt {
            tx_hash: tx_hash.to_string(),
            block_number: 1,
            effective_gas_price: 5_000_000_000,
            gas_used: 21_000,
            blob_gas_price: 1,
            blob_gas_used: 131_072,
            blob_versioned_hashes: vec![format!("0x01{}", "00".repeat(31))],
        }))
    }
}
