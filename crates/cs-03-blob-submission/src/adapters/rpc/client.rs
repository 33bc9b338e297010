//! HTTP JSON-RPC client with local EIP-4844 signing.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_consensus::{SignableTransaction, TxEip4844, TxEip4844Variant, TxEip4844WithSidecar, TxEnvelope};
use alloy_eips::eip2718::Encodable2718;
use alloy_eips::eip4844::{Blob, BlobTransactionSidecar, Bytes48};
use alloy_eips::eip7594::BlobTransactionSidecarVariant;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use crset_types::to_prefixed_hex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::types::{
    parse_u64_quantity, JsonRpcRequest, JsonRpcResponse, RpcReceipt, RpcTransaction,
};
use crate::domain::{BlobTransactionRequest, InclusionReceipt, SubmissionError};
use crate::ports::ChainClient;

/// Version byte of a KZG versioned hash.
const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// Connection settings for `JsonRpcChainClient`.
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    pub url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Delay between receipt polls.
    pub poll_interval: Duration,
    /// Give up after this many polls; `None` polls until included.
    pub max_polls: Option<u32>,
}

impl RpcClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(4),
            max_polls: None,
        }
    }
}

/// `ChainClient` over Ethereum JSON-RPC.
pub struct JsonRpcChainClient {
    client: Client,
    config: RpcClientConfig,
    signer: PrivateKeySigner,
    request_id: AtomicU64,
}

impl JsonRpcChainClient {
    /// Create a client signing with `private_key` (hex, optional `0x`).
    pub fn new(config: RpcClientConfig, private_key: &str) -> Result<Self, SubmissionError> {
        let signer = PrivateKeySigner::from_str(private_key)
            .map_err(|e| SubmissionError::rejected(format!("invalid signing key: {}", e)))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| SubmissionError::transport(e.to_string()))?;

        Ok(Self {
            client,
            config,
            signer,
            request_id: AtomicU64::new(1),
        })
    }

    /// Address of the signing key.
    pub fn signer_address(&self) -> String {
        self.signer.address().to_string()
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Call a method whose result may be `null`.
    async fn call_optional<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>, SubmissionError> {
        let request = JsonRpcRequest::new(method, params, self.next_id());

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    SubmissionError::transport(format!("cannot connect to {}", self.config.url))
                } else {
                    SubmissionError::transport(e.to_string())
                }
            })?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| SubmissionError::transport(format!("failed to parse response: {}", e)))?;

        if let Some(error) = rpc_response.error {
            debug!(method, %error, "JSON-RPC error");
            return Err(SubmissionError::rejected(error.to_string()));
        }
        Ok(rpc_response.result)
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, SubmissionError> {
        self.call_optional(method, params).await?.ok_or_else(|| {
            SubmissionError::transport(format!("missing result for {}", method))
        })
    }

    async fn chain_id(&self) -> Result<u64, SubmissionError> {
        let id: String = self.call("eth_chainId", [(); 0]).await?;
        parse_u64_quantity(&id)
    }

    async fn pending_nonce(&self) -> Result<u64, SubmissionError> {
        let address = self.signer_address();
        let nonce: String = self
            .call("eth_getTransactionCount", (address.as_str(), "pending"))
            .await?;
        parse_u64_quantity(&nonce)
    }

    /// Sign `request` and return its network encoding (with sidecar).
    pub fn build_raw_transaction(
        &self,
        request: &BlobTransactionRequest,
        chain_id: u64,
        nonce: u64,
    ) -> Result<Vec<u8>, SubmissionError> {
        let to = Address::from_str(&request.to).map_err(|_| SubmissionError::InvalidAddress {
            address: request.to.clone(),
        })?;

        let mut blobs = Vec::with_capacity(request.blobs.len());
        let mut commitments = Vec::with_capacity(request.blobs.len());
        let mut proofs = Vec::with_capacity(request.blobs.len());
        for proven in request.blobs.blobs() {
            blobs.push(Blob::try_from(proven.data.as_slice()).map_err(|_| {
                SubmissionError::rejected(format!(
                    "blob of {} bytes does not match the protocol blob size",
                    proven.data.len()
                ))
            })?);
            commitments.push(parse_bytes48(&proven.commitment)?);
            proofs.push(parse_bytes48(&proven.proof)?);
        }

        let tx = TxEip4844 {
            chain_id,
            nonce,
            gas_limit: request.gas_limit,
            max_fee_per_gas: request.max_fee_per_gas,
            max_priority_fee_per_gas: request.max_priority_fee_per_gas,
            to,
            value: U256::from(request.value),
            access_list: Default::default(),
            blob_versioned_hashes: commitments.iter().map(versioned_hash).collect(),
            max_fee_per_blob_gas: request.max_fee_per_blob_gas,
            input: Bytes::new(),
        };
        let sidecar: BlobTransactionSidecarVariant =
            BlobTransactionSidecar::new(blobs, commitments, proofs).into();
        let tx = TxEip4844Variant::TxEip4844WithSidecar(TxEip4844WithSidecar::from_tx_and_sidecar(
            tx, sidecar,
        ));

        let signature = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| SubmissionError::rejected(format!("signing failed: {}", e)))?;
        let envelope = TxEnvelope::Eip4844(tx.into_signed(signature));

        Ok(envelope.encoded_2718())
    }

    async fn blob_hashes(&self, tx_hash: &str) -> Result<Vec<String>, SubmissionError> {
        let tx: Option<RpcTransaction> = self
            .call_optional("eth_getTransactionByHash", [tx_hash])
            .await?;
        Ok(tx.map(|t| t.blob_versioned_hashes).unwrap_or_default())
    }
}

/// `0x01 || sha256(commitment)[1..]`.
fn versioned_hash(commitment: &Bytes48) -> B256 {
    let mut hash: [u8; 32] = Sha256::digest(commitment.as_slice()).into();
    hash[0] = VERSIONED_HASH_VERSION_KZG;
    B256::from(hash)
}

fn parse_bytes48(value: &str) -> Result<Bytes48, SubmissionError> {
    Bytes48::from_str(value)
        .map_err(|e| SubmissionError::rejected(format!("bad 48-byte value {:?}: {}", value, e)))
}

#[async_trait]
impl ChainClient for JsonRpcChainClient {
    async fn send_blob_transaction(
        &self,
        request: &BlobTransactionRequest,
    ) -> Result<String, SubmissionError> {
        let chain_id = self.chain_id().await?;
        let nonce = self.pending_nonce().await?;
        let raw = self.build_raw_transaction(request, chain_id, nonce)?;

        debug!(chain_id, nonce, raw_bytes = raw.len(), "Sending raw blob transaction");
        let tx_hash: String = self
            .call("eth_sendRawTransaction", [to_prefixed_hex(&raw)])
            .await?;

        info!(%tx_hash, nonce, "Blob transaction accepted by node");
        Ok(tx_hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<InclusionReceipt>, SubmissionError> {
        let mut polls: u32 = 0;
        loop {
            let receipt: Option<RpcReceipt> = self
                .call_optional("eth_getTransactionReceipt", [tx_hash])
                .await?;

            if let Some(receipt) = receipt {
                if !receipt.succeeded() {
                    warn!(%tx_hash, "Blob transaction failed on chain");
                    return Err(SubmissionError::rejected(format!(
                        "transaction {} reverted",
                        tx_hash
                    )));
                }
                let hashes = self.blob_hashes(tx_hash).await?;
                return receipt.into_inclusion(hashes).map(Some);
            }

            polls += 1;
            if self.config.max_polls.is_some_and(|max| polls >= max) {
                return Ok(None);
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_02_blob_encoder::{BlobEncoder, CommitmentProver, ProverError};
    use crate::domain::FeeCaps;
    use std::sync::Arc;

    // anvil's first dev account
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    struct FixedProver;

    impl CommitmentProver for FixedProver {
        fn commit(&self, _blob_hex: &str) -> Result<String, ProverError> {
            Ok(to_prefixed_hex(&[0xc0; 48]))
        }

        fn prove(&self, _blob_hex: &str, _commitment_hex: &str) -> Result<String, ProverError> {
            Ok(to_prefixed_hex(&[0xc0; 48]))
        }
    }

    fn client() -> JsonRpcChainClient {
        JsonRpcChainClient::new(RpcClientConfig::new("http://127.0.0.1:8545"), DEV_KEY).unwrap()
    }

    #[test]
    fn test_signer_address() {
        assert_eq!(client().signer_address(), DEV_ADDRESS);
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(JsonRpcChainClient::new(RpcClientConfig::new("http://x"), "0x1234").is_err());
    }

    #[test]
    fn test_versioned_hash_prefix() {
        let hash = versioned_hash(&Bytes48::repeat_byte(0xc0));
        assert_eq!(hash[0], VERSIONED_HASH_VERSION_KZG);
    }

    #[tokio::test]
    async fn test_raw_transaction_is_type_3() {
        let encoder = BlobEncoder::new(Arc::new(FixedProver));
        let blobs = encoder.encode("0x0102").await.unwrap();
        let request = BlobTransactionRequest::self_transfer(DEV_ADDRESS, FeeCaps::default(), blobs);

        let raw = client().build_raw_transaction(&request, 11_155_111, 0).unwrap();

        assert_eq!(raw[0], 0x03);
        assert!(raw.len() > 131_072);
    }

    #[tokio::test]
    async fn test_wrong_blob_size_rejected() {
        let encoder = BlobEncoder::with_blob_size(Arc::new(FixedProver), 1);
        let blobs = encoder.encode("0x0102").await.unwrap();
        let request = BlobTransactionRequest::self_transfer(DEV_ADDRESS, FeeCaps::default(), blobs);

        assert!(matches!(
            client().build_raw_transaction(&request, 1, 0),
            Err(SubmissionError::Rejected { .. })
        ));
    }
}
