//! Stubs shared by the service tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use crset_bus::InMemoryProgressBus;
use crset_types::to_prefixed_hex;
use cs_01_status_store::{InMemoryKVStore, KvStatusStore};
use cs_02_blob_encoder::{BlobEncoder, CommitmentProver, ProverError};
use cs_03_blob_submission::{
    BlobTransactionRequest, ChainClient, FeeCaps, InclusionReceipt, SubmissionError,
    TransactionAssembler,
};
use parking_lot::Mutex;

use super::PublicationOrchestrator;
use crate::domain::{CascadeError, SerializedCascade, SALT_LEN};
use crate::ports::CascadeBuilder;

pub const ADDRESS: &str = "0x00000000000000000000000000000000000000aa";

pub struct StubCascade {
    fail: bool,
    len: usize,
    pub last_capacity: Mutex<Option<f64>>,
}

impl StubCascade {
    pub fn ok() -> Self {
        Self::with_len(16)
    }

    /// Succeeds with `len` cascade bytes.
    pub fn with_len(len: usize) -> Self {
        Self {
            fail: false,
            len,
            last_capacity: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            len: 0,
            last_capacity: Mutex::new(None),
        }
    }
}

impl CascadeBuilder for StubCascade {
    fn build(
        &self,
        _valid: &HashSet<String>,
        _invalid: &HashSet<String>,
        capacity: f64,
    ) -> Result<SerializedCascade, CascadeError> {
        *self.last_capacity.lock() = Some(capacity);
        if self.fail {
            return Err(CascadeError::DidNotConverge { levels: 1 });
        }
        Ok(SerializedCascade {
            bytes: vec![0xab; self.len],
            salt: [0x01; SALT_LEN],
            depth: 3,
        })
    }
}

pub struct StubProver;

impl CommitmentProver for StubProver {
    fn commit(&self, _blob_hex: &str) -> Result<String, ProverError> {
        Ok(to_prefixed_hex(&[0xc0; 48]))
    }

    fn prove(&self, _blob_hex: &str, _commitment_hex: &str) -> Result<String, ProverError> {
        Ok(to_prefixed_hex(&[0xd0; 48]))
    }
}

#[derive(Default)]
pub struct StubChain {
    pub reject: AtomicBool,
    pub sent: AtomicUsize,
}

#[async_trait]
impl ChainClient for StubChain {
    async fn send_blob_transaction(
        &self,
        _request: &BlobTransactionRequest,
    ) -> Result<String, SubmissionError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(SubmissionError::rejected("replacement transaction underpriced"));
        }
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok("0xfeed".to_string())
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<InclusionReceipt>, SubmissionError> {
        Ok(Some(InclusionReceipt {
            tx_hash: tx_hash.to_string(),
            block_number: 7,
            effective_gas_price: 5_000_000_000,
            gas_used: 21_000,
            blob_gas_price: 1,
            blob_gas_used: 131_072,
            blob_versioned_hashes: vec![format!("0x01{}", "ab".repeat(31))],
        }))
    }
}

pub struct Harness {
    pub kv: Arc<KvStatusStore<InMemoryKVStore>>,
    pub bus: Arc<InMemoryProgressBus>,
    pub cascade: Arc<StubCascade>,
    pub chain: Arc<StubChain>,
    pub orchestrator: PublicationOrchestrator,
}

pub fn harness(cascade: StubCascade) -> Harness {
    let kv = Arc::new(KvStatusStore::new(InMemoryKVStore::new()));
    let bus = Arc::new(InMemoryProgressBus::new());
    let cascade = Arc::new(cascade);
    let chain = Arc::new(StubChain::default());

    let assembler = TransactionAssembler::new(
        BlobEncoder::new(Arc::new(StubProver)),
        chain.clone(),
        ADDRESS,
        FeeCaps::default(),
    );
    let orchestrator = PublicationOrchestrator::new(
        kv.clone(),
        kv.clone(),
        cascade.clone(),
        assembler,
        bus.clone(),
    );

    Harness {
        kv,
        bus,
        cascade,
        chain,
        orchestrator,
    }
}
