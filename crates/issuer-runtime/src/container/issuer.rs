//! # Issuer Wiring
//!
//! Construction order:
//!
//! ```text
//! KeyValueStore ──► KvStatusStore ──┬──► StatusStore ─────┐
//!                                   └──► PublicationLog ──┤
//! CKzgProver ──► BlobEncoder ──┐                          ├──► PublicationOrchestrator ──► IssuerService
//! JsonRpcChainClient ──────────┴──► TransactionAssembler ─┤
//! BloomCascadeBuilder ────────────────────────────────────┤
//! InMemoryProgressBus ────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use crset_bus::{InMemoryProgressBus, ProgressPublisher};
use cs_01_status_store::{KeyValueStore, KvStatusStore, PublicationLog, StatusStore};
use cs_02_blob_encoder::{BlobEncoder, CKzgProver, CommitmentProver};
use cs_03_blob_submission::{ChainClient, JsonRpcChainClient, TransactionAssembler};
use cs_04_publication::{
    BloomCascadeBuilder, CascadeBuilder, IssuerService, PublicationOrchestrator,
};
use tracing::{info, warn};

use super::config::{ConfigError, IssuerConfig};

/// The wired issuer.
pub struct IssuerContainer {
    service: IssuerService,
    bus: Arc<InMemoryProgressBus>,
}

impl IssuerContainer {
    /// Wire production adapters from `config`.
    ///
    /// No network traffic happens here; the chain is first contacted on
    /// publish.
    pub fn build(config: &IssuerConfig) -> Result<Self> {
        let private_key = config
            .chain
            .private_key
            .as_deref()
            .ok_or(ConfigError::MissingPrivateKey)?;
        config.publication.check_kzg_blob_size()?;

        let chain = JsonRpcChainClient::new(config.chain.rpc_config(), private_key)
            .context("Failed to create chain client")?;

        let signer = chain.signer_address();
        let address = match &config.chain.address {
            Some(address) => {
                if !address.eq_ignore_ascii_case(&signer) {
                    warn!(
                        %address,
                        %signer,
                        "Publisher address differs from the signing account"
                    );
                }
                address.clone()
            }
            None => signer,
        };

        #[cfg(feature = "rocksdb")]
        let kv = {
            let rocks = config.storage.rocksdb_config();
            info!(path = %rocks.path, "Opening status database");
            cs_01_status_store::RocksDbStore::open(rocks)
                .context("Failed to open status database")?
        };

        #[cfg(not(feature = "rocksdb"))]
        let kv = {
            warn!("Built without RocksDB, status rows live in memory only");
            cs_01_status_store::InMemoryKVStore::new()
        };

        info!(rpc_url = %config.chain.rpc_url, %address, "Issuer wired");

        Ok(Self::assemble(
            kv,
            Arc::new(chain),
            Arc::new(CKzgProver::new()),
            address,
            config,
        ))
    }

    /// Wire the pipeline over the given store, chain and prover.
    pub fn assemble<S>(
        kv: S,
        chain: Arc<dyn ChainClient>,
        prover: Arc<dyn CommitmentProver>,
        address: impl Into<String>,
        config: &IssuerConfig,
    ) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let store = Arc::new(KvStatusStore::new(kv));
        let status: Arc<dyn StatusStore> = store.clone();
        let log: Arc<dyn PublicationLog> = store;

        let bus = Arc::new(InMemoryProgressBus::new());
        let progress: Arc<dyn ProgressPublisher> = bus.clone();

        let cascade: Arc<dyn CascadeBuilder> = Arc::new(BloomCascadeBuilder::new());

        let encoder = BlobEncoder::with_blob_size(prover, config.publication.blob_size_kib);
        let mut assembler =
            TransactionAssembler::new(encoder, chain, address, config.fees.caps());
        if let Some(timeout) = config.publication.inclusion_timeout() {
            assembler = assembler.with_inclusion_timeout(timeout);
        }

        let orchestrator = PublicationOrchestrator::new(status, log, cascade, assembler, progress)
            .with_capacity_override(config.publication.valid_capacity);

        Self {
            service: IssuerService::new(orchestrator),
            bus,
        }
    }

    /// Issuer operations.
    pub fn service(&self) -> &IssuerService {
        &self.service
    }

    /// Progress bus the pipeline reports to.
    pub fn bus(&self) -> &InMemoryProgressBus {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubChain, StubProver, ADDRESS};
    use cs_01_status_store::InMemoryKVStore;
    use cs_04_publication::IssuerApi;

    fn container() -> IssuerContainer {
        IssuerContainer::assemble(
            InMemoryKVStore::new(),
            Arc::new(StubChain),
            Arc::new(StubProver),
            ADDRESS,
            &IssuerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_assembled_issuer_round_trip() {
        let container = container();
        let service = container.service();

        let entry = service.create_status_entry().await.unwrap();
        let revocation_id = entry.id.rsplit(':').next().unwrap().to_string();
        assert!(service.get_status(&revocation_id).await.unwrap());

        assert!(service.revoke_credential(&revocation_id).await.unwrap());
        assert!(!service.get_status(&revocation_id).await.unwrap());

        let outcome = service.publish().await.unwrap();
        assert_eq!(outcome.record.valid_count, 0);
        assert_eq!(outcome.record.invalid_count, 1);
        assert_eq!(service.list_logs().await.unwrap().len(), 1);
        assert_eq!(service.publisher_address(), ADDRESS);
    }

    #[tokio::test]
    async fn test_publish_reports_on_bus() {
        let container = container();
        let mut sub = container.bus().subscribe(crset_bus::StepFilter::all());

        container.service().publish().await.unwrap();

        let mut events = 0;
        while let Ok(Some(_)) = sub.try_recv() {
            events += 1;
        }
        assert_eq!(events, 12);
    }

    #[cfg(feature = "rocksdb")]
    #[test]
    fn test_build_derives_address_from_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = IssuerConfig::default();
        config.chain.private_key = Some(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
        );
        config.storage.db_path = dir.path().join("status");
        config.storage.sync_writes = false;

        let container = IssuerContainer::build(&config).unwrap();
        assert!(container
            .service()
            .publisher_address()
            .eq_ignore_ascii_case("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_build_rejects_blob_size_the_prover_cannot_handle() {
        let mut config = IssuerConfig::default();
        config.chain.private_key = Some(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
        );
        config.publication.blob_size_kib = 64;

        let err = IssuerContainer::build(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnsupportedBlobSize { kib: 64, .. })
        ));
    }

    #[test]
    fn test_build_without_key_fails() {
        let config = IssuerConfig::default();
        assert!(IssuerContainer::build(&config).is_err());
    }
}
