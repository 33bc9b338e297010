//! # Issuer Configuration
//!
//! Unified configuration for the chain client, fee caps, storage and the
//! publication pipeline.
//!
//! ## Security Requirements
//!
//! - The signing key MUST be provided through `CRSET_PRIVATE_KEY`
//! - All timeouts and limits have sane defaults with override capability

use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "rocksdb")]
use cs_01_status_store::RocksDbConfig;
use cs_02_blob_encoder::DEFAULT_BLOB_SIZE_KIB;
use cs_03_blob_submission::{FeeCaps, RpcClientConfig};
use thiserror::Error;
use tracing::warn;

/// Complete issuer configuration.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Chain access and signing.
    pub chain: ChainConfig,
    /// Fee caps for blob transactions.
    pub fees: FeeConfig,
    /// Status store location.
    pub storage: StorageConfig,
    /// Cascade and blob parameters.
    pub publication: PublicationConfig,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            fees: FeeConfig::default(),
            storage: StorageConfig::default(),
            publication: PublicationConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl IssuerConfig {
    /// Build a configuration from defaults overridden by `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("CRSET_RPC_URL") {
            config.chain.rpc_url = url;
        }
        if let Some(key) = lookup("CRSET_PRIVATE_KEY") {
            config.chain.private_key = Some(key.trim().to_string());
        }
        if let Some(address) = lookup("CRSET_ADDRESS") {
            config.chain.address = Some(address.trim().to_string());
        }
        if let Some(polls) = parse_var(&lookup, "CRSET_MAX_RECEIPT_POLLS") {
            config.chain.max_polls = Some(polls);
        }
        if let Some(secs) = parse_var(&lookup, "CRSET_RECEIPT_POLL_INTERVAL_SECS") {
            config.chain.poll_interval_secs = secs;
        }

        if let Some(fee) = parse_var(&lookup, "CRSET_MAX_FEE_PER_GAS") {
            config.fees.max_fee_per_gas = fee;
        }
        if let Some(fee) = parse_var(&lookup, "CRSET_MAX_PRIORITY_FEE_PER_GAS") {
            config.fees.max_priority_fee_per_gas = fee;
        }
        if let Some(fee) = parse_var(&lookup, "CRSET_MAX_FEE_PER_BLOB_GAS") {
            config.fees.max_fee_per_blob_gas = fee;
        }

        if let Some(path) = lookup("CRSET_DB_PATH") {
            config.storage.db_path = PathBuf::from(path);
        }

        if let Some(capacity) = parse_var(&lookup, "CRSET_VALID_CAPACITY") {
            config.publication.valid_capacity = Some(capacity);
        }
        if let Some(kib) = parse_var(&lookup, "CRSET_BLOB_SIZE_KIB") {
            config.publication.blob_size_kib = kib;
        }
        if let Some(secs) = parse_var(&lookup, "CRSET_INCLUSION_TIMEOUT_SECS") {
            config.publication.inclusion_timeout_secs = Some(secs);
        }

        if let Some(level) = lookup("CRSET_LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration before wiring the issuer.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - The signing key is missing or not 32 hex bytes
    /// - The publisher address is set but malformed
    /// - The capacity override is not a positive finite number
    /// - The blob size is zero or differs from the protocol blob size
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        let key = self
            .chain
            .private_key
            .as_deref()
            .ok_or(ConfigError::MissingPrivateKey)?;
        let key_hex = crset_types::strip_hex_prefix(key);
        match hex::decode(key_hex) {
            Ok(bytes) if bytes.len() == 32 => {}
            _ => return Err(ConfigError::InvalidPrivateKey),
        }

        if let Some(address) = &self.chain.address {
            if !crset_types::is_valid_address(address) {
                return Err(ConfigError::InvalidAddress {
                    address: address.clone(),
                });
            }
        }

        if let Some(capacity) = self.publication.valid_capacity {
            if !capacity.is_finite() || capacity <= 0.0 {
                return Err(ConfigError::InvalidCapacity { capacity });
            }
        }

        if self.publication.blob_size_kib == 0 {
            return Err(ConfigError::InvalidBlobSize);
        }
        self.publication.check_kzg_blob_size()?;

        Ok(())
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> IssuerConfig {
    IssuerConfig::from_lookup(|name| std::env::var(name).ok())
}

/// Log filter used when `RUST_LOG` is unset.
///
/// Read on its own so logging can start before the rest of the configuration
/// is parsed and its warnings are reported.
pub fn log_filter_directive<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("CRSET_LOG_LEVEL")
        .map(|level| level.trim().to_string())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| IssuerConfig::default().log_level)
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparseable configuration value");
            None
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// No signing key configured.
    #[error("Signing key missing. Set the CRSET_PRIVATE_KEY environment variable.")]
    MissingPrivateKey,

    /// Signing key is not 32 hex-encoded bytes.
    #[error("CRSET_PRIVATE_KEY must be 32 bytes (64 hex chars)")]
    InvalidPrivateKey,

    /// Publisher address is not a 20-byte hex address.
    #[error("Invalid publisher address: {address}")]
    InvalidAddress { address: String },

    /// Capacity override is not usable.
    #[error("CRSET_VALID_CAPACITY must be a positive number, got {capacity}")]
    InvalidCapacity { capacity: f64 },

    /// Zero blob size.
    #[error("CRSET_BLOB_SIZE_KIB must be greater than zero")]
    InvalidBlobSize,

    /// The KZG prover only handles the protocol blob size.
    #[error("CRSET_BLOB_SIZE_KIB must be {expected} with the KZG prover, got {kib}")]
    UnsupportedBlobSize { kib: usize, expected: usize },
}

/// Chain access configuration.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Hex signing key.
    pub private_key: Option<String>,
    /// Publisher address; derived from the signing key when unset.
    pub address: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Delay between receipt polls in seconds.
    pub poll_interval_secs: u64,
    /// Receipt polls before giving up; unbounded when unset.
    pub max_polls: Option<u32>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            private_key: None,
            address: None,
            request_timeout_secs: 30,
            poll_interval_secs: 4,
            max_polls: None,
        }
    }
}

impl ChainConfig {
    /// Client settings for the JSON-RPC adapter.
    pub fn rpc_config(&self) -> RpcClientConfig {
        let mut rpc = RpcClientConfig::new(self.rpc_url.clone());
        rpc.request_timeout = Duration::from_secs(self.request_timeout_secs);
        rpc.poll_interval = Duration::from_secs(self.poll_interval_secs);
        rpc.max_polls = self.max_polls;
        rpc
    }
}

/// Fee caps in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeConfig {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_blob_gas: u128,
}

impl Default for FeeConfig {
    fn default() -> Self {
        let caps = FeeCaps::default();
        Self {
            max_fee_per_gas: caps.max_fee_per_gas,
            max_priority_fee_per_gas: caps.max_priority_fee_per_gas,
            max_fee_per_blob_gas: caps.max_fee_per_blob_gas,
        }
    }
}

impl FeeConfig {
    pub fn caps(&self) -> FeeCaps {
        FeeCaps {
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            max_fee_per_blob_gas: self.max_fee_per_blob_gas,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Status database directory.
    pub db_path: PathBuf,
    /// Fsync every write.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/status-db"),
            sync_writes: true,
        }
    }
}

#[cfg(feature = "rocksdb")]
impl StorageConfig {
    pub fn rocksdb_config(&self) -> RocksDbConfig {
        RocksDbConfig {
            path: self.db_path.to_string_lossy().into_owned(),
            sync_writes: self.sync_writes,
            ..RocksDbConfig::default()
        }
    }
}

/// Publication pipeline configuration.
#[derive(Debug, Clone)]
pub struct PublicationConfig {
    /// Fixed cascade capacity; `max(valid, invalid / 2)` when unset.
    pub valid_capacity: Option<f64>,
    /// Blob size in KiB.
    pub blob_size_kib: usize,
    /// Upper bound on waiting for inclusion; unbounded when unset.
    pub inclusion_timeout_secs: Option<u64>,
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            valid_capacity: None,
            blob_size_kib: DEFAULT_BLOB_SIZE_KIB,
            inclusion_timeout_secs: None,
        }
    }
}

impl PublicationConfig {
    /// KZG commitments cover exactly one protocol blob, so any other size
    /// cannot be proven.
    pub fn check_kzg_blob_size(&self) -> Result<(), ConfigError> {
        if self.blob_size_kib != DEFAULT_BLOB_SIZE_KIB {
            return Err(ConfigError::UnsupportedBlobSize {
                kib: self.blob_size_kib,
                expected: DEFAULT_BLOB_SIZE_KIB,
            });
        }
        Ok(())
    }

    pub fn inclusion_timeout(&self) -> Option<Duration> {
        self.inclusion_timeout_secs.map(Duration::from_secs)
    }
}
