//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Status**: `CredentialStatusRecord`, `StatusEntry`
//! - **Publication**: `PublicationRecord`, `LoggedPublication`

use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: CREDENTIAL STATUS
// =============================================================================

/// Status value of a credential that has not been revoked.
pub const STATUS_VALID: bool = true;

/// Status value of a revoked credential.
pub const STATUS_INVALID: bool = false;

/// A single persisted status row.
///
/// `status == true` means valid, `false` means revoked. A record only ever
/// moves from valid to invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialStatusRecord {
    /// Revocation identifier (primary key, immutable).
    pub id: String,
    /// Current status.
    pub status: bool,
}

impl CredentialStatusRecord {
    /// Create a record in the valid state.
    pub fn valid(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: STATUS_VALID,
        }
    }

    /// Whether the credential has been revoked.
    pub fn is_revoked(&self) -> bool {
        !self.status
    }
}

/// Status entry embedded in a verifiable credential before it is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    /// CAIP-10 account of the publisher followed by the revocation id.
    pub id: String,
    /// Entry type, always [`StatusEntry::ENTRY_TYPE`].
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Status purpose, always [`StatusEntry::PURPOSE`].
    pub status_purpose: String,
}

impl StatusEntry {
    /// Credential status entry type.
    pub const ENTRY_TYPE: &'static str = "CRSetEntry";
    /// Credential status purpose.
    pub const PURPOSE: &'static str = "revocation";
    /// CAIP-2 chain reference used for the publisher account.
    pub const CHAIN_ID: &'static str = "eip155:1";

    /// Build the entry for a publisher address and a fresh revocation id.
    pub fn new(publisher_address: &str, revocation_id: &str) -> Self {
        Self {
            id: format!("{}:{}:{}", Self::CHAIN_ID, publisher_address, revocation_id),
            entry_type: Self::ENTRY_TYPE.to_string(),
            status_purpose: Self::PURPOSE.to_string(),
        }
    }
}

// =============================================================================
// CLUSTER B: PUBLICATION LOG
// =============================================================================

/// One row of the append-only publication log.
///
/// Written exactly once per successful publish and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationRecord {
    /// Size of the valid id set at query time.
    pub valid_count: usize,
    /// Size of the invalid id set at query time.
    pub invalid_count: usize,
    /// Serialized cascade size in bytes (salt included).
    pub serialized_byte_size: usize,
    /// Cascade construction time, rounded to 4 decimals.
    pub construction_seconds: f64,
    /// Blob encoding, submission and inclusion time, rounded to 4 decimals.
    pub publication_seconds: f64,
    /// Number of blobs carried by the transaction.
    pub blob_count: usize,
    /// Hash of the included transaction.
    pub tx_hash: String,
    /// Versioned hash of every blob, in blob order.
    pub blob_hashes: Vec<String>,
    /// RFC 3339 timestamp of the log insertion.
    pub timestamp: String,
    /// Actual cost of the blob transaction in ether.
    pub transaction_cost: f64,
    /// Cost the same bytes would have had as calldata, in ether.
    pub calldata_counterfactual_cost: f64,
    /// Number of cascade levels.
    pub cascade_depth: usize,
    /// Capacity passed to the cascade construction.
    pub capacity: f64,
    /// Block that included the transaction.
    pub block_number: u64,
    /// Exact transaction cost in wei.
    pub transaction_cost_wei: u128,
    /// Calldata-equivalent gas of the proven bytes.
    pub calldata_gas: u64,
}

/// A publication record together with the identifier assigned on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedPublication {
    /// Monotonically increasing log identifier.
    pub log_id: u64,
    /// The stored record.
    #[serde(flatten)]
    pub record: PublicationRecord,
}
