//! Transaction descriptor and inclusion receipt.

use cs_02_blob_encoder::BlobSet;
use serde::{Deserialize, Serialize};

/// Gas limit of a self-transfer with empty calldata.
pub const NO_OP_GAS_LIMIT: u64 = 21_000;

const GWEI: u128 = 1_000_000_000;

/// Independent fee caps, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCaps {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_blob_gas: u128,
}

impl Default for FeeCaps {
    fn default() -> Self {
        Self {
            max_fee_per_gas: 5 * GWEI,
            max_priority_fee_per_gas: 5 * GWEI,
            max_fee_per_blob_gas: 5 * GWEI,
        }
    }
}

/// Everything needed to sign and send one type-3 transaction.
#[derive(Debug, Clone)]
pub struct BlobTransactionRequest {
    /// Recipient, always the publisher's own address.
    pub to: String,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_blob_gas: u128,
    pub gas_limit: u64,
    /// Always zero.
    pub value: u128,
    pub blobs: BlobSet,
}

impl BlobTransactionRequest {
    /// Self-transfer carrying `blobs`.
    pub fn self_transfer(to: impl Into<String>, fees: FeeCaps, blobs: BlobSet) -> Self {
        Self {
            to: to.into(),
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
            max_fee_per_blob_gas: fees.max_fee_per_blob_gas,
            gas_limit: NO_OP_GAS_LIMIT,
            value: 0,
            blobs,
        }
    }
}

/// Fields read from the receipt of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub effective_gas_price: u128,
    pub gas_used: u64,
    pub blob_gas_price: u128,
    pub blob_gas_used: u64,
    /// Versioned hash per blob, as reported by the chain.
    pub blob_versioned_hashes: Vec<String>,
}
