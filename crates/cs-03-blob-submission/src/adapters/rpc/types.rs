//! JSON-RPC wire types.

use serde::{Deserialize, Serialize};

use crate::domain::{InclusionReceipt, SubmissionError};

/// JSON-RPC request envelope.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<T> {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: T,
    pub id: u64,
}

impl<T> JsonRpcRequest<T> {
    pub fn new(method: impl Into<String>, params: T, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct JsonRpcResponse<T> {
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RPC Error {}: {}", self.code, self.message)
    }
}

/// Subset of `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: String,
    pub block_number: String,
    pub effective_gas_price: String,
    pub gas_used: String,
    #[serde(default)]
    pub blob_gas_price: Option<String>,
    #[serde(default)]
    pub blob_gas_used: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RpcReceipt {
    /// Whether the transaction executed successfully.
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() != Some("0x0")
    }

    pub fn into_inclusion(
        self,
        blob_versioned_hashes: Vec<String>,
    ) -> Result<InclusionReceipt, SubmissionError> {
        Ok(InclusionReceipt {
            block_number: parse_u64_quantity(&self.block_number)?,
            effective_gas_price: parse_quantity(&self.effective_gas_price)?,
            gas_used: parse_u64_quantity(&self.gas_used)?,
            blob_gas_price: parse_optional_quantity(self.blob_gas_price.as_deref())?,
            blob_gas_used: match self.blob_gas_used.as_deref() {
                Some(value) => parse_u64_quantity(value)?,
                None => 0,
            },
            tx_hash: self.transaction_hash,
            blob_versioned_hashes,
        })
    }
}

/// Subset of `eth_getTransactionByHash`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    #[serde(default)]
    pub blob_versioned_hashes: Vec<String>,
}

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_quantity(value: &str) -> Result<u128, SubmissionError> {
    let digits = crset_types::strip_hex_prefix(value);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| SubmissionError::transport(format!("bad quantity {:?}: {}", value, e)))
}

/// Parse a hex quantity that must fit in a `u64`.
pub fn parse_u64_quantity(value: &str) -> Result<u64, SubmissionError> {
    u64::try_from(parse_quantity(value)?)
        .map_err(|_| SubmissionError::transport(format!("quantity {:?} exceeds u64", value)))
}

fn parse_optional_quantity(value: Option<&str>) -> Result<u128, SubmissionError> {
    value.map(parse_quantity).transpose().map(Option::unwrap_or_default)
}
