//! Cost accounting.
//!
//! Every product is computed in `u128` wei. The only conversion to `f64`
//! happens once, at the end, followed by a division by `1e18`.

use cs_02_blob_encoder::BlobSet;
use serde::{Deserialize, Serialize};

use super::transaction::InclusionReceipt;

/// Wei per ether, as the `f64` divisor of the final conversion.
pub const WEI_PER_ETHER: f64 = 1e18;

const ZERO_BYTE_GAS: u64 = 4;
const NONZERO_BYTE_GAS: u64 = 16;

/// Gas the given bytes would cost as ordinary calldata.
pub fn calldata_gas<'a, I>(chunks: I) -> u64
where
    I: IntoIterator<Item = &'a [u8]>,
{
    chunks
        .into_iter()
        .flat_map(|chunk| chunk.iter())
        .map(|b| if *b == 0 { ZERO_BYTE_GAS } else { NONZERO_BYTE_GAS })
        .sum()
}

/// Costs derived from one receipt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub transaction_cost_wei: u128,
    /// In ether.
    pub transaction_cost: f64,
    pub calldata_gas: u64,
    /// In ether.
    pub calldata_counterfactual_cost: f64,
}

/// Pure receipt pricing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostAccountant;

impl CostAccountant {
    /// `gas_used × effective_gas_price + blob_gas_used × blob_gas_price`.
    ///
    /// Saturates instead of overflowing.
    pub fn transaction_cost_wei(receipt: &InclusionReceipt) -> u128 {
        let execution = u128::from(receipt.gas_used).saturating_mul(receipt.effective_gas_price);
        let blob = u128::from(receipt.blob_gas_used).saturating_mul(receipt.blob_gas_price);
        execution.saturating_add(blob)
    }

    /// Price `receipt` and the calldata alternative for the proven blobs.
    pub fn account(receipt: &InclusionReceipt, blobs: &BlobSet) -> CostReport {
        let wei = Self::transaction_cost_wei(receipt);
        let gas = calldata_gas(blobs.data());
        let calldata_wei = u128::from(gas).saturating_mul(receipt.effective_gas_price);

        CostReport {
            transaction_cost_wei: wei,
            transaction_cost: wei as f64 / WEI_PER_ETHER,
            calldata_gas: gas,
            calldata_counterfactual_cost: calldata_wei as f64 / WEI_PER_ETHER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> InclusionReceipt {
        InclusionReceipt {
            tx_hash: "0xabc".to_string(),
            block_number: 1,
            effective_gas_price: 5_000_000_000,
            gas_used: 21_000,
            blob_gas_price: 1,
            blob_gas_used: 131_072,
            blob_versioned_hashes: vec![],
        }
    }

    #[test]
    fn test_calldata_gas_counts_zero_and_nonzero() {
        let bytes: &[u8] = &[0, 0, 1, 2];
        assert_eq!(calldata_gas([bytes]), 40);
    }

    #[test]
    fn test_calldata_gas_sums_every_chunk() {
        let a: &[u8] = &[0; 10];
        let b: &[u8] = &[9; 10];
        assert_eq!(calldata_gas([a, b]), 40 + 160);
    }

    #[test]
    fn test_transaction_cost_exact_wei() {
        assert_eq!(
            CostAccountant::transaction_cost_wei(&receipt()),
            105_000_000_131_072
        );
    }

    #[test]
    fn test_transaction_cost_saturates() {
        let mut r = receipt();
        r.gas_used = u64::MAX;
        r.effective_gas_price = u128::MAX;
        assert_eq!(CostAccountant::transaction_cost_wei(&r), u128::MAX);
    }

    #[test]
    fn test_conversion_is_single_division() {
        let wei = CostAccountant::transaction_cost_wei(&receipt());
        assert_eq!(wei as f64 / 1e18, 105_000_000_131_072u128 as f64 / 1e18);
    }
}
