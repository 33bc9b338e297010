//! Domain layer: transaction shape, receipts, errors and costs.

pub mod cost;
pub mod errors;
pub mod transaction;

pub use cost::{calldata_gas, CostAccountant, CostReport, WEI_PER_ETHER};
pub use errors::SubmissionError;
pub use transaction::{BlobTransactionRequest, FeeCaps, InclusionReceipt, NO_OP_GAS_LIMIT};
