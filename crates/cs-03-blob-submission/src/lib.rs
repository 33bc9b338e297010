//! # CS-03 Blob Submission
//!
//! Carries an encoded payload on chain as a self-addressed type-3
//! transaction and prices the result.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): request/receipt types, fee caps, errors,
//!   cost arithmetic
//! - **Ports Layer** (`ports/`): `ChainClient`, the only network seam
//! - **Service Layer** (`service/`): `TransactionAssembler`
//! - **Adapters Layer** (`adapters/`): `JsonRpcChainClient` (feature `rpc`)
//!
//! ## Ordering
//!
//! Address and payload prefix checks run before the encoder, the prover or
//! the chain is touched. Every failure is terminal; nothing is retried or
//! resubmitted.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(feature = "rpc")]
pub use adapters::{JsonRpcChainClient, RpcClientConfig};
pub use domain::{
    calldata_gas, BlobTransactionRequest, CostAccountant, CostReport, FeeCaps,
    InclusionReceipt, SubmissionError, NO_OP_GAS_LIMIT, WEI_PER_ETHER,
};
pub use ports::ChainClient;
pub use service::{Submission, TransactionAssembler};
