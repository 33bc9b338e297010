//! Adapters Layer

#[cfg(feature = "rpc")]
pub mod rpc;

#[cfg(feature = "rpc")]
pub use rpc::{JsonRpcChainClient, RpcClientConfig};
