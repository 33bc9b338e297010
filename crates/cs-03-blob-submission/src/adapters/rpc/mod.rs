//! JSON-RPC chain client.
//!
//! Signs EIP-4844 transactions locally and talks to any Ethereum execution
//! node over HTTP.

mod client;
mod types;

pub use client::{JsonRpcChainClient, RpcClientConfig};
