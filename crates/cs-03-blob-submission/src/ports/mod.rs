//! Ports Layer
//!
//! - Driven Ports (outbound) - the chain

pub mod outbound;

pub use outbound::ChainClient;
