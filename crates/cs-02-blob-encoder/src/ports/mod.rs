//! Ports Layer
//!
//! - Driven Ports (outbound) - the commitment prover

pub mod outbound;

pub use outbound::CommitmentProver;
