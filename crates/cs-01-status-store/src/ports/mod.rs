//! Ports Layer
//!
//! - Driving Ports (inbound) - status and log API used by the publisher
//! - Driven Ports (outbound) - the key-value backend

pub mod inbound;
pub mod outbound;

pub use inbound::{PublicationLog, StatusStore};
pub use outbound::{BatchOperation, KeyValueStore, ScanResult};
