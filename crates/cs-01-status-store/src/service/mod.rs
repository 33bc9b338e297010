//! Service Layer
//!
//! Implements the driving ports over a key-value backend.

mod kv_status_store;

pub use kv_status_store::KvStatusStore;
