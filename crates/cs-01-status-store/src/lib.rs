//! # CS-01 Status Store
//!
//! Persistence for credential status rows and the append-only publication
//! log.
//!
//! ## Architecture
//!
//! Hexagonal layout:
//!
//! - **Domain Layer** (`domain/`): errors, key layout, status encoding
//! - **Ports Layer** (`ports/`):
//!   - `StatusStore`, `PublicationLog`: driving ports used by the publisher
//!   - `KeyValueStore`: driven port for the storage backend
//! - **Service Layer** (`service/`): `KvStatusStore` implements both driving
//!   ports over any `KeyValueStore`
//! - **Adapters Layer** (`adapters/`): `InMemoryKVStore` for tests,
//!   `RocksDbStore` for production (feature `rocksdb`)
//!
//! ## Invariants
//!
//! - A status only moves from valid to invalid.
//! - `patch_status_by_id` is a compare-and-set under a single write lock, so
//!   two concurrent revokes of one id report at most one change.
//! - A publication record and the log counter are written in one atomic batch.
//! - A bulk import decodes every row before writing any, then commits one batch.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryKVStore;
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use domain::{ImportSummary, KVStoreError, PatchOutcome, StatusError};
pub use ports::{BatchOperation, KeyValueStore, PublicationLog, StatusStore};
pub use service::KvStatusStore;
