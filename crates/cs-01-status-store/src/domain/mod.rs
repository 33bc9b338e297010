//! Domain layer: errors, key layout and status encoding.

pub mod errors;
pub mod keys;
pub mod outcome;

pub use errors::{KVStoreError, StatusError};
pub use keys::{decode_status, encode_status, log_key, status_key};
pub use outcome::{ImportSummary, PatchOutcome};
