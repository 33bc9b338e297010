//! Inbound Ports (Driving Ports)
//!
//! The operations exposed to the CLI or any other front end.

use async_trait::async_trait;
use crset_types::{LoggedPublication, StatusEntry};
use cs_01_status_store::{ImportSummary, StatusError};

use crate::domain::{PublicationError, PublicationOutcome, RevokeOutcome};

/// Issuer operations.
#[async_trait]
pub trait IssuerApi: Send + Sync {
    /// Create a new valid entry with a random revocation id.
    async fn create_status_entry(&self) -> Result<StatusEntry, StatusError>;

    /// Revoke an entry. `false` for unknown and already revoked ids.
    async fn revoke_credential(&self, id: &str) -> Result<bool, StatusError>;

    /// Revoke an entry and report exactly what happened.
    async fn revoke_outcome(&self, id: &str) -> Result<RevokeOutcome, StatusError>;

    /// Seed `(id, status)` rows, skipping ids that already exist.
    async fn import_status_entries(
        &self,
        rows: Vec<(String, String)>,
    ) -> Result<ImportSummary, StatusError>;

    /// Current status. `true` means valid.
    async fn get_status(&self, id: &str) -> Result<bool, StatusError>;

    /// Run one publication.
    async fn publish(&self) -> Result<PublicationOutcome, PublicationError>;

    /// Every stored publication record.
    async fn list_logs(&self) -> Result<Vec<LoggedPublication>, StatusError>;

    /// Address entries are issued under and blobs are sent to.
    fn publisher_address(&self) -> &str;
}
