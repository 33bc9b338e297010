//! Issuer service.

use async_trait::async_trait;
use crset_types::{LoggedPublication, StatusEntry, STATUS_INVALID, STATUS_VALID};
use cs_01_status_store::{ImportSummary, PatchOutcome, StatusError};
use rand::Rng;
use tracing::{debug, info};

use super::PublicationOrchestrator;
use crate::domain::{PublicationError, PublicationOutcome, RevokeOutcome};
use crate::ports::IssuerApi;

/// Entry management and publication behind one handle.
pub struct IssuerService {
    orchestrator: PublicationOrchestrator,
}

impl IssuerService {
    pub fn new(orchestrator: PublicationOrchestrator) -> Self {
        Self { orchestrator }
    }

    fn random_revocation_id() -> String {
        hex::encode(rand::thread_rng().gen::<[u8; 32]>())
    }
}

#[async_trait]
impl IssuerApi for IssuerService {
    async fn create_status_entry(&self) -> Result<StatusEntry, StatusError> {
        let revocation_id = Self::random_revocation_id();
        let id = self
            .orchestrator
            .store()
            .insert_status_entry(&revocation_id, STATUS_VALID)
            .await?;

        debug!(%id, "Status entry created");
        Ok(StatusEntry::new(self.publisher_address(), &id))
    }

    async fn revoke_credential(&self, id: &str) -> Result<bool, StatusError> {
        Ok(self.revoke_outcome(id).await?.revoked())
    }

    async fn revoke_outcome(&self, id: &str) -> Result<RevokeOutcome, StatusError> {
        let store = self.orchestrator.store();

        match store.get_status_by_id(id).await {
            Ok(status) if status == STATUS_INVALID => return Ok(RevokeOutcome::AlreadyRevoked),
            Ok(_) => {}
            Err(StatusError::NotFound { .. }) => return Ok(RevokeOutcome::Unknown),
            Err(e) => return Err(e),
        }

        let outcome = match store.patch_status_by_id(id, STATUS_INVALID).await? {
            PatchOutcome::Changed => RevokeOutcome::Revoked,
            PatchOutcome::Unchanged => RevokeOutcome::AlreadyRevoked,
            PatchOutcome::Missing => RevokeOutcome::Unknown,
        };
        info!(id, ?outcome, "Revocation requested");
        Ok(outcome)
    }

    async fn import_status_entries(
        &self,
        rows: Vec<(String, String)>,
    ) -> Result<ImportSummary, StatusError> {
        self.orchestrator.store().import_status_entries(rows).await
    }

    async fn get_status(&self, id: &str) -> Result<bool, StatusError> {
        self.orchestrator.store().get_status_by_id(id).await
    }

    async fn publish(&self) -> Result<PublicationOutcome, PublicationError> {
        self.orchestrator.publish().await
    }

    async fn list_logs(&self) -> Result<Vec<LoggedPublication>, StatusError> {
        self.orchestrator.log().list_logs().await
    }

    fn publisher_address(&self) -> &str {
        self.orchestrator.publisher_address()
    }
}
