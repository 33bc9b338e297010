//! Inbound Ports (Driving Ports)
//!
//! The status and log API consumed by the publication orchestrator and the
//! issuer service.

use async_trait::async_trait;
use crset_types::{LoggedPublication, PublicationRecord};
use std::collections::HashSet;

use crate::domain::{ImportSummary, PatchOutcome, StatusError};

/// Keyed CRUD over credential status rows.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// All ids currently at `status`. Order is irrelevant.
    async fn get_ids_by_status(&self, status: bool) -> Result<HashSet<String>, StatusError>;

    /// Status of one id.
    ///
    /// # Errors
    /// `NotFound` if no row exists.
    async fn get_status_by_id(&self, id: &str) -> Result<bool, StatusError>;

    /// Unconditionally write a status. A missing row is left missing.
    ///
    /// # Errors
    /// `IllegalTransition` when moving an invalid row back to valid.
    async fn update_status_by_id(&self, id: &str, status: bool) -> Result<(), StatusError>;

    /// Write a status and report whether anything changed.
    ///
    /// # Errors
    /// `IllegalTransition` when moving an invalid row back to valid.
    async fn patch_status_by_id(&self, id: &str, status: bool)
        -> Result<PatchOutcome, StatusError>;

    /// Create a new row and return its id.
    ///
    /// # Errors
    /// `Conflict` if the id already exists.
    async fn insert_status_entry(&self, id: &str, status: bool) -> Result<String, StatusError>;

    /// Seed rows of `(id, status)` in one batch. Statuses are decoded like
    /// stored values, so `Valid`/`invalid`/`1`/`0` are all accepted. Ids that
    /// already exist are skipped and left untouched.
    ///
    /// # Errors
    /// `Corrupt` for an empty id or an unrecognized status; nothing is
    /// written in that case.
    async fn import_status_entries(
        &self,
        rows: Vec<(String, String)>,
    ) -> Result<ImportSummary, StatusError>;
}

/// Append-only storage for publication records.
#[async_trait]
pub trait PublicationLog: Send + Sync {
    /// Append a record and return its log id.
    async fn insert_log(&self, record: PublicationRecord) -> Result<u64, StatusError>;

    /// All records in insertion order.
    async fn list_logs(&self) -> Result<Vec<LoggedPublication>, StatusError>;
}
