//! Status store and publication log over a `KeyValueStore`.

use async_trait::async_trait;
use crset_types::{LoggedPublication, PublicationRecord, STATUS_INVALID, STATUS_VALID};
use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::domain::keys::{
    decode_status, encode_status, id_from_status_key, log_key, status_key, LOG_PREFIX,
    NEXT_LOG_ID_KEY, STATUS_PREFIX,
};
use crate::domain::{ImportSummary, PatchOutcome, StatusError};
use crate::ports::{BatchOperation, KeyValueStore, PublicationLog, StatusStore};

/// Status store backed by any `KeyValueStore`.
///
/// One owned handle is shared by every caller. Reads take the read lock;
/// every write, including the compare-and-set in `patch_status_by_id`, takes
/// the write lock for its whole read-modify-write.
pub struct KvStatusStore<S: KeyValueStore> {
    kv: RwLock<S>,
}

impl<S: KeyValueStore> KvStatusStore<S> {
    /// Wrap a key-value backend.
    pub fn new(kv: S) -> Self {
        Self { kv: RwLock::new(kv) }
    }

    fn read_status(kv: &S, id: &str) -> Result<Option<bool>, StatusError> {
        match kv.get(&status_key(id))? {
            Some(value) => decode_status(id, &value).map(Some),
            None => Ok(None),
        }
    }

    fn check_transition(id: &str, current: bool, target: bool) -> Result<(), StatusError> {
        if current == STATUS_INVALID && target == STATUS_VALID {
            warn!(id, "Rejected attempt to reinstate a revoked entry");
            return Err(StatusError::IllegalTransition { id: id.to_string() });
        }
        Ok(())
    }
}

#[async_trait]
impl<S: KeyValueStore> StatusStore for KvStatusStore<S> {
    async fn get_ids_by_status(&self, status: bool) -> Result<HashSet<String>, StatusError> {
        let rows = self.kv.read().prefix_scan(STATUS_PREFIX)?;

        let mut ids = HashSet::with_capacity(rows.len());
        for (key, value) in rows {
            let Some(id) = id_from_status_key(&key) else {
                continue;
            };
            if decode_status(&id, &value)? == status {
                ids.insert(id);
            }
        }

        debug!(status, count = ids.len(), "Loaded ids by status");
        Ok(ids)
    }

    async fn get_status_by_id(&self, id: &str) -> Result<bool, StatusError> {
        let kv = self.kv.read();
        Self::read_status(&kv, id)?.ok_or_else(|| StatusError::NotFound { id: id.to_string() })
    }

    async fn update_status_by_id(&self, id: &str, status: bool) -> Result<(), StatusError> {
        let mut kv = self.kv.write();
        let Some(current) = Self::read_status(&kv, id)? else {
            debug!(id, "Update of missing entry ignored");
            return Ok(());
        };
        Self::check_transition(id, current, status)?;

        kv.put(&status_key(id), &encode_status(status))?;
        Ok(())
    }

    async fn patch_status_by_id(
        &self,
        id: &str,
        status: bool,
    ) -> Result<PatchOutcome, StatusError> {
        let mut kv = self.kv.write();
        let Some(current) = Self::read_status(&kv, id)? else {
            return Ok(PatchOutcome::Missing);
        };
        if current == status {
            return Ok(PatchOutcome::Unchanged);
        }
        Self::check_transition(id, current, status)?;

        kv.put(&status_key(id), &encode_status(status))?;
        debug!(id, status, "Status patched");
        Ok(PatchOutcome::Changed)
    }

    async fn insert_status_entry(&self, id: &str, status: bool) -> Result<String, StatusError> {
        let mut kv = self.kv.write();
        let key = status_key(id);
        if kv.exists(&key)? {
            return Err(StatusError::Conflict { id: id.to_string() });
        }

        kv.put(&key, &encode_status(status))?;
        debug!(id, status, "Status entry inserted");
        Ok(id.to_string())
    }

    async fn import_status_entries(
        &self,
        rows: Vec<(String, String)>,
    ) -> Result<ImportSummary, StatusError> {
        let mut decoded = Vec::with_capacity(rows.len());
        for (id, raw) in rows {
            let id = id.trim().to_string();
            if id.is_empty() {
                return Err(StatusError::Corrupt {
                    key: String::new(),
                    message: "empty id in import".to_string(),
                });
            }
            let status = decode_status(&id, raw.as_bytes())?;
            decoded.push((id, status));
        }

        let mut kv = self.kv.write();
        let mut seen = HashSet::with_capacity(decoded.len());
        let mut batch = Vec::with_capacity(decoded.len());
        let mut summary = ImportSummary::default();
        for (id, status) in decoded {
            let key = status_key(&id);
            if !seen.insert(id.clone()) || kv.exists(&key)? {
                debug!(%id, "Import skipped existing entry");
                summary.skipped += 1;
                continue;
            }
            batch.push(BatchOperation::put(key, encode_status(status).to_vec()));
            summary.inserted += 1;
        }

        if !batch.is_empty() {
            kv.atomic_batch_write(batch)?;
        }
        info!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            "Status entries imported"
        );
        Ok(summary)
    }
}

#[async_trait]
impl<S: KeyValueStore> PublicationLog for KvStatusStore<S> {
    async fn insert_log(&self, record: PublicationRecord) -> Result<u64, StatusError> {
        let value = serde_json::to_vec(&record).map_err(|e| StatusError::Corrupt {
            key: "log".to_string(),
            message: e.to_string(),
        })?;

        let mut kv = self.kv.write();
        let log_id = match kv.get(NEXT_LOG_ID_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| StatusError::Corrupt {
                    key: String::from_utf8_lossy(NEXT_LOG_ID_KEY).into_owned(),
                    message: format!("expected 8 bytes, found {}", bytes.len()),
                })?;
                u64::from_be_bytes(raw)
            }
            None => 1,
        };

        kv.atomic_batch_write(vec![
            BatchOperation::put(log_key(log_id), value),
            BatchOperation::put(NEXT_LOG_ID_KEY.to_vec(), (log_id + 1).to_be_bytes().to_vec()),
        ])?;

        info!(log_id, tx_hash = %record.tx_hash, "Publication record stored");
        Ok(log_id)
    }

    async fn list_logs(&self) -> Result<Vec<LoggedPublication>, StatusError> {
        let rows = self.kv.read().prefix_scan(LOG_PREFIX)?;

        rows.into_iter()
            .map(|(key, value)| {
                let key_text = String::from_utf8_lossy(&key).into_owned();
                let raw: [u8; 8] = key[LOG_PREFIX.len()..]
                    .try_into()
                    .map_err(|_| StatusError::Corrupt {
                        key: key_text.clone(),
                        message: "malformed log key".to_string(),
                    })?;
                let record: PublicationRecord =
                    serde_json::from_slice(&value).map_err(|e| StatusError::Corrupt {
                        key: key_text,
                        message: e.to_string(),
                    })?;
                Ok(LoggedPublication {
                    log_id: u64::from_be_bytes(raw),
                    record,
                })
            })
            .collect()
    }
}
