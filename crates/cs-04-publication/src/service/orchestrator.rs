//! Publication orchestrator.

use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use crset_bus::ProgressPublisher;
use crset_types::{
    strip_hex_prefix, PipelineStep, ProgressEvent, PublicationRecord, STATUS_INVALID,
    STATUS_VALID,
};
use cs_01_status_store::{PublicationLog, StatusStore};
use cs_03_blob_submission::{CostAccountant, TransactionAssembler};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::{
    r_hat, round_seconds, CascadeError, PipelineStage, PublicationError, PublicationFailure,
    PublicationOutcome,
};
use crate::ports::CascadeBuilder;

/// Runs the publication pipeline end to end.
///
/// One call is one independent, strictly sequential run. Concurrent calls
/// read the store independently and may size their cascades from different
/// snapshots.
pub struct PublicationOrchestrator {
    store: Arc<dyn StatusStore>,
    log: Arc<dyn PublicationLog>,
    cascade: Arc<dyn CascadeBuilder>,
    assembler: TransactionAssembler,
    progress: Arc<dyn ProgressPublisher>,
    capacity_override: Option<f64>,
}

/// Current stage of one run, mirrored onto the progress bus.
struct StageTracker<'a> {
    progress: &'a dyn ProgressPublisher,
    stage: PipelineStage,
    step: PipelineStep,
}

impl StageTracker<'_> {
    async fn begin(&mut self, step: PipelineStep) {
        self.step = step;
        self.stage = PipelineStage::from(step);
        debug!(stage = %self.stage, "Stage started");
        self.progress.publish(ProgressEvent::started(step)).await;
    }

    async fn complete(&self, event: ProgressEvent) {
        self.progress.publish(event).await;
    }

    fn fail(&mut self, source: impl Into<PublicationFailure>) -> PublicationError {
        let failed_in = self.stage;
        self.stage = PipelineStage::Failed;
        let error = PublicationError::new(self.step, source);
        warn!(stage = %failed_in, %error, "Publication failed");
        error
    }
}

impl PublicationOrchestrator {
    pub fn new(
        store: Arc<dyn StatusStore>,
        log: Arc<dyn PublicationLog>,
        cascade: Arc<dyn CascadeBuilder>,
        assembler: TransactionAssembler,
        progress: Arc<dyn ProgressPublisher>,
    ) -> Self {
        Self {
            store,
            log,
            cascade,
            assembler,
            progress,
            capacity_override: None,
        }
    }

    /// Use a fixed cascade capacity instead of `max(valid, invalid / 2)`.
    pub fn with_capacity_override(mut self, capacity: Option<f64>) -> Self {
        self.capacity_override = capacity;
        self
    }

    /// Address blobs are sent to.
    pub fn publisher_address(&self) -> &str {
        self.assembler.address()
    }

    pub(crate) fn store(&self) -> &Arc<dyn StatusStore> {
        &self.store
    }

    pub(crate) fn log(&self) -> &Arc<dyn PublicationLog> {
        &self.log
    }

    /// Publish the current status sets.
    ///
    /// Writes exactly one record on success and none on failure.
    pub async fn publish(&self) -> Result<PublicationOutcome, PublicationError> {
        let run_id = Uuid::new_v4();
        self.run().instrument(info_span!("publish", %run_id)).await
    }

    async fn run(&self) -> Result<PublicationOutcome, PublicationError> {
        let mut tracker = StageTracker {
            progress: self.progress.as_ref(),
            stage: PipelineStage::Idle,
            step: PipelineStep::QueryStatus,
        };

        tracker.begin(PipelineStep::QueryStatus).await;
        let valid = self
            .store
            .get_ids_by_status(STATUS_VALID)
            .await
            .map_err(|e| tracker.fail(e))?;
        let invalid = self
            .store
            .get_ids_by_status(STATUS_INVALID)
            .await
            .map_err(|e| tracker.fail(e))?;
        let (valid_count, invalid_count) = (valid.len(), invalid.len());
        tracker
            .complete(
                ProgressEvent::completed(PipelineStep::QueryStatus)
                    .with_metric("validSetSize", valid_count)
                    .with_metric("invalidSetSize", invalid_count),
            )
            .await;

        let capacity = self
            .capacity_override
            .unwrap_or_else(|| r_hat(valid_count, invalid_count));

        tracker.begin(PipelineStep::ConstructCascade).await;
        let construction_started = Instant::now();
        let builder = Arc::clone(&self.cascade);
        let cascade = tokio::task::spawn_blocking(move || builder.build(&valid, &invalid, capacity))
            .await
            .map_err(|e| CascadeError::Task {
                message: e.to_string(),
            })
            .and_then(|built| built)
            .map_err(|e| tracker.fail(e))?;
        let construction_seconds = round_seconds(construction_started.elapsed().as_secs_f64());
        tracker
            .complete(
                ProgressEvent::completed(PipelineStep::ConstructCascade)
                    .with_metric("levelCount", cascade.depth)
                    .with_metric("capacity", capacity),
            )
            .await;

        // Encoding: hex payload, canonical blocks, blobs and their proofs.
        tracker.begin(PipelineStep::SerializeCascade).await;
        let publication_started = Instant::now();
        let payload = self.cascade.to_hex(&cascade.bytes, &cascade.salt);
        let serialized_byte_size = strip_hex_prefix(&payload).len() / 2;
        let blobs = self
            .assembler
            .prepare(&payload)
            .await
            .map_err(|e| tracker.fail(e))?;
        let blob_count = blobs.len();
        tracker
            .complete(
                ProgressEvent::completed(PipelineStep::SerializeCascade)
                    .with_metric("serializedDataSize", serialized_byte_size)
                    .with_metric("numberOfBlobs", blob_count),
            )
            .await;

        tracker.begin(PipelineStep::SubmitTransaction).await;
        let submission = self
            .assembler
            .send(blobs)
            .await
            .map_err(|e| tracker.fail(e))?;
        let publication_seconds = round_seconds(publication_started.elapsed().as_secs_f64());
        let receipt = &submission.receipt;
        tracker
            .complete(
                ProgressEvent::completed(PipelineStep::SubmitTransaction)
                    .with_metric("numberOfBlobs", blob_count)
                    .with_metric("transactionHash", receipt.tx_hash.clone())
                    .with_metric("blockNumber", receipt.block_number),
            )
            .await;

        tracker.begin(PipelineStep::ComputeCosts).await;
        let costs = CostAccountant::account(receipt, &submission.blobs);
        tracker
            .complete(
                ProgressEvent::completed(PipelineStep::ComputeCosts)
                    .with_metric("transactionCost", costs.transaction_cost)
                    .with_metric("calldataTotalCost", costs.calldata_counterfactual_cost),
            )
            .await;

        tracker.begin(PipelineStep::StoreLog).await;
        let record = PublicationRecord {
            valid_count,
            invalid_count,
            serialized_byte_size,
            construction_seconds,
            publication_seconds,
            blob_count,
            tx_hash: receipt.tx_hash.clone(),
            blob_hashes: receipt.blob_versioned_hashes.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            transaction_cost: costs.transaction_cost,
            calldata_counterfactual_cost: costs.calldata_counterfactual_cost,
            cascade_depth: cascade.depth,
            capacity,
            block_number: receipt.block_number,
            transaction_cost_wei: costs.transaction_cost_wei,
            calldata_gas: costs.calldata_gas,
        };
        let log_id = self
            .log
            .insert_log(record.clone())
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker
            .complete(
                ProgressEvent::completed(PipelineStep::StoreLog).with_metric("logId", log_id),
            )
            .await;

        info!(
            log_id,
            tx_hash = %record.tx_hash,
            blob_count = record.blob_count,
            cascade_depth = record.cascade_depth,
            "Publication logged"
        );
        Ok(PublicationOutcome { log_id, record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{harness, Harness, StubCascade};
    use crset_bus::StepFilter;
    use crset_types::StepStatus;
    use cs_01_status_store::StatusError;
    use cs_02_blob_encoder::EncodingError;
    use cs_03_blob_submission::SubmissionError;

    async fn seed(h: &Harness) {
        h.kv.insert_status_entry("a", true).await.unwrap();
        h.kv.insert_status_entry("b", true).await.unwrap();
        h.kv.insert_status_entry("c", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_writes_one_record() {
        let h = harness(StubCascade::ok());
        seed(&h).await;

        let outcome = h.orchestrator.publish().await.unwrap();

        assert_eq!(outcome.log_id, 1);
        assert_eq!(outcome.record.valid_count, 2);
        assert_eq!(outcome.record.invalid_count, 1);
        assert_eq!(outcome.record.capacity, 2.0);
        assert_eq!(outcome.record.cascade_depth, 3);
        assert_eq!(outcome.record.blob_count, 1);
        assert_eq!(h.kv.list_logs().await.unwrap().len(), 1);
        assert_eq!(*h.cascade.last_capacity.lock(), Some(2.0));
    }

    #[tokio::test]
    async fn test_capacity_override() {
        let h = harness(StubCascade::ok());
        seed(&h).await;
        let orchestrator = h.orchestrator.with_capacity_override(Some(4096.0));

        let outcome = orchestrator.publish().await.unwrap();
        assert_eq!(outcome.record.capacity, 4096.0);
    }

    #[tokio::test]
    async fn test_progress_order() {
        let h = harness(StubCascade::ok());
        seed(&h).await;
        let mut sub = h.bus.subscribe(StepFilter::all());

        h.orchestrator.publish().await.unwrap();

        let mut seen = Vec::new();
        while let Ok(Some(event)) = sub.try_recv() {
            seen.push((event.step, event.status));
        }

        let mut expected = Vec::new();
        for step in [
            PipelineStep::QueryStatus,
            PipelineStep::ConstructCascade,
            PipelineStep::SerializeCascade,
            PipelineStep::SubmitTransaction,
            PipelineStep::ComputeCosts,
            PipelineStep::StoreLog,
        ] {
            expected.push((step, StepStatus::Started));
            expected.push((step, StepStatus::Completed));
        }
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_cascade_failure_logs_nothing() {
        let h = harness(StubCascade::failing());
        seed(&h).await;
        let mut sub = h.bus.subscribe(StepFilter::all());

        let err = h.orchestrator.publish().await.unwrap_err();

        assert_eq!(err.stage, PipelineStep::ConstructCascade);
        assert!(matches!(err.source, PublicationFailure::Cascade(_)));
        assert!(h.kv.list_logs().await.unwrap().is_empty());

        let mut last = None;
        while let Ok(Some(event)) = sub.try_recv() {
            last = Some((event.step, event.status));
        }
        assert_eq!(
            last,
            Some((PipelineStep::ConstructCascade, StepStatus::Started))
        );
    }

    #[tokio::test]
    async fn test_submission_failure_is_tagged() {
        let h = harness(StubCascade::ok());
        seed(&h).await;
        h.chain.reject.store(true, std::sync::atomic::Ordering::SeqCst);

        let err = h.orchestrator.publish().await.unwrap_err();

        assert_eq!(err.stage, PipelineStep::SubmitTransaction);
        assert!(h.kv.list_logs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_payload_fails_while_encoding() {
        // Salt plus these bytes need seven blobs.
        let h = harness(StubCascade::with_len(6 * 4096 * 31));
        seed(&h).await;
        let mut sub = h.bus.subscribe(StepFilter::all());

        let err = h.orchestrator.publish().await.unwrap_err();

        assert_eq!(err.stage, PipelineStep::SerializeCascade);
        assert_eq!(PipelineStage::from(err.stage), PipelineStage::Encoding);
        assert!(matches!(
            err.source,
            PublicationFailure::Submission(SubmissionError::Encoding(
                EncodingError::CapacityExceeded { blob_count: 7, .. }
            ))
        ));
        assert!(h.kv.list_logs().await.unwrap().is_empty());
        assert_eq!(h.chain.sent.load(std::sync::atomic::Ordering::SeqCst), 0);

        let mut last = None;
        while let Ok(Some(event)) = sub.try_recv() {
            last = Some((event.step, event.status));
        }
        assert_eq!(
            last,
            Some((PipelineStep::SerializeCascade, StepStatus::Started))
        );
    }

    #[tokio::test]
    async fn test_blob_count_reported_before_submission() {
        let h = harness(StubCascade::ok());
        seed(&h).await;
        let mut sub = h.bus.subscribe(StepFilter::steps(vec![PipelineStep::SerializeCascade]));

        h.orchestrator.publish().await.unwrap();

        let _started = sub.try_recv().unwrap().unwrap();
        let completed = sub.try_recv().unwrap().unwrap();
        assert_eq!(completed.status, StepStatus::Completed);
        assert_eq!(completed.metric("numberOfBlobs"), Some(&serde_json::json!(1)));
        assert_eq!(completed.metric("serializedDataSize"), Some(&serde_json::json!(48)));
    }

    #[test]
    fn test_error_display_names_stage() {
        let err = PublicationError::new(
            PipelineStep::QueryStatus,
            StatusError::NotFound { id: "x".into() },
        );
        assert!(err.to_string().starts_with("Publication failed at queryDB"));
    }
}
