//! Error types for the publication pipeline.

use crset_types::PipelineStep;
use cs_01_status_store::StatusError;
use cs_03_blob_submission::SubmissionError;
use thiserror::Error;

/// Errors from building or decoding a cascade.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CascadeError {
    /// A set does not fit the requested capacity.
    #[error("Capacity {capacity} too small for {valid} valid and {invalid} invalid ids")]
    CapacityTooSmall {
        valid: usize,
        invalid: usize,
        capacity: f64,
    },

    /// False positives did not die out within the level limit.
    #[error("Cascade did not converge within {levels} levels")]
    DidNotConverge { levels: usize },

    /// Serialized bytes could not be parsed.
    #[error("Malformed cascade: {message}")]
    Malformed { message: String },

    /// The build task panicked or was cancelled.
    #[error("Cascade task failed: {message}")]
    Task { message: String },
}

/// Underlying cause of a failed publish.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PublicationFailure {
    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Cascade(#[from] CascadeError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// A publish that stopped at `stage`. Nothing was logged.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Publication failed at {stage}: {source}")]
pub struct PublicationError {
    pub stage: PipelineStep,
    #[source]
    pub source: PublicationFailure,
}

impl PublicationError {
    pub fn new(stage: PipelineStep, source: impl Into<PublicationFailure>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
