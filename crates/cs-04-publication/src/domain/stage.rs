//! Publication state machine.

use crset_types::PipelineStep;
use std::fmt;

/// Stage of one publish run.
///
/// ```text
/// Idle → QueryingStatus → ConstructingCascade → Encoding → Submitting
///      → Accounting → Logged
///
/// any active stage ──failure──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    QueryingStatus,
    ConstructingCascade,
    Encoding,
    Submitting,
    Accounting,
    Logged,
    Failed,
}

impl PipelineStage {
    /// The stage that follows on success. Terminal stages have none.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::QueryingStatus),
            Self::QueryingStatus => Some(Self::ConstructingCascade),
            Self::ConstructingCascade => Some(Self::Encoding),
            Self::Encoding => Some(Self::Submitting),
            Self::Submitting => Some(Self::Accounting),
            Self::Accounting => Some(Self::Logged),
            Self::Logged | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Logged | Self::Failed)
    }

    /// Progress step reported while this stage runs.
    ///
    /// `Encoding` reports as `serializeBFC` and covers the hex payload, blob
    /// partitioning and proving. `Logged` covers the log write that
    /// completes the run.
    pub fn step(self) -> Option<PipelineStep> {
        match self {
            Self::QueryingStatus => Some(PipelineStep::QueryStatus),
            Self::ConstructingCascade => Some(PipelineStep::ConstructCascade),
            Self::Encoding => Some(PipelineStep::SerializeCascade),
            Self::Submitting => Some(PipelineStep::SubmitTransaction),
            Self::Accounting => Some(PipelineStep::ComputeCosts),
            Self::Logged => Some(PipelineStep::StoreLog),
            Self::Idle | Self::Failed => None,
        }
    }
}

impl From<PipelineStep> for PipelineStage {
    /// Stage during which `step` runs.
    fn from(step: PipelineStep) -> Self {
        match step {
            PipelineStep::QueryStatus => Self::QueryingStatus,
            PipelineStep::ConstructCascade => Self::ConstructingCascade,
            PipelineStep::SerializeCascade => Self::Encoding,
            PipelineStep::SubmitTransaction => Self::Submitting,
            PipelineStep::ComputeCosts => Self::Accounting,
            PipelineStep::StoreLog => Self::Logged,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path_visits_every_step_once() {
        let mut stage = PipelineStage::Idle;
        let mut steps = Vec::new();
        while let Some(next) = stage.next() {
            stage = next;
            steps.extend(stage.step());
        }

        assert_eq!(stage, PipelineStage::Logged);
        assert_eq!(
            steps,
            vec![
                PipelineStep::QueryStatus,
                PipelineStep::ConstructCascade,
                PipelineStep::SerializeCascade,
                PipelineStep::SubmitTransaction,
                PipelineStep::ComputeCosts,
                PipelineStep::StoreLog,
            ]
        );
    }

    #[test]
    fn test_step_and_stage_agree() {
        let mut stage = PipelineStage::Idle;
        while let Some(next) = stage.next() {
            stage = next;
            let step = stage.step().unwrap();
            assert_eq!(PipelineStage::from(step), stage);
        }
    }

    #[test]
    fn test_terminal_stages() {
        assert!(PipelineStage::Logged.is_terminal());
        assert!(PipelineStage::Failed.is_terminal());
        assert_eq!(PipelineStage::Failed.next(), None);
        assert!(!PipelineStage::Submitting.is_terminal());
    }
}
