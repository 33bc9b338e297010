//! Step filters for subscriptions.

use crset_types::{PipelineStep, ProgressEvent};

/// Selects which pipeline steps a subscription receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepFilter {
    /// Steps to receive; empty means every step.
    pub steps: Vec<PipelineStep>,
}

impl StepFilter {
    /// Receive every step.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Receive only the given steps.
    #[must_use]
    pub fn steps(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }

    /// Whether the event passes this filter.
    #[must_use]
    pub fn matches(&self, event: &ProgressEvent) -> bool {
        self.steps.is_empty() || self.steps.contains(&event.step)
    }
}
