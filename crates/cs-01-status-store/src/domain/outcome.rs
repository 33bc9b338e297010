//! Results of conditional and bulk status writes.

/// What `patch_status_by_id` actually did.
///
/// Callers that only care whether the status changed use [`PatchOutcome::changed`];
/// `Unchanged` and `Missing` both read as `false` there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The row existed with a different status and was updated.
    Changed,
    /// The row already had the target status.
    Unchanged,
    /// No row exists for the id.
    Missing,
}

impl PatchOutcome {
    /// Whether the write modified the row.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Counts reported by a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows written.
    pub inserted: usize,
    /// Rows whose id already existed, in the store or earlier in the input.
    pub skipped: usize,
}
