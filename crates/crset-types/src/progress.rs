//! # Progress Events
//!
//! Ephemeral notifications emitted at the start and end of each publication
//! stage. Never persisted.
//!
//! Wire shape:
//!
//! ```text
//! {"step": "queryDB", "status": "completed", "additionalMetrics": {"validSetSize": 2}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Publication stage a progress event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStep {
    /// Reading the valid and invalid id sets.
    #[serde(rename = "queryDB")]
    QueryStatus,
    /// Building the filter cascade.
    #[serde(rename = "constructBFC")]
    ConstructCascade,
    /// Serializing the cascade and encoding it into proven blobs.
    #[serde(rename = "serializeBFC")]
    SerializeCascade,
    /// Submitting the blob transaction and awaiting inclusion.
    #[serde(rename = "sendBlobTransaction")]
    SubmitTransaction,
    /// Deriving cost metrics from the receipt.
    #[serde(rename = "computeCosts")]
    ComputeCosts,
    /// Writing the publication record.
    #[serde(rename = "storeLog")]
    StoreLog,
}

impl PipelineStep {
    /// Wire name of the step.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QueryStatus => "queryDB",
            Self::ConstructCascade => "constructBFC",
            Self::SerializeCascade => "serializeBFC",
            Self::SubmitTransaction => "sendBlobTransaction",
            Self::ComputeCosts => "computeCosts",
            Self::StoreLog => "storeLog",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a step just started or just completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Started,
    Completed,
}

/// A single progress notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub step: PipelineStep,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_metrics: Option<Map<String, Value>>,
}

impl ProgressEvent {
    /// A `started` event without metrics.
    pub fn started(step: PipelineStep) -> Self {
        Self {
            step,
            status: StepStatus::Started,
            additional_metrics: None,
        }
    }

    /// A `completed` event without metrics.
    pub fn completed(step: PipelineStep) -> Self {
        Self {
            step,
            status: StepStatus::Completed,
            additional_metrics: None,
        }
    }

    /// Attach a metric, creating the metrics object on first use.
    #[must_use]
    pub fn with_metric(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.additional_metrics
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Look up a metric by key.
    pub fn metric(&self, key: &str) -> Option<&Value> {
        self.additional_metrics.as_ref().and_then(|m| m.get(key))
    }

    /// Serialize to the JSON wire shape.
    pub fn to_json(&self) -> String {
        // Serializing a map of JSON values cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_without_metrics() {
        let event = ProgressEvent::started(PipelineStep::QueryStatus);
        assert_eq!(event.to_json(), r#"{"step":"queryDB","status":"started"}"#);
    }

    #[test]
    fn test_wire_shape_with_metrics() {
        let event = ProgressEvent::completed(PipelineStep::ConstructCascade)
            .with_metric("levelCount", 3);
        let json: Value = serde_json::from_str(&event.to_json()).unwrap();

        assert_eq!(json["step"], "constructBFC");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["additionalMetrics"]["levelCount"], 3);
    }

    #[test]
    fn test_step_names_match_serde() {
        for step in [
            PipelineStep::QueryStatus,
            PipelineStep::ConstructCascade,
            PipelineStep::SerializeCascade,
            PipelineStep::SubmitTransaction,
            PipelineStep::ComputeCosts,
            PipelineStep::StoreLog,
        ] {
            let json = serde_json::to_value(step).unwrap();
            assert_eq!(json, step.as_str());
        }
    }
}
