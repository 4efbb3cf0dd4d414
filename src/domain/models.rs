//! Task context and response models
//!
//! These mirror the task-context wire shape consumed at the public
//! classification entry point. A context is immutable per call: it is
//! deserialized fresh from caller-supplied JSON and discarded afterwards.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Intent, Status};

/// A stage within a task flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    /// Stage name/identifier
    pub stage: String,

    /// Stage description
    pub description: String,

    /// Timeout in seconds for the stage, non-negative by construction
    pub timeout: u64,
}

/// Caller-supplied description of a multi-stage task
///
/// Stage order is execution order: the first entry is the first stage and
/// the last entry is the last stage for boundary purposes. Stage names are
/// expected to be unique within a context; this is a caller contract and is
/// not checked at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskContext {
    /// Task name/identifier
    pub task: String,

    /// Task description
    pub description: String,

    /// Task status (e.g. "not started", "in progress", "completed")
    pub status: String,

    /// Ordered stage sequence; may be empty (no boundary applies)
    #[serde(default)]
    pub stages: Vec<Stage>,

    /// Explicit current-stage marker; absence is not an error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,
}

impl TaskContext {
    /// Deserialize a context from caller-supplied JSON
    ///
    /// Callers are expected to run the structural validator first; this
    /// surfaces any residual shape mismatch as a serde error.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        debug!("TaskContext::from_value: called");
        serde_json::from_value(value.clone())
    }

    /// Look up a stage by name, case-insensitively
    ///
    /// Case-insensitive because stage references extracted from user text
    /// are lowercased before comparison.
    pub fn stage_named(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.stage.eq_ignore_ascii_case(name))
    }
}

/// The `{status, message}` value handed back to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResponse {
    pub status: Status,
    pub message: String,
}

impl ClassificationResponse {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A successfully parsed remote classification: the intent token plus the
/// explanatory text that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentReply {
    pub intent: Intent,
    pub message: String,
}
