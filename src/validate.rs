//! Input and task-context validation
//!
//! Pure predicates over caller-supplied strings and JSON. A validation
//! failure here means the caller violated the contract; it is surfaced as an
//! ERROR response before the classification engine ever runs. These
//! functions log and return false, they never panic.

use tracing::{debug, warn};

/// Validate user text input is not empty or whitespace-only
pub fn validate_user_input(user_input: &str) -> bool {
    if user_input.trim().is_empty() {
        warn!("User input is empty or whitespace-only");
        return false;
    }
    debug!(input_len = user_input.len(), "validate_user_input: ok");
    true
}

/// Validate a task context value has the required structure
///
/// Required top-level fields: task, description, status, stages. Each stage
/// needs stage, description, and a non-negative numeric timeout.
/// `current_stage` is optional.
pub fn validate_task_context(task_context: &serde_json::Value) -> bool {
    let Some(object) = task_context.as_object() else {
        warn!("Task context is not an object");
        return false;
    };

    for field in ["task", "description", "status", "stages"] {
        if !object.contains_key(field) {
            warn!(%field, "Task context missing required field");
            return false;
        }
    }

    for field in ["task", "description", "status"] {
        if !object[field].is_string() {
            warn!(%field, "Task context field must be a string");
            return false;
        }
    }

    let Some(stages) = object["stages"].as_array() else {
        warn!("Task context 'stages' field must be a list");
        return false;
    };

    for (idx, stage) in stages.iter().enumerate() {
        if !validate_stage(idx, stage) {
            return false;
        }
    }

    debug!(stage_count = stages.len(), "validate_task_context: ok");
    true
}

fn validate_stage(idx: usize, stage: &serde_json::Value) -> bool {
    let Some(object) = stage.as_object() else {
        warn!(%idx, "Stage is not an object");
        return false;
    };

    for field in ["stage", "description", "timeout"] {
        if !object.contains_key(field) {
            warn!(%idx, %field, "Stage missing required field");
            return false;
        }
    }

    for field in ["stage", "description"] {
        if !object[field].is_string() {
            warn!(%idx, %field, "Stage field must be a string");
            return false;
        }
    }

    match object["timeout"].as_f64() {
        Some(timeout) if timeout >= 0.0 => true,
        Some(timeout) => {
            warn!(%idx, %timeout, "Stage has negative timeout");
            false
        }
        None => {
            warn!(%idx, "Stage timeout must be a number");
            false
        }
    }
}

/// Parse a JSON string into a task context value
///
/// Returns None for empty input or malformed JSON; the error is logged.
pub fn parse_task_context(task_json: &str) -> Option<serde_json::Value> {
    if task_json.trim().is_empty() {
        warn!("Task JSON is empty or whitespace-only");
        return None;
    }

    match serde_json::from_str(task_json) {
        Ok(value) => {
            debug!("parse_task_context: parsed");
            Some(value)
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse task context JSON");
            None
        }
    }
}
