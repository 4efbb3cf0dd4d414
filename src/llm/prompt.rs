//! Classification prompt construction
//!
//! One prompt per call, embedding the user text verbatim, whatever task and
//! stage context was resolved, and the fixed intent enumeration with the
//! required reply format.

use tracing::debug;

use crate::domain::{Intent, TaskContext};
use crate::engine::ResolvedStage;

/// Normalized input for one remote classification attempt
///
/// Constructed fresh per call from the raw input, the caller's context, and
/// the resolver's output; owned by the engine for the duration of the call.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub user_input: String,
    pub task: Option<String>,
    pub task_description: Option<String>,
    pub stage_name: Option<String>,
    pub stage_description: Option<String>,
    pub is_first: bool,
    pub is_last: bool,
}

impl ClassificationRequest {
    /// Assemble a request from the raw input and resolved stage
    pub fn new(user_input: &str, context: Option<&TaskContext>, resolved: &ResolvedStage) -> Self {
        debug!(stage = ?resolved.name, "ClassificationRequest::new: called");
        let stage_description = resolved
            .name
            .as_deref()
            .and_then(|name| context.and_then(|ctx| ctx.stage_named(name)))
            .map(|stage| stage.description.clone());

        Self {
            user_input: user_input.to_string(),
            task: context.map(|ctx| ctx.task.clone()),
            task_description: context.map(|ctx| ctx.description.clone()),
            stage_name: resolved.name.clone(),
            stage_description,
            is_first: resolved.is_first,
            is_last: resolved.is_last,
        }
    }
}

/// Render the single classification prompt for a request
pub fn build_prompt(request: &ClassificationRequest) -> String {
    debug!("build_prompt: called");
    let mut prompt = String::from("Classify the user's message into exactly one intent.\n\n");

    prompt.push_str(&format!("User message: \"{}\"\n", request.user_input));

    if let Some(task) = &request.task {
        let description = request.task_description.as_deref().unwrap_or("");
        prompt.push_str(&format!("Task: {task} - {description}\n"));
    }

    if let Some(stage) = &request.stage_name {
        match &request.stage_description {
            Some(description) => prompt.push_str(&format!("Current stage: {stage} - {description}\n")),
            None => prompt.push_str(&format!("Current stage: {stage}\n")),
        }
    }

    if request.is_first {
        prompt.push_str("The user is at the FIRST stage: there is no previous stage to go back to.\n");
    }
    if request.is_last {
        prompt.push_str("The user is at the LAST stage: there is no next stage to advance to.\n");
    }

    prompt.push_str("\nIntents:\n");
    for intent in Intent::ALL {
        prompt.push_str(&format!("{}: {}\n", intent.as_str(), intent.definition()));
    }

    prompt.push_str(
        "\nRespond with the intent token followed by a brief rationale, \
         for example: \"NEXT: the user wants to move on\".\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stage;

    fn sample_context() -> TaskContext {
        TaskContext {
            task: "morning routine".to_string(),
            description: "daily wake-up flow".to_string(),
            status: "in progress".to_string(),
            stages: vec![
                Stage {
                    stage: "wake up".to_string(),
                    description: "get out of bed".to_string(),
                    timeout: 300,
                },
                Stage {
                    stage: "breakfast".to_string(),
                    description: "eat breakfast".to_string(),
                    timeout: 1200,
                },
            ],
            current_stage: Some("breakfast".to_string()),
        }
    }

    #[test]
    fn test_prompt_contains_user_input_and_intents() {
        let resolved = ResolvedStage::default();
        let request = ClassificationRequest::new("let's keep going", None, &resolved);
        let prompt = build_prompt(&request);

        assert!(prompt.contains("let's keep going"));
        for intent in Intent::ALL {
            assert!(prompt.contains(intent.as_str()), "missing {intent}");
        }
        assert!(!prompt.contains("Task:"));
        assert!(!prompt.contains("Current stage:"));
    }

    #[test]
    fn test_prompt_embeds_task_and_stage_context() {
        let context = sample_context();
        let resolved = ResolvedStage {
            name: Some("breakfast".to_string()),
            is_first: false,
            is_last: true,
        };
        let request = ClassificationRequest::new("what now", Some(&context), &resolved);
        let prompt = build_prompt(&request);

        assert!(prompt.contains("morning routine"));
        assert!(prompt.contains("daily wake-up flow"));
        assert!(prompt.contains("Current stage: breakfast - eat breakfast"));
        assert!(prompt.contains("LAST stage"));
        assert!(!prompt.contains("FIRST stage"));
    }

    #[test]
    fn test_prompt_states_first_stage_boundary() {
        let context = sample_context();
        let resolved = ResolvedStage {
            name: Some("wake up".to_string()),
            is_first: true,
            is_last: false,
        };
        let request = ClassificationRequest::new("go back", Some(&context), &resolved);
        let prompt = build_prompt(&request);

        assert!(prompt.contains("FIRST stage"));
        assert!(!prompt.contains("LAST stage"));
    }
}
