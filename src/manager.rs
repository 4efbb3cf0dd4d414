//! StageManager: the composed public classification surface
//!
//! Wires the validator, classification engine, response generator, and
//! optional caregiver client together behind a single `classify` call.

use tracing::{debug, warn};

use crate::care::CareClient;
use crate::config::Config;
use crate::domain::{ClassificationResponse, Intent, Status, TaskContext};
use crate::engine::{ClassificationEngine, PatternMatcher};
use crate::llm::{self, LlmClassifier};
use crate::response::{ResponseContext, ResponseGenerator};
use crate::validate;

/// Classifier agent for task stage navigation
///
/// Holds only read-only configuration and stateless components: one instance
/// serves concurrent classify calls without locking.
pub struct StageManager {
    engine: ClassificationEngine,
    care: Option<CareClient>,
}

impl StageManager {
    /// Build a manager from configuration
    ///
    /// Construction never fails: a misconfigured LLM section is logged as a
    /// warning and classification degrades to the pattern matcher; a
    /// misconfigured caregiver section disables notifications.
    pub fn new(config: Config) -> Self {
        debug!("StageManager::new: called");

        let matcher = PatternMatcher::new(config.classification_rules.resolve());

        let classifier = match llm::create_client(&config.llm) {
            Ok(client) => Some(LlmClassifier::new(client, config.llm.clone())),
            Err(e) => {
                warn!(error = %e, "LLM client unavailable, falling back to pattern matching only");
                None
            }
        };

        let care = config.care.as_ref().and_then(CareClient::from_config);

        Self {
            engine: ClassificationEngine::new(matcher, classifier),
            care,
        }
    }

    /// Classify user input and return a status code with message
    ///
    /// Returns ERROR only for contract violations (empty input, malformed
    /// context); every classification-path failure resolves to one of the
    /// seven intents, with UNKNOWN as the safe default.
    pub async fn classify(
        &self,
        user_input: &str,
        task_context: Option<&serde_json::Value>,
    ) -> ClassificationResponse {
        if !validate::validate_user_input(user_input) {
            return ResponseGenerator::generate(
                Status::Error,
                Some(&ResponseContext::Error {
                    message: "Input cannot be empty or whitespace-only".to_string(),
                }),
            );
        }

        let context = match task_context {
            Some(value) => {
                if !validate::validate_task_context(value) {
                    return invalid_context_response();
                }
                match TaskContext::from_value(value) {
                    Ok(context) => Some(context),
                    Err(e) => {
                        warn!(error = %e, "Task context failed deserialization after validation");
                        return invalid_context_response();
                    }
                }
            }
            None => None,
        };

        let intent = self.engine.classify_intent(user_input, context.as_ref()).await;

        if intent == Intent::Care {
            let notified = match &self.care {
                Some(care) => care.notify(user_input, context.as_ref()).await,
                None => false,
            };
            return ResponseGenerator::generate(Status::Care, Some(&ResponseContext::CareDelivery { notified }));
        }

        ResponseGenerator::generate(intent.into(), None)
    }
}

fn invalid_context_response() -> ClassificationResponse {
    ResponseGenerator::generate(
        Status::Error,
        Some(&ResponseContext::Error {
            message: "Invalid task context structure".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pattern_only_manager() -> StageManager {
        // Point the key lookup at a variable that is never set so the
        // manager degrades to pattern matching
        let config = Config {
            llm: crate::config::LlmConfig {
                api_key_env: "MANAGER_TEST_UNSET_KEY".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        StageManager::new(config)
    }

    #[tokio::test]
    async fn test_empty_input_is_error() {
        let manager = pattern_only_manager();
        let response = manager.classify("   ", None).await;
        assert_eq!(response.status, Status::Error);
        assert_eq!(response.message, "Input cannot be empty or whitespace-only");
    }

    #[tokio::test]
    async fn test_malformed_context_is_error() {
        let manager = pattern_only_manager();
        let context = json!({"task": "t", "stages": []});
        let response = manager.classify("continue", Some(&context)).await;
        assert_eq!(response.status, Status::Error);
        assert_eq!(response.message, "Invalid task context structure");
    }

    #[tokio::test]
    async fn test_classifies_via_patterns() {
        let manager = pattern_only_manager();
        let response = manager.classify("continue", None).await;
        assert_eq!(response.status, Status::Next);
        assert!(!response.message.is_empty());
    }

    #[tokio::test]
    async fn test_care_without_client_reports_unreached() {
        let manager = pattern_only_manager();
        let response = manager.classify("I'm really worried", None).await;
        assert_eq!(response.status, Status::Care);
        assert!(response.message.contains("couldn't reach"));
    }

    #[tokio::test]
    async fn test_boundary_override_end_to_end() {
        let manager = pattern_only_manager();
        let context = json!({
            "task": "t",
            "description": "d",
            "status": "in progress",
            "stages": [
                {"stage": "A", "description": "", "timeout": 60},
                {"stage": "B", "description": "", "timeout": 60}
            ],
            "current_stage": "A"
        });
        let response = manager.classify("go back", Some(&context)).await;
        assert_eq!(response.status, Status::Unknown);
    }
}
