//! Classification engine
//!
//! Orchestrates stage resolution, the remote classifier, and the local
//! pattern fallback into a single intent per call. The engine never errors:
//! every classification-path failure degrades to the pattern matcher, and
//! ultimately to Unknown.

mod patterns;
mod stage;

pub use patterns::PatternMatcher;
pub use stage::{ResolvedStage, StageResolver};

use tracing::{debug, error, warn};

use crate::domain::{Intent, TaskContext};
use crate::llm::{ClassificationRequest, LlmClassifier};

/// Per-instance classification orchestrator
///
/// Holds only read-only configuration set at construction: concurrent
/// classify calls share it freely without locking. No state survives a call.
pub struct ClassificationEngine {
    resolver: StageResolver,
    matcher: PatternMatcher,
    classifier: Option<LlmClassifier>,
}

impl ClassificationEngine {
    pub fn new(matcher: PatternMatcher, classifier: Option<LlmClassifier>) -> Self {
        debug!(has_classifier = classifier.is_some(), "ClassificationEngine::new: called");
        Self {
            resolver: StageResolver::new(),
            matcher,
            classifier,
        }
    }

    /// Classify user input into exactly one intent
    ///
    /// Remote classification is best-effort: transport failures are retried
    /// by the classifier and then absorbed by falling back to the pattern
    /// matcher, never surfaced to the caller. The boundary override applies
    /// identically to both paths.
    pub async fn classify_intent(&self, user_input: &str, context: Option<&TaskContext>) -> Intent {
        debug!(input_len = user_input.len(), has_context = context.is_some(), "classify_intent: called");

        let resolved = self.resolver.resolve(user_input, context);

        if let Some(classifier) = &self.classifier {
            if classifier.is_available() {
                let request = ClassificationRequest::new(user_input, context, &resolved);
                match classifier.classify(&request).await {
                    Ok(reply) => {
                        debug!(intent = %reply.intent, "classify_intent: remote result");
                        return apply_boundary(reply.intent, &resolved);
                    }
                    Err(e) if e.is_retryable() => {
                        warn!(failure = e.kind(), "classify_intent: remote classification exhausted, falling back to patterns");
                    }
                    Err(e) => {
                        error!(failure = e.kind(), error = %e, "classify_intent: remote reply unusable, falling back to patterns");
                    }
                }
            } else {
                debug!("classify_intent: classifier not available, using patterns");
            }
        }

        let intent = self.matcher.matches(user_input);
        apply_boundary(intent, &resolved)
    }
}

/// Suppress contextually invalid navigation at sequence boundaries
///
/// PREVIOUS at the first stage and NEXT at the last stage are replaced with
/// Unknown, regardless of which path produced the raw intent.
fn apply_boundary(intent: Intent, resolved: &ResolvedStage) -> Intent {
    match intent {
        Intent::Previous if resolved.is_first => {
            debug!("apply_boundary: PREVIOUS at first stage, overriding to UNKNOWN");
            Intent::Unknown
        }
        Intent::Next if resolved.is_last => {
            debug!("apply_boundary: NEXT at last stage, overriding to UNKNOWN");
            Intent::Unknown
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LlmConfig, default_rules};
    use crate::domain::Stage;
    use crate::llm::client::mock::{MockLlmClient, MockReply};
    use std::sync::Arc;

    fn context(stages: &[&str], current: Option<&str>) -> TaskContext {
        TaskContext {
            task: "morning routine".to_string(),
            description: "daily flow".to_string(),
            status: "in progress".to_string(),
            stages: stages
                .iter()
                .map(|name| Stage {
                    stage: name.to_string(),
                    description: String::new(),
                    timeout: 60,
                })
                .collect(),
            current_stage: current.map(|s| s.to_string()),
        }
    }

    fn pattern_only_engine() -> ClassificationEngine {
        ClassificationEngine::new(PatternMatcher::new(default_rules()), None)
    }

    fn engine_with_mock(client: Arc<MockLlmClient>) -> ClassificationEngine {
        // SAFETY: test-only env mutation, variable name unique to this file
        unsafe { std::env::set_var("ENGINE_TEST_KEY", "sk-test") };
        let config = LlmConfig {
            api_key_env: "ENGINE_TEST_KEY".to_string(),
            max_retries: 1,
            retry_delay_secs: 0,
            ..LlmConfig::default()
        };
        ClassificationEngine::new(
            PatternMatcher::new(default_rules()),
            Some(LlmClassifier::new(client, config)),
        )
    }

    #[tokio::test]
    async fn test_pattern_only_next() {
        let engine = pattern_only_engine();
        assert_eq!(engine.classify_intent("continue", None).await, Intent::Next);
    }

    #[tokio::test]
    async fn test_previous_at_first_stage_overridden() {
        let engine = pattern_only_engine();
        let ctx = context(&["A", "B"], Some("A"));
        assert_eq!(engine.classify_intent("go back", Some(&ctx)).await, Intent::Unknown);
    }

    #[tokio::test]
    async fn test_previous_at_later_stage_allowed() {
        let engine = pattern_only_engine();
        let ctx = context(&["A", "B"], Some("B"));
        assert_eq!(engine.classify_intent("go back", Some(&ctx)).await, Intent::Previous);
    }

    #[tokio::test]
    async fn test_next_at_last_stage_overridden() {
        let engine = pattern_only_engine();
        let ctx = context(&["A", "B"], Some("B"));
        assert_eq!(engine.classify_intent("continue", Some(&ctx)).await, Intent::Unknown);
    }

    #[tokio::test]
    async fn test_stage_extracted_from_text_drives_override() {
        // current_stage absent; "stage B" in the text makes is_last true
        let engine = pattern_only_engine();
        let ctx = context(&["A", "B"], None);
        assert_eq!(
            engine.classify_intent("I'm at stage B, continue", Some(&ctx)).await,
            Intent::Unknown
        );
    }

    #[tokio::test]
    async fn test_empty_stage_sequence_never_overrides() {
        let engine = pattern_only_engine();
        let ctx = context(&[], Some("A"));
        assert_eq!(engine.classify_intent("go back", Some(&ctx)).await, Intent::Previous);
        assert_eq!(engine.classify_intent("continue", Some(&ctx)).await, Intent::Next);
    }

    #[tokio::test]
    async fn test_remote_result_wins_over_patterns() {
        // Patterns would say NEXT ("continue"); the remote reply says HELP
        let client = Arc::new(MockLlmClient::with_text("HELP: user is asking for assistance"));
        let engine = engine_with_mock(client);
        assert_eq!(engine.classify_intent("continue", None).await, Intent::Help);
    }

    #[tokio::test]
    async fn test_remote_boundary_override_applies() {
        let client = Arc::new(MockLlmClient::with_text("PREVIOUS: wants to go back"));
        let engine = engine_with_mock(client);
        let ctx = context(&["A", "B"], Some("A"));
        assert_eq!(engine.classify_intent("let us revisit", Some(&ctx)).await, Intent::Unknown);
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back_to_patterns() {
        let client = Arc::new(MockLlmClient::unreachable());
        let engine = engine_with_mock(client.clone());
        assert_eq!(engine.classify_intent("continue", None).await, Intent::Next);
        // max_retries = 1: initial attempt + one retry
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back_to_patterns() {
        let client = Arc::new(MockLlmClient::with_text("I have no idea what this means"));
        let engine = engine_with_mock(client.clone());
        assert_eq!(engine.classify_intent("quit", None).await, Intent::Exit);
        // Malformed replies are terminal, never retried
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic_across_calls() {
        let client = Arc::new(MockLlmClient::unreachable());
        let engine = engine_with_mock(client);
        let pattern_engine = pattern_only_engine();

        for input in ["continue", "go back", "ramble ramble", "hello"] {
            let via_fallback = engine.classify_intent(input, None).await;
            let via_patterns = pattern_engine.classify_intent(input, None).await;
            assert_eq!(via_fallback, via_patterns, "input {input:?}");
        }
    }

    #[tokio::test]
    async fn test_unavailable_classifier_skips_remote_call() {
        let client = Arc::new(MockLlmClient::with_text("HELP: should never be seen"));
        let config = LlmConfig {
            api_key_env: "ENGINE_TEST_UNSET_KEY".to_string(),
            ..LlmConfig::default()
        };
        let engine = ClassificationEngine::new(
            PatternMatcher::new(default_rules()),
            Some(LlmClassifier::new(client.clone(), config)),
        );

        assert_eq!(engine.classify_intent("continue", None).await, Intent::Next);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_sequence_then_fallback_override() {
        // Remote path exhausts, pattern fallback says NEXT, boundary
        // override at the last stage still applies
        let client = Arc::new(MockLlmClient::new(vec![MockReply::Timeout, MockReply::Timeout]));
        let engine = engine_with_mock(client);
        let ctx = context(&["A", "B"], Some("B"));
        assert_eq!(engine.classify_intent("continue", Some(&ctx)).await, Intent::Unknown);
    }
}
