//! StageManager - intent classification for multi-stage task navigation
//!
//! Classifies free-form user utterances into one of seven intents (NEXT,
//! PREVIOUS, EXIT, HELP, CARE, HELLO, UNKNOWN) to drive a multi-stage task
//! workflow. Remote LLM classification is best-effort with retry and
//! backoff; a deterministic keyword matcher is the fallback, and stage
//! boundaries suppress contextually invalid navigation.
//!
//! # Core properties
//!
//! - **Never errors from classification**: every failure on the
//!   classification path degrades to the local fallback, ultimately to
//!   UNKNOWN. ERROR is reserved for malformed caller input.
//! - **No cross-call state**: each call owns its request and retry state;
//!   components hold only read-only configuration, so one instance serves
//!   concurrent calls without locking.
//! - **Text beats context**: a stage reference in the utterance overrides
//!   the context's current-stage marker.
//!
//! # Modules
//!
//! - [`manager`] - composed public surface ([`StageManager`])
//! - [`engine`] - classification orchestration, stage resolution, patterns
//! - [`llm`] - provider adapters and the retry/parse classifier
//! - [`validate`] - input and context contract checks
//! - [`response`] - status-to-message generation
//! - [`care`] - caregiver notification client
//! - [`config`] - configuration types and loading

pub mod care;
pub mod config;
pub mod domain;
pub mod engine;
pub mod llm;
pub mod manager;
pub mod response;
pub mod validate;

// Re-export commonly used types
pub use care::CareClient;
pub use config::{CareConfig, Config, LlmConfig, RulesConfig, default_rules};
pub use domain::{ClassificationResponse, Intent, IntentReply, Stage, Status, TaskContext};
pub use engine::{ClassificationEngine, PatternMatcher, ResolvedStage, StageResolver};
pub use llm::{
    AnthropicClient, ClassificationRequest, CustomClient, LlmClassifier, LlmClient, LlmError, OpenAIClient,
    build_prompt, create_client,
};
pub use manager::StageManager;
pub use response::{ResponseContext, ResponseGenerator};
