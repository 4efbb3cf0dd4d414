//! Remote LLM classification
//!
//! Provider adapters behind the [`LlmClient`] trait, plus the retry/parse
//! layer ([`LlmClassifier`]) that turns unreliable provider output into a
//! validated intent.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod classifier;
pub mod client;
mod custom;
mod error;
mod openai;
mod prompt;

pub use anthropic::AnthropicClient;
pub use classifier::LlmClassifier;
pub use client::LlmClient;
pub use custom::CustomClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use prompt::{ClassificationRequest, build_prompt};

use crate::config::LlmConfig;

/// Create an LLM transport based on the provider specified in config
///
/// Supports "anthropic", "openai", and "custom" providers. An empty provider
/// string falls back to detection from the endpoint or model name.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    let provider = detect_provider(config)?;
    debug!(%provider, model = %config.model, "create_client: called");
    match provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        "openai" => Ok(Arc::new(OpenAIClient::from_config(config)?)),
        "custom" => Ok(Arc::new(CustomClient::from_config(config)?)),
        other => Err(LlmError::NotConfigured(format!(
            "Unknown LLM provider: '{other}'. Supported: anthropic, openai, custom"
        ))),
    }
}

/// Resolve the provider name, detecting from endpoint/model when unset
fn detect_provider(config: &LlmConfig) -> Result<String, LlmError> {
    if !config.provider.is_empty() {
        return Ok(config.provider.clone());
    }

    let endpoint = config.endpoint.to_lowercase();
    if endpoint.contains("anthropic") {
        return Ok("anthropic".to_string());
    }
    if endpoint.contains("openai") {
        return Ok("openai".to_string());
    }

    let model = config.model.to_lowercase();
    if model.contains("gpt") || model.contains("davinci") {
        return Ok("openai".to_string());
    }
    if model.contains("claude") {
        return Ok("anthropic".to_string());
    }

    if !config.endpoint.is_empty() {
        return Ok("custom".to_string());
    }

    Err(LlmError::NotConfigured(
        "Cannot detect LLM provider: set provider, endpoint, or a recognizable model name".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_provider_explicit_wins() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            model: "claude-3-5-haiku-20241022".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(detect_provider(&config).unwrap(), "openai");
    }

    #[test]
    fn test_detect_provider_from_model() {
        let config = LlmConfig {
            provider: String::new(),
            model: "gpt-4".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(detect_provider(&config).unwrap(), "openai");

        let config = LlmConfig {
            provider: String::new(),
            model: "claude-3-opus".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(detect_provider(&config).unwrap(), "anthropic");
    }

    #[test]
    fn test_detect_provider_from_endpoint() {
        let config = LlmConfig {
            provider: String::new(),
            model: "mystery-model".to_string(),
            endpoint: "https://api.openai.example/v1/chat".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(detect_provider(&config).unwrap(), "openai");
    }

    #[test]
    fn test_detect_provider_unrecognized_endpoint_is_custom() {
        let config = LlmConfig {
            provider: String::new(),
            model: "local-llama".to_string(),
            endpoint: "http://localhost:11434/api/generate".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(detect_provider(&config).unwrap(), "custom");
    }

    #[test]
    fn test_detect_provider_undetectable_is_error() {
        let config = LlmConfig {
            provider: String::new(),
            model: "mystery-model".to_string(),
            endpoint: String::new(),
            ..LlmConfig::default()
        };
        assert!(matches!(detect_provider(&config), Err(LlmError::NotConfigured(_))));
    }

    #[test]
    fn test_create_client_unknown_provider_is_error() {
        let config = LlmConfig {
            provider: "bedrock".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(create_client(&config), Err(LlmError::NotConfigured(_))));
    }
}
