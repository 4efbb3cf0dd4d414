//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API. One prompt
//! in, one text reply out; retry and parsing live in the classifier layer.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{LlmClient, LlmError};
use crate::config::LlmConfig;

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

const SYSTEM_PROMPT: &str = "You are a task navigation assistant.";

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    endpoint: String,
    http: Client,
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl AnthropicClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, "AnthropicClient::from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::NotConfigured(e.to_string()))?;

        let timeout = config.timeout();

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        let endpoint = if config.endpoint.is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            config.endpoint.clone()
        };

        Ok(Self {
            model: config.model.clone(),
            api_key,
            endpoint,
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout,
        })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        debug!(%self.model, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": SYSTEM_PROMPT,
            "messages": [{"role": "user", "content": prompt}],
        })
    }

    /// Map a reqwest failure to the error taxonomy
    ///
    /// The per-attempt timeout is enforced by the HTTP client; a request that
    /// runs past it surfaces here as a timeout failure, never as a slow
    /// success.
    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e)
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(%self.model, "complete: called");
        let body = self.build_request_body(prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "complete: API error");
            return Err(LlmError::ApiError { status, message: text });
        }

        let api_response: AnthropicResponse = response.json().await.map_err(|e| self.map_send_error(e))?;
        api_response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| LlmError::InvalidResponse("No text content in Anthropic response".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: Option<String>,
}
