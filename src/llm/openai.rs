//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for OpenAI's Chat Completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{LlmClient, LlmError};
use crate::config::LlmConfig;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are a task navigation assistant.";

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    endpoint: String,
    http: Client,
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, "OpenAIClient::from_config: called");
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
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e)
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(%self.model, "complete: called");
        let body = self.build_request_body(prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let api_response: OpenAIResponse = response.json().await.map_err(|e| self.map_send_error(e))?;
        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No message content in OpenAI response".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    #[serde(default)]
    content: Option<String>,
}
