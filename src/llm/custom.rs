//! Generic JSON endpoint client
//!
//! For self-hosted or proxy deployments that accept a plain
//! `{model, prompt, max_tokens, temperature}` POST and reply with JSON.
//! Accepts whichever of the common reply fields ("response", "text",
//! "content") the endpoint uses.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{LlmClient, LlmError};
use crate::config::LlmConfig;

/// Client for a custom JSON completion endpoint
pub struct CustomClient {
    model: String,
    api_key: String,
    endpoint: String,
    http: Client,
    max_tokens: u32,
    temperature: f64,
    timeout: Duration,
}

impl CustomClient {
    /// Create a new client from configuration
    ///
    /// Requires an explicit endpoint; there is no default to fall back to.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, endpoint = %config.endpoint, "CustomClient::from_config: called");
        if config.endpoint.is_empty() {
            return Err(LlmError::NotConfigured("Custom endpoint not configured".to_string()));
        }

        let api_key = config
            .get_api_key()
            .map_err(|e| LlmError::NotConfigured(e.to_string()))?;

        let timeout = config.timeout();

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            endpoint: config.endpoint.clone(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout,
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
impl LlmClient for CustomClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(%self.model, "complete: called");
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

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

        let data: serde_json::Value = response.json().await.map_err(|e| self.map_send_error(e))?;
        extract_reply_text(&data)
            .ok_or_else(|| LlmError::InvalidResponse(format!("Unexpected response format: {data}")))
    }
}

/// Pull the reply text out of whichever common field the endpoint used
fn extract_reply_text(data: &serde_json::Value) -> Option<String> {
    ["response", "text", "content"]
        .iter()
        .find_map(|field| data.get(field).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}
