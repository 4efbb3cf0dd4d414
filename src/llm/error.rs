//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a remote classification attempt
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this error is retryable
    ///
    /// Transport failures (connection errors, timeouts, 5xx and throttling
    /// statuses) are retryable. Malformed responses and configuration errors
    /// are terminal: retrying cannot fix them.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::ApiError { status, .. } => matches!(status, 408 | 429 | 500..=599),
            LlmError::Network(_) => true,
            LlmError::Timeout(_) => true,
            LlmError::InvalidResponse(_) => false,
            LlmError::NotConfigured(_) => false,
            LlmError::Json(_) => false,
        }
    }

    /// Short stable label for the failure kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::ApiError { .. } => "api",
            LlmError::Network(_) => "network",
            LlmError::Timeout(_) => "timeout",
            LlmError::InvalidResponse(_) => "invalid-response",
            LlmError::NotConfigured(_) => "not-configured",
            LlmError::Json(_) => "json",
        }
    }
}
