//! Remote classification with retry, backoff, and reply validation
//!
//! Wraps a prompt transport with the per-call retry policy and turns the
//! provider's free-form reply text into a validated intent. All state here
//! (attempt counter, backoff delay) lives on the stack of a single classify
//! call; nothing is carried across calls.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::prompt::{self, ClassificationRequest};
use super::{LlmClient, LlmError};
use crate::config::LlmConfig;
use crate::domain::{Intent, IntentReply};

/// Remote intent classifier
///
/// Holds only read-only configuration and the transport handle, so
/// concurrent classify calls need no locking.
pub struct LlmClassifier {
    client: Arc<dyn LlmClient>,
    config: LlmConfig,
}

impl LlmClassifier {
    pub fn new(client: Arc<dyn LlmClient>, config: LlmConfig) -> Self {
        debug!(provider = %config.provider, model = %config.model, "LlmClassifier::new: called");
        Self { client, config }
    }

    /// Lightweight availability check: is the classifier configured well
    /// enough that an attempt is worth making?
    ///
    /// Verifies the model and API key configuration without a network
    /// round-trip. This guards against wasted calls, not against mid-call
    /// failures, which classify handles itself.
    pub fn is_available(&self) -> bool {
        if self.config.model.is_empty() {
            debug!("is_available: no model configured");
            return false;
        }
        if !self.config.has_api_key() {
            debug!(api_key_env = %self.config.api_key_env, "is_available: API key env var not set");
            return false;
        }
        true
    }

    /// Attempt remote classification with retry and exponential backoff
    ///
    /// Up to `max_retries` additional attempts after the first failure,
    /// for transport failures only. The delay before retry k is
    /// `retry_delay * 2^(k-1)`, applied before the re-attempt and never
    /// after the final one. Malformed replies are terminal for the call.
    pub async fn classify(&self, request: &ClassificationRequest) -> Result<IntentReply, LlmError> {
        let prompt = prompt::build_prompt(request);
        debug!(prompt_len = prompt.len(), "classify: called");

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = self.config.retry_delay() * 2u32.pow(attempt - 1);
                warn!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "classify: retrying after transient failure"
                );
                tokio::time::sleep(backoff).await;
            }

            let started = Instant::now();
            match self.client.complete(&prompt).await {
                Ok(text) => {
                    let reply = parse_reply(&text)?;
                    info!(
                        attempts = attempt + 1,
                        latency_ms = started.elapsed().as_millis() as u64,
                        intent = %reply.intent,
                        "classify: remote classification succeeded"
                    );
                    return Ok(reply);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    debug!(
                        attempt,
                        latency_ms = started.elapsed().as_millis() as u64,
                        failure = e.kind(),
                        "classify: transient failure"
                    );
                    last_error = Some(e);
                    continue;
                }
                Err(e) => {
                    warn!(
                        attempts = attempt + 1,
                        failure = e.kind(),
                        "classify: terminal failure"
                    );
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Retries exhausted".to_string())))
    }
}

/// Parse the provider's reply text into an intent plus explanation
///
/// Accepted shapes, tried in order:
/// 1. JSON `{"status": TOKEN, "message": text}`
/// 2. `TOKEN: message`
/// 3. a leading token followed by free text
///
/// The token must sit at the start of the reply and is matched
/// case-insensitively. No recognizable token, or conflicting tokens in the
/// leading position, is a malformed-response failure.
pub fn parse_reply(text: &str) -> Result<IntentReply, LlmError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LlmError::InvalidResponse("Empty reply".to_string()));
    }

    // JSON form first
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let status = value.get("status").and_then(|v| v.as_str());
        let message = value.get("message").and_then(|v| v.as_str());
        if let (Some(status), Some(message)) = (status, message) {
            let intent = Intent::from_token(status).ok_or_else(|| {
                LlmError::InvalidResponse(format!("Invalid status token in JSON reply: {status}"))
            })?;
            return Ok(IntentReply {
                intent,
                message: message.to_string(),
            });
        }
    }

    // Leading-token form: the token position is the run of words before the
    // message starts; conflicting tokens there make the reply ambiguous.
    let mut leading = Vec::new();
    for word in trimmed.split_whitespace() {
        let cleaned = word.trim_matches([':', ',', '.']);
        match Intent::from_token(cleaned) {
            Some(intent) => leading.push(intent),
            None => break,
        }
        if word.contains(':') {
            break;
        }
    }

    let Some(&intent) = leading.first() else {
        return Err(LlmError::InvalidResponse(format!(
            "No intent token at start of reply: {}",
            truncate(trimmed, 100)
        )));
    };
    if leading.iter().any(|other| *other != intent) {
        return Err(LlmError::InvalidResponse(format!(
            "Conflicting intent tokens in reply: {}",
            truncate(trimmed, 100)
        )));
    }

    // Everything after the token (and a separating colon) is the rationale
    let first_word_len = trimmed.split_whitespace().next().map(str::len).unwrap_or(0);
    let rest = trimmed[first_word_len..]
        .trim_start_matches([':', ' ', '\t', '\n'])
        .trim();
    let message = if rest.is_empty() { trimmed } else { rest };

    Ok(IntentReply {
        intent,
        message: message.to_string(),
    })
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
