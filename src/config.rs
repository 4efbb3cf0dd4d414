//! Configuration types and loading
//!
//! Configuration is an explicit immutable value passed into each component's
//! constructor; there is no process-wide singleton. Missing keys fall back to
//! documented defaults, and invalid sections degrade with a warning rather
//! than failing the process.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::Intent;

/// Main classifier configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Intent pattern rules for the local fallback classifier
    #[serde(rename = "classification-rules", alias = "classification_rules")]
    pub classification_rules: RulesConfig,

    /// Caregiver notification service, if deployed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care: Option<CareConfig>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .stage-manager.yml
        let local_config = PathBuf::from(".stage-manager.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/stage-manager/stage-manager.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("stage-manager").join("stage-manager.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "anthropic", "openai", or "custom". Empty means
    /// detect from the model name / endpoint.
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API endpoint; empty means the provider's default
    pub endpoint: String,

    /// Per-attempt request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Retry attempts after the first failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Initial backoff delay in seconds, doubled per retry
    #[serde(rename = "retry-delay-secs")]
    pub retry_delay_secs: u64,

    /// Maximum tokens per reply
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-3-5-haiku-20241022".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            endpoint: String::new(),
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_secs: 1,
            max_tokens: 150,
            temperature: 0.3,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .context(format!("API key not found in environment variable {}", self.api_key_env))
    }

    /// True if the API key environment variable is set and non-empty
    pub fn has_api_key(&self) -> bool {
        std::env::var(&self.api_key_env).map(|v| !v.is_empty()).unwrap_or(false)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Intent pattern rules: intent token to ordered substring patterns
///
/// An empty map means the built-in defaults. Unknown intent tokens and
/// patterns for UNKNOWN are logged and skipped; rule problems never fail
/// the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulesConfig(pub HashMap<String, Vec<String>>);

impl RulesConfig {
    /// Resolve into per-intent pattern lists
    pub fn resolve(&self) -> HashMap<Intent, Vec<String>> {
        if self.0.is_empty() {
            return default_rules();
        }

        let mut rules = HashMap::new();
        for (token, patterns) in &self.0 {
            match Intent::from_token(token) {
                Some(Intent::Unknown) => {
                    tracing::warn!(%token, "UNKNOWN takes no patterns, skipping rule entry");
                }
                Some(intent) => {
                    rules.insert(intent, patterns.clone());
                }
                None => {
                    tracing::warn!(%token, "Unknown intent token in classification rules, skipping");
                }
            }
        }

        if rules.is_empty() {
            tracing::warn!("No usable classification rules in config, using defaults");
            return default_rules();
        }
        rules
    }
}

/// Built-in pattern sets for the six non-UNKNOWN intents
pub fn default_rules() -> HashMap<Intent, Vec<String>> {
    let to_owned = |patterns: &[&str]| patterns.iter().map(|p| p.to_string()).collect();
    HashMap::from([
        (Intent::Next, to_owned(&["next", "continue", "proceed", "forward", "go on"])),
        (Intent::Previous, to_owned(&["back", "previous", "return", "go back"])),
        (Intent::Exit, to_owned(&["exit", "quit", "leave", "stop", "end"])),
        (Intent::Help, to_owned(&["help", "assist", "support", "call"])),
        (Intent::Care, to_owned(&["worried", "anxious", "scared", "concerned", "upset"])),
        (Intent::Hello, to_owned(&["hello", "hi", "hey", "greetings"])),
    ])
}

/// Caregiver notification service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CareConfig {
    /// Base URL of the caregiver service
    pub url: String,

    /// Request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for CareConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl CareConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
