use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::prompts::ComposedPrompt;
use crate::error::{PetitionError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Anything that can turn a composed prompt into petition text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Exactly one request-response exchange; no retries
    async fn generate(&self, prompt: &ComposedPrompt) -> Result<String>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

/// Configuration for the Gemini API client
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` is reported on first use
    pub api_key: Option<String>,
    /// Model to use (e.g., "gemini-2.5-pro")
    pub model: String,
    /// Temperature (0-2, lower = more deterministic)
    pub temperature: Option<f64>,
    /// Maximum tokens in response
    pub max_output_tokens: Option<u32>,
    /// Whole-request timeout
    pub timeout: Duration,
    /// API root, without trailing slash
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_output_tokens: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Create with custom settings
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            api_key,
            model,
            ..Default::default()
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if !config.has_credential() {
            error!("API_KEY is not set; every generation request will fail until it is configured");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PetitionError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &ComposedPrompt) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            PetitionError::Configuration("provider credential (API_KEY) is not set".to_string())
        })?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.as_str().to_string(),
                }],
            }],
            generation_config: GenerationConfig::from_config(&self.config),
        };

        debug!(
            "Sending {} prompt bytes to model {}",
            prompt.as_str().len(),
            self.config.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PetitionError::provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PetitionError::provider(format!("{} - {}", status, body)));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PetitionError::provider(format!("failed to parse provider response: {}", e)))?;

        response.into_text()
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    fn from_config(config: &GeminiConfig) -> Option<Self> {
        if config.temperature.is_none() && config.max_output_tokens.is_none() {
            return None;
        }
        Some(Self {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(PetitionError::provider(format!("prompt blocked: {}", reason)));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| PetitionError::provider("no candidates in provider response"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(PetitionError::provider(format!(
                "no text content in provider response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}
