//! Groq provider implementation
//!
//! Talks to Groq's OpenAI-compatible chat completions endpoint. Structured
//! inference is implemented with an assistant prefill opening a fenced code
//! block of the expected format, plus a stop sequence closing it, so the
//! model completes only the inside of the fence.

use crate::error::{LLMError, Result};
use crate::provider::InferenceProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama3-8b-8192";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Groq provider
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the OpenAI-compatible API
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GroqConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GROQ_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from the `GROQ_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            LLMError::Configuration("GROQ_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// Groq inference provider
pub struct GroqProvider {
    config: GroqConfig,
    client: Client,
}

impl GroqProvider {
    /// Create a provider from configuration
    pub fn with_config(config: GroqConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LLMError::Configuration(
                "Groq API key must not be empty".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Create a provider from the environment
    pub fn from_env() -> Result<Self> {
        Self::with_config(GroqConfig::from_env()?)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::UnexpectedResponse("response has no choices".to_string()))?;

        debug!(finish_reason = %choice.finish_reason.as_deref().unwrap_or("unknown"),
            "Received Groq completion");

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl InferenceProvider for GroqProvider {
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn infer(&self, prompt: &str, temperature: f32) -> Result<String> {
        debug!(prompt_chars = prompt.len(), "Sending completion request to Groq");

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature,
            stop: None,
        };
        self.chat(&request).await
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, format = %expected_format))]
    async fn infer_structured(
        &self,
        prompt: &str,
        expected_format: &str,
        temperature: f32,
    ) -> Result<String> {
        debug!(prompt_chars = prompt.len(), "Sending structured completion request to Groq");

        // Prefill the assistant turn with an open fence of the expected
        // format and stop at the closing fence
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(prompt.to_string()),
                },
                ChatMessage {
                    role: "assistant".to_string(),
                    content: Some(format!("```{expected_format}")),
                },
            ],
            temperature,
            stop: Some(vec!["```".to_string()]),
        };
        self.chat(&request).await
    }

    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// Groq-specific request/response types (OpenAI chat completions format)

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}
