//! Ollama provider implementation
//!
//! Talks to a local Ollama daemon via `/api/generate`. Ollama has no
//! constrained-decoding support here, so structured inference fails with an
//! explicit unsupported-capability error rather than degrading silently.

use crate::error::{LLMError, Result};
use crate::provider::InferenceProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";
const DEFAULT_CONTEXT_WINDOW: u32 = 32_000;
const DEFAULT_TIMEOUT_SECS: u64 = 15_000;

/// Configuration for the Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama daemon
    pub base_url: String,

    /// Model identifier (must be pulled on the daemon)
    pub model: String,

    /// Context window passed as `num_ctx`, constraining how much prompt
    /// text one call can carry
    pub context_window: u32,

    /// Request timeout in seconds; local models can be very slow
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            context_window: DEFAULT_CONTEXT_WINDOW,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OllamaConfig {
    /// Set the daemon base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the context window
    pub fn with_context_window(mut self, context_window: u32) -> Self {
        self.context_window = context_window;
        self
    }
}

/// Ollama inference provider
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
}

impl OllamaProvider {
    /// Create a provider from configuration
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl InferenceProvider for OllamaProvider {
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn infer(&self, prompt: &str, temperature: f32) -> Result<String> {
        debug!(prompt_chars = prompt.len(), "Sending generate request to Ollama");

        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature,
                num_ctx: self.config.context_window,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.config.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LLMError::RequestFailed(format!(
                "HTTP {status}: {error_text}"
            )));
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        Ok(generated.response)
    }

    async fn infer_structured(
        &self,
        _prompt: &str,
        _expected_format: &str,
        _temperature: f32,
    ) -> Result<String> {
        Err(LLMError::structured_unsupported("ollama"))
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// Ollama-specific request/response types

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OllamaProvider::with_config(OllamaConfig::default()).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_structured_inference_unsupported() {
        let provider = OllamaProvider::with_config(OllamaConfig::default()).unwrap();
        let result = provider.infer_structured("prompt", "html", 0.5).await;
        assert!(matches!(
            result,
            Err(LLMError::UnsupportedCapability { .. })
        ));
    }

    #[test]
    fn test_config_builders() {
        let config = OllamaConfig::default()
            .with_base_url("http://10.0.0.2:11434")
            .with_model("mixtral")
            .with_context_window(8192);
        assert_eq!(config.base_url, "http://10.0.0.2:11434");
        assert_eq!(config.model, "mixtral");
        assert_eq!(config.context_window, 8192);
    }
}
