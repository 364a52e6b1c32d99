//! Provider selection by configuration key
//!
//! Replaces an inheritance-style factory with contract conformance: every
//! backend implements [`InferenceProvider`], and the active one is chosen
//! by a string key from configuration.

use crate::error::{LLMError, Result};
use crate::provider::InferenceProvider;
use crate::providers::{GroqConfig, GroqProvider, OllamaConfig, OllamaProvider};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Inference section of the application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Active provider key: "groq" or "ollama"
    pub provider: String,

    /// Groq settings, required when `provider` is "groq"
    #[serde(default)]
    pub groq: Option<ProviderSettings>,

    /// Ollama settings, required when `provider` is "ollama"
    #[serde(default)]
    pub ollama: Option<ProviderSettings>,
}

/// Per-provider settings block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    /// Model identifier
    pub model: Option<String>,

    /// API key; falls back to the provider's environment variable
    pub api_key: Option<String>,

    /// Base URL override
    pub base_url: Option<String>,

    /// Context window (Ollama only)
    pub context_window: Option<u32>,
}

/// Create the active provider from configuration
///
/// An unknown provider key or missing credentials is a configuration error,
/// fatal before any inference call is made.
pub fn create_provider(config: &InferenceConfig) -> Result<Arc<dyn InferenceProvider>> {
    let provider: Arc<dyn InferenceProvider> = match config.provider.to_lowercase().as_str() {
        "groq" => {
            let settings = config.groq.clone().unwrap_or_default();
            let api_key = match settings.api_key {
                Some(key) => key,
                None => std::env::var("GROQ_API_KEY").map_err(|_| {
                    LLMError::Configuration(
                        "Groq API key missing: set inference.groq.api_key or GROQ_API_KEY"
                            .to_string(),
                    )
                })?,
            };
            let mut groq_config = GroqConfig::new(api_key);
            if let Some(model) = settings.model {
                groq_config = groq_config.with_model(model);
            }
            if let Some(base_url) = settings.base_url {
                groq_config = groq_config.with_api_base(base_url);
            }
            Arc::new(GroqProvider::with_config(groq_config)?)
        }
        "ollama" => {
            let settings = config.ollama.clone().unwrap_or_default();
            let mut ollama_config = OllamaConfig::default();
            if let Some(model) = settings.model {
                ollama_config = ollama_config.with_model(model);
            }
            if let Some(base_url) = settings.base_url {
                ollama_config = ollama_config.with_base_url(base_url);
            }
            if let Some(context_window) = settings.context_window {
                ollama_config = ollama_config.with_context_window(context_window);
            }
            Arc::new(OllamaProvider::with_config(ollama_config)?)
        }
        other => {
            return Err(LLMError::Configuration(format!(
                "unknown inference provider '{other}', valid providers: groq, ollama"
            )));
        }
    };

    info!(provider = provider.name(), model = provider.model(), "Inference provider ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_rejected() {
        let config = InferenceConfig {
            provider: "gpt4all".to_string(),
            groq: None,
            ollama: None,
        };
        let result = create_provider(&config);
        assert!(matches!(result, Err(LLMError::Configuration(_))));
    }

    #[test]
    fn test_ollama_without_settings_uses_defaults() {
        let config = InferenceConfig {
            provider: "ollama".to_string(),
            groq: None,
            ollama: None,
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llama3");
    }

    #[test]
    fn test_provider_key_is_case_insensitive() {
        let config = InferenceConfig {
            provider: "Ollama".to_string(),
            groq: None,
            ollama: Some(ProviderSettings {
                model: Some("mixtral".to_string()),
                ..Default::default()
            }),
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model(), "mixtral");
    }

    #[test]
    fn test_groq_with_config_key() {
        let config = InferenceConfig {
            provider: "groq".to_string(),
            groq: Some(ProviderSettings {
                api_key: Some("test-key".to_string()),
                model: Some("mixtral-8x7b-32768".to_string()),
                ..Default::default()
            }),
            ollama: None,
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model(), "mixtral-8x7b-32768");
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let json = r#"{
            "provider": "ollama",
            "ollama": {"model": "phi3:14b", "context_window": 32000}
        }"#;
        let config: InferenceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.ollama.unwrap().context_window, Some(32000));
    }
}
