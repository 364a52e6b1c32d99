//! Error types for inference operations

use thiserror::Error;

/// Result type for inference operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during inference operations
///
/// No retries happen at this layer; callers treat failures as fatal to the
/// current pipeline stage.
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("Inference request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider does not support the requested capability
    /// (e.g. structured output); never silently degraded
    #[error("Provider {provider} does not support {capability}")]
    UnsupportedCapability {
        provider: String,
        capability: String,
    },

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing or invalid provider configuration, fatal at process start
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LLMError {
    /// Shorthand for the structured-output capability gap
    pub fn structured_unsupported(provider: impl Into<String>) -> Self {
        Self::UnsupportedCapability {
            provider: provider.into(),
            capability: "structured output".to_string(),
        }
    }
}
