//! Inference provider trait definition

use crate::Result;
use async_trait::async_trait;

/// Trait for text-completion inference providers
///
/// Implementations hide the transport to a concrete backend (Groq, Ollama).
/// Providers are stateless per call: concurrent calls are independent and
/// share no mutable client state beyond what the underlying HTTP client
/// guarantees.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Generate a raw text completion for the prompt
    async fn infer(&self, prompt: &str, temperature: f32) -> Result<String>;

    /// Generate a completion constrained to a structural envelope
    /// (e.g. "html", "json")
    ///
    /// Optional capability: a provider without support fails with
    /// [`crate::LLMError::UnsupportedCapability`], never a degraded plain
    /// completion.
    async fn infer_structured(
        &self,
        prompt: &str,
        expected_format: &str,
        temperature: f32,
    ) -> Result<String>;

    /// Provider name (e.g. "groq"); logged context only, never pipeline logic
    fn name(&self) -> &str;

    /// Model identifier; logged context only, never pipeline logic
    fn model(&self) -> &str;
}
