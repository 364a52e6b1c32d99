//! Inference gateway for advisor-rs
//!
//! This crate hides provider-specific transport behind a uniform text
//! completion capability. It includes:
//!
//! - The [`InferenceProvider`] trait
//! - Error types, including the explicit unsupported-capability signal
//! - A registry that selects a concrete provider by configuration key
//! - Concrete providers (Groq-compatible chat completions, Ollama)

pub mod error;
pub mod provider;
pub mod providers;
pub mod registry;

// Re-export main types
pub use error::{LLMError, Result};
pub use provider::InferenceProvider;
pub use registry::{InferenceConfig, ProviderSettings, create_provider};
