//! Concrete inference provider implementations

pub mod groq;
pub mod ollama;

pub use groq::{GroqConfig, GroqProvider};
pub use ollama::{OllamaConfig, OllamaProvider};
