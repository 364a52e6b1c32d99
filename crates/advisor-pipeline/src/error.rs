//! Error types for the report pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort the current unit of work
///
/// A failure in a per-stock stage aborts that stock's pipeline only; the
/// run loop contains it and continues with the remaining stocks. A failure
/// in the aggregation stage aborts the portfolio aggregation.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The inference backend failed; fatal to the current stage, not retried
    #[error("Inference failed: {0}")]
    Inference(#[from] advisor_llm::LLMError),

    /// Prompt template rendering failed
    #[error("Prompt template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Report storage failed
    #[error("Report storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Missing or invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}
