//! Error types for advisor-core

use thiserror::Error;

/// Result type alias for advisor-core
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error type for core domain operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Missing or invalid configuration, fatal at process start
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Portfolio definition could not be read
    #[error("Failed to read portfolio definition {path}: {source}")]
    PortfolioUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Portfolio definition could not be parsed
    #[error("Invalid portfolio definition: {0}")]
    PortfolioInvalid(#[from] serde_json::Error),
}
