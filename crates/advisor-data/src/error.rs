//! Error types for data acquisition
//!
//! These errors never cross the [`crate::DataFetcher`] boundary: fetchers
//! recover locally by substituting an empty source record.

use thiserror::Error;

/// Result type alias for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Data acquisition errors
#[derive(Debug, Error)]
pub enum DataError {
    /// The source found nothing for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// SEC EDGAR API error
    #[error("SEC EDGAR error: {0}")]
    Edgar(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    Indicator(String),

    /// Local cache I/O error
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
