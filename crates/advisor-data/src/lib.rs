//! Source data fetchers for advisor-rs
//!
//! This crate implements the data acquisition boundary of the pipeline.
//! Multiple independent fetchers are polled per stock per domain (technical,
//! financial); their results are pooled as [`advisor_core::SourceRecord`]s.
//! Fetchers never fail outward: a source with nothing to contribute returns
//! an empty record.

pub mod error;
pub mod fetcher;
pub mod fetchers;
pub mod indicators;

// Re-export main types
pub use error::{DataError, Result};
pub use fetcher::DataFetcher;
pub use fetchers::{
    FinnhubFetcher, FmpFetcher, SecEdgarFetcher, YahooFinancialFetcher, YahooTechnicalFetcher,
};

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for the data acquisition layer
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Financial Modeling Prep API key; fetcher stays inert without one
    #[serde(default)]
    pub fmp_api_key: Option<String>,

    /// Finnhub API key; fetcher stays inert without one
    #[serde(default)]
    pub finnhub_api_key: Option<String>,

    /// User-Agent for SEC EDGAR requests (the SEC requires a contact string)
    #[serde(default)]
    pub edgar_user_agent: Option<String>,

    /// Directory for cached lookup data (ticker to CIK mapping)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fmp_api_key: None,
            finnhub_api_key: None,
            edgar_user_agent: None,
            data_dir: default_data_dir(),
        }
    }
}

/// Technical-domain fetchers in registration order
///
/// The order is stable and defines the concatenation order of source blocks
/// inside the technical analysis prompt.
pub fn technical_fetchers(config: &DataConfig) -> Vec<Arc<dyn DataFetcher>> {
    vec![
        Arc::new(FmpFetcher::new(config.fmp_api_key.clone())),
        Arc::new(FinnhubFetcher::new(config.finnhub_api_key.clone())),
        Arc::new(YahooTechnicalFetcher::new()),
    ]
}

/// Financial-domain fetchers in registration order
pub fn financial_fetchers(config: &DataConfig) -> Vec<Arc<dyn DataFetcher>> {
    vec![
        Arc::new(YahooFinancialFetcher::new()),
        Arc::new(SecEdgarFetcher::new(
            config.edgar_user_agent.clone(),
            config.data_dir.clone(),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_registration_order_is_stable() {
        let config = DataConfig::default();
        let technical: Vec<_> = technical_fetchers(&config)
            .iter()
            .map(|f| f.origin().to_string())
            .collect();
        assert_eq!(technical, ["fmp", "finnhub", "yahoo_technical"]);

        let financial: Vec<_> = financial_fetchers(&config)
            .iter()
            .map(|f| f.origin().to_string())
            .collect();
        assert_eq!(financial, ["yahoo_financial", "sec_edgar"]);
    }

    #[test]
    fn test_data_config_defaults() {
        let config: DataConfig = serde_json::from_str("{}").unwrap();
        assert!(config.fmp_api_key.is_none());
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
