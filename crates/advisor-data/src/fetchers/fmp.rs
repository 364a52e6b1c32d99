//! Financial Modeling Prep quote fetcher
//!
//! Active only when an API key is configured; otherwise the fetcher is
//! inert and contributes an empty record.

use crate::error::{DataError, Result};
use crate::fetcher::DataFetcher;
use advisor_core::SourceRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

const FMP_API_BASE: &str = "https://financialmodelingprep.com/api/v3";

/// Financial Modeling Prep fetcher
pub struct FmpFetcher {
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct FmpQuote {
    price: Option<f64>,
    #[serde(rename = "changesPercentage")]
    changes_percentage: Option<f64>,
    #[serde(rename = "yearHigh")]
    year_high: Option<f64>,
    #[serde(rename = "yearLow")]
    year_low: Option<f64>,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
    #[serde(rename = "priceAvg50")]
    price_avg_50: Option<f64>,
    #[serde(rename = "priceAvg200")]
    price_avg_200: Option<f64>,
    pe: Option<f64>,
    eps: Option<f64>,
}

impl FmpFetcher {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }

    async fn try_fetch(&self, ticker: &str, api_key: &str) -> Result<SourceRecord> {
        let url = format!("{FMP_API_BASE}/quote/{ticker}?apikey={api_key}");
        let quotes: Vec<FmpQuote> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let quote = quotes.into_iter().next().ok_or_else(|| DataError::DataUnavailable {
            symbol: ticker.to_string(),
            reason: "FMP returned no quote".to_string(),
        })?;

        let entries = [
            ("price", quote.price),
            ("changes_percentage", quote.changes_percentage),
            ("year_high", quote.year_high),
            ("year_low", quote.year_low),
            ("market_cap", quote.market_cap),
            ("price_avg_50", quote.price_avg_50),
            ("price_avg_200", quote.price_avg_200),
            ("pe", quote.pe),
            ("eps", quote.eps),
        ];
        let mut record = SourceRecord::empty(self.origin());
        for (key, value) in entries {
            if let Some(value) = value {
                record = record.with_metadata(key, format!("{value:.2}"));
            }
        }
        Ok(record)
    }
}

#[async_trait]
impl DataFetcher for FmpFetcher {
    fn origin(&self) -> &str {
        "fmp"
    }

    async fn fetch(&self, ticker: &str) -> SourceRecord {
        let Some(api_key) = self.api_key.clone() else {
            debug!(ticker, "No FMP API key configured, skipping source");
            return SourceRecord::empty(self.origin());
        };
        match self.try_fetch(ticker, &api_key).await {
            Ok(record) => record,
            Err(err) => {
                warn!(ticker, origin = self.origin(), %err,
                    "Source unavailable, continuing with empty record");
                SourceRecord::empty(self.origin())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_without_key_returns_empty_record() {
        let fetcher = FmpFetcher::new(None);
        let record = fetcher.fetch("AMD").await;
        assert_eq!(record.origin, "fmp");
        assert!(!record.has_data());
    }

    #[test]
    fn test_quote_deserialization_tolerates_missing_fields() {
        let quote: FmpQuote = serde_json::from_str(r#"{"price": 114.67}"#).unwrap();
        assert_eq!(quote.price, Some(114.67));
        assert!(quote.pe.is_none());
    }
}
