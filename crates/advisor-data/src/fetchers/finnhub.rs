//! Finnhub quote fetcher
//!
//! Active only when an API key is configured; otherwise the fetcher is
//! inert and contributes an empty record.

use crate::error::Result;
use crate::fetcher::DataFetcher;
use advisor_core::SourceRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

const FINNHUB_API_BASE: &str = "https://finnhub.io/api/v1";

/// Finnhub fetcher
pub struct FinnhubFetcher {
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct FinnhubQuote {
    /// Current price
    c: f64,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High of the day
    h: f64,
    /// Low of the day
    l: f64,
    /// Previous close
    pc: f64,
}

impl FinnhubFetcher {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }

    async fn try_fetch(&self, ticker: &str, api_key: &str) -> Result<SourceRecord> {
        let url = format!("{FINNHUB_API_BASE}/quote?symbol={ticker}&token={api_key}");
        let quote: FinnhubQuote = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Finnhub reports unknown symbols as all-zero quotes
        if quote.c == 0.0 && quote.pc == 0.0 {
            debug!(ticker, "Finnhub returned an all-zero quote, treating as no data");
            return Ok(SourceRecord::empty(self.origin()));
        }

        let mut record = SourceRecord::empty(self.origin())
            .with_metadata("current_price", format!("{:.2}", quote.c))
            .with_metadata("day_high", format!("{:.2}", quote.h))
            .with_metadata("day_low", format!("{:.2}", quote.l))
            .with_metadata("previous_close", format!("{:.2}", quote.pc));
        if let Some(d) = quote.d {
            record = record.with_metadata("change", format!("{d:.2}"));
        }
        if let Some(dp) = quote.dp {
            record = record.with_metadata("percent_change", format!("{dp:.2}"));
        }
        Ok(record)
    }
}

#[async_trait]
impl DataFetcher for FinnhubFetcher {
    fn origin(&self) -> &str {
        "finnhub"
    }

    async fn fetch(&self, ticker: &str) -> SourceRecord {
        let Some(api_key) = self.api_key.clone() else {
            debug!(ticker, "No Finnhub API key configured, skipping source");
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
        let fetcher = FinnhubFetcher::new(None);
        let record = fetcher.fetch("NVO").await;
        assert_eq!(record.origin, "finnhub");
        assert!(!record.has_data());
    }

    #[test]
    fn test_quote_deserialization() {
        let raw = r#"{"c": 114.67, "d": -1.2, "dp": -1.03, "h": 117.0, "l": 113.9, "o": 116.1, "pc": 115.87}"#;
        let quote: FinnhubQuote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.c, 114.67);
        assert_eq!(quote.dp, Some(-1.03));
    }
}
