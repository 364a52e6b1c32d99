//! Yahoo Finance fetchers
//!
//! Two fetchers share one quote-history client: the technical fetcher turns
//! a year of daily closes into performance metadata and an indicator table;
//! the financial fetcher extracts a valuation snapshot from the same series.

use crate::error::{DataError, Result};
use crate::fetcher::DataFetcher;
use crate::indicators::technical_indicator_table;
use advisor_core::SourceRecord;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use time::OffsetDateTime;
use tracing::warn;
use yahoo_finance_api as yahoo;

/// Daily quote for one trading day
#[derive(Debug, Clone)]
struct DailyQuote {
    timestamp: DateTime<Utc>,
    close: f64,
    volume: u64,
}

/// Fetch one year of daily quotes, oldest first
async fn quote_history_1y(symbol: &str) -> Result<Vec<DailyQuote>> {
    let provider =
        yahoo::YahooConnector::new().map_err(|e| DataError::YahooFinance(e.to_string()))?;

    let end = Utc::now();
    let start = end - chrono::Duration::days(365);
    let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
        .map_err(|e| DataError::YahooFinance(format!("Invalid start timestamp: {e}")))?;
    let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
        .map_err(|e| DataError::YahooFinance(format!("Invalid end timestamp: {e}")))?;

    let response = provider
        .get_quote_history(symbol, start_odt, end_odt)
        .await
        .map_err(|e| DataError::YahooFinance(e.to_string()))?;

    let quotes = response
        .quotes()
        .map_err(|e| DataError::YahooFinance(e.to_string()))?;

    if quotes.is_empty() {
        return Err(DataError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "no quote history returned".to_string(),
        });
    }

    Ok(quotes
        .iter()
        .map(|q| DailyQuote {
            timestamp: DateTime::from_timestamp(q.timestamp as i64, 0).unwrap_or_else(Utc::now),
            close: q.close,
            volume: q.volume,
        })
        .collect())
}

fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 { 0.0 } else { (to - from) / from * 100.0 }
}

/// Year-to-date growth: latest close against the first close of its year
fn ytd_growth(quotes: &[DailyQuote]) -> Option<f64> {
    let latest = quotes.last()?;
    let year = latest.timestamp.year();
    let first_of_year = quotes.iter().find(|q| q.timestamp.year() == year)?;
    Some(percent_change(first_of_year.close, latest.close))
}

/// Technical-domain Yahoo Finance fetcher
pub struct YahooTechnicalFetcher {}

impl YahooTechnicalFetcher {
    pub fn new() -> Self {
        Self {}
    }

    async fn try_fetch(&self, ticker: &str) -> Result<SourceRecord> {
        let quotes = quote_history_1y(ticker).await?;
        let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
        let latest = &quotes[quotes.len() - 1];

        let mut record = SourceRecord::empty(self.origin())
            .with_metadata("current_price", format!("{:.2}", latest.close))
            .with_metadata(
                "performance_1y_pct",
                format!("{:.2}", percent_change(quotes[0].close, latest.close)),
            );
        if let Some(ytd) = ytd_growth(&quotes) {
            record = record.with_metadata("ytd_growth_pct", format!("{ytd:.2}"));
        }

        record = record.with_indicators(technical_indicator_table(&closes)?);
        Ok(record)
    }
}

impl Default for YahooTechnicalFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataFetcher for YahooTechnicalFetcher {
    fn origin(&self) -> &str {
        "yahoo_technical"
    }

    async fn fetch(&self, ticker: &str) -> SourceRecord {
        match self.try_fetch(ticker).await {
            Ok(record) => record,
            Err(err) => {
                warn!(ticker, origin = self.origin(), %err,
                    "Source unavailable, continuing with empty record");
                SourceRecord::empty(self.origin())
            }
        }
    }
}

/// Financial-domain Yahoo Finance fetcher: valuation snapshot
pub struct YahooFinancialFetcher {}

impl YahooFinancialFetcher {
    pub fn new() -> Self {
        Self {}
    }

    async fn try_fetch(&self, ticker: &str) -> Result<SourceRecord> {
        let quotes = quote_history_1y(ticker).await?;
        let latest = &quotes[quotes.len() - 1];

        let high_52w = quotes.iter().map(|q| q.close).fold(f64::MIN, f64::max);
        let low_52w = quotes.iter().map(|q| q.close).fold(f64::MAX, f64::min);
        let avg_volume =
            quotes.iter().map(|q| q.volume as f64).sum::<f64>() / quotes.len() as f64;

        Ok(SourceRecord::empty(self.origin())
            .with_metadata("last_close", format!("{:.2}", latest.close))
            .with_metadata("fifty_two_week_high", format!("{high_52w:.2}"))
            .with_metadata("fifty_two_week_low", format!("{low_52w:.2}"))
            .with_metadata("average_daily_volume", format!("{avg_volume:.0}")))
    }
}

impl Default for YahooFinancialFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataFetcher for YahooFinancialFetcher {
    fn origin(&self) -> &str {
        "yahoo_financial"
    }

    async fn fetch(&self, ticker: &str) -> SourceRecord {
        match self.try_fetch(ticker).await {
            Ok(record) => record,
            Err(err) => {
                warn!(ticker, origin = self.origin(), %err,
                    "Source unavailable, continuing with empty record");
                SourceRecord::empty(self.origin())
            }
        }
    }
}
