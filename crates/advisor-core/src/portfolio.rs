//! Portfolio definition loading
//!
//! The portfolio is a declarative JSON list of positions, loaded once at
//! process start and never re-read during a run.

use crate::error::{CoreError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single position in the portfolio
///
/// Immutable once loaded; the ticker symbol is the unique key within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioItem {
    /// Display name of the company
    pub name: String,

    /// Ticker symbol, unique within a portfolio run
    pub ticker_symbol: String,

    /// Nominal purchase price per share
    pub buy_price: f64,

    /// Currency of the purchase price
    pub currency: String,

    /// Date the position was opened
    pub buy_date: NaiveDate,
}

impl PortfolioItem {
    /// One-line purchase context for prompt embedding
    pub fn purchase_context(&self) -> String {
        format!(
            "{} ({}) bought at {} {} on {}",
            self.name, self.ticker_symbol, self.buy_price, self.currency, self.buy_date
        )
    }
}

#[derive(Debug, Deserialize)]
struct PortfolioFile {
    portfolio: Vec<PortfolioItem>,
}

/// Load the portfolio definition from a JSON file
///
/// Format: `{"portfolio": [{"name": ..., "ticker_symbol": ..., ...}]}`.
/// A missing or malformed file is a configuration error, fatal at process
/// start.
pub fn load_portfolio(path: impl AsRef<Path>) -> Result<Vec<PortfolioItem>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| CoreError::PortfolioUnreadable {
        path: path.display().to_string(),
        source,
    })?;
    let file: PortfolioFile = serde_json::from_str(&raw)?;
    if file.portfolio.is_empty() {
        return Err(CoreError::Configuration(
            "portfolio definition contains no positions".to_string(),
        ));
    }
    Ok(file.portfolio)
}
