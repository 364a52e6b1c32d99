//! SEC EDGAR company-facts fetcher
//!
//! Resolves the ticker to a CIK through the SEC's company-tickers mapping
//! (cached on disk, the mapping rarely changes and the EDGAR API is rate
//! limited), then pulls XBRL company facts and renders the most recent
//! annual values of a few key concepts into an indicator table.

use crate::error::{DataError, Result};
use crate::fetcher::DataFetcher;
use advisor_core::{IndicatorTable, SourceRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const COMPANY_FACTS_BASE: &str = "https://data.sec.gov/api/xbrl/companyfacts";
const CIK_CACHE_FILE: &str = "sec_cik_tickers.json";

/// us-gaap concepts worth surfacing to the financial analyst
const FACT_TAGS: [&str; 5] = [
    "Revenues",
    "NetIncomeLoss",
    "Assets",
    "Liabilities",
    "StockholdersEquity",
];

/// Annual filings per concept to include
const MAX_FACTS_PER_TAG: usize = 4;

/// SEC EDGAR fetcher
pub struct SecEdgarFetcher {
    user_agent: Option<String>,
    data_dir: PathBuf,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    cik_str: u64,
    ticker: String,
}

#[derive(Debug, Deserialize)]
struct CompanyFacts {
    facts: FactNamespaces,
}

#[derive(Debug, Deserialize)]
struct FactNamespaces {
    #[serde(rename = "us-gaap", default)]
    us_gaap: HashMap<String, FactConcept>,
}

#[derive(Debug, Deserialize)]
struct FactConcept {
    units: HashMap<String, Vec<FactValue>>,
}

#[derive(Debug, Deserialize)]
struct FactValue {
    end: String,
    val: f64,
    form: Option<String>,
}

impl SecEdgarFetcher {
    pub fn new(user_agent: Option<String>, data_dir: PathBuf) -> Self {
        Self {
            user_agent,
            data_dir,
            client: Client::new(),
        }
    }

    /// Ticker to CIK resolution, disk-cached under the data dir
    async fn resolve_cik(&self, ticker: &str, user_agent: &str) -> Result<u64> {
        let cache_path = self.data_dir.join(CIK_CACHE_FILE);
        let raw = match tokio::fs::read_to_string(&cache_path).await {
            Ok(raw) => raw,
            Err(_) => {
                let raw = self
                    .client
                    .get(COMPANY_TICKERS_URL)
                    .header(reqwest::header::USER_AGENT, user_agent)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                tokio::fs::create_dir_all(&self.data_dir).await?;
                tokio::fs::write(&cache_path, &raw).await?;
                raw
            }
        };

        let entries: HashMap<String, TickerEntry> = serde_json::from_str(&raw)?;
        entries
            .values()
            .find(|entry| entry.ticker.eq_ignore_ascii_case(ticker))
            .map(|entry| entry.cik_str)
            .ok_or_else(|| DataError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "ticker not present in SEC mapping".to_string(),
            })
    }

    async fn try_fetch(&self, ticker: &str, user_agent: &str) -> Result<SourceRecord> {
        let cik = self.resolve_cik(ticker, user_agent).await?;

        let url = format!("{COMPANY_FACTS_BASE}/CIK{cik:010}.json");
        let facts: CompanyFacts = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| DataError::Edgar(format!("Failed to parse company facts: {e}")))?;

        let table = facts_table(&facts);
        if table.rows.is_empty() {
            return Err(DataError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "no annual us-gaap facts in filing data".to_string(),
            });
        }

        Ok(SourceRecord::empty(self.origin())
            .with_metadata("cik", format!("{cik:010}"))
            .with_indicators(table))
    }
}

/// Render the latest annual (10-K) values of the selected concepts
fn facts_table(facts: &CompanyFacts) -> IndicatorTable {
    let mut table = IndicatorTable::new(
        "Annual report facts (us-gaap, USD)",
        vec![
            "concept".to_string(),
            "period_end".to_string(),
            "value".to_string(),
        ],
    );
    for tag in FACT_TAGS {
        let Some(concept) = facts.facts.us_gaap.get(tag) else {
            continue;
        };
        let Some(values) = concept.units.get("USD") else {
            continue;
        };
        let mut annual: Vec<&FactValue> = values
            .iter()
            .filter(|v| v.form.as_deref() == Some("10-K"))
            .collect();
        annual.sort_by(|a, b| b.end.cmp(&a.end));
        annual.dedup_by(|a, b| a.end == b.end);
        for value in annual.into_iter().take(MAX_FACTS_PER_TAG) {
            table.push_row(vec![
                tag.to_string(),
                value.end.clone(),
                format!("{:.0}", value.val),
            ]);
        }
    }
    table
}

#[async_trait]
impl DataFetcher for SecEdgarFetcher {
    fn origin(&self) -> &str {
        "sec_edgar"
    }

    async fn fetch(&self, ticker: &str) -> SourceRecord {
        let Some(user_agent) = self.user_agent.clone() else {
            debug!(ticker, "No EDGAR user agent configured, skipping source");
            return SourceRecord::empty(self.origin());
        };
        match self.try_fetch(ticker, &user_agent).await {
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
    async fn test_without_user_agent_returns_empty_record() {
        let fetcher = SecEdgarFetcher::new(None, PathBuf::from("./data"));
        let record = fetcher.fetch("NVO").await;
        assert_eq!(record.origin, "sec_edgar");
        assert!(!record.has_data());
    }

    #[test]
    fn test_facts_table_selects_annual_usd_values() {
        let raw = r#"{
            "facts": {
                "us-gaap": {
                    "Revenues": {
                        "units": {
                            "USD": [
                                {"end": "2023-12-31", "val": 1000.0, "form": "10-K"},
                                {"end": "2024-03-31", "val": 300.0, "form": "10-Q"},
                                {"end": "2024-12-31", "val": 1500.0, "form": "10-K"}
                            ]
                        }
                    }
                }
            }
        }"#;
        let facts: CompanyFacts = serde_json::from_str(raw).unwrap();
        let table = facts_table(&facts);

        // Quarterly values excluded, newest annual value first
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "2024-12-31");
        assert_eq!(table.rows[0][2], "1500");
    }

    #[test]
    fn test_facts_table_empty_namespace() {
        let facts: CompanyFacts =
            serde_json::from_str(r#"{"facts": {"us-gaap": {}}}"#).unwrap();
        assert!(facts_table(&facts).rows.is_empty());
    }

    #[test]
    fn test_ticker_mapping_deserialization() {
        let raw = r#"{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}}"#;
        let entries: HashMap<String, TickerEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries["0"].cik_str, 320193);
        assert_eq!(entries["0"].ticker, "AAPL");
    }

    #[tokio::test]
    async fn test_cached_mapping_resolves_without_network() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join(CIK_CACHE_FILE),
            r#"{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}}"#,
        )
        .await
        .unwrap();

        let fetcher = SecEdgarFetcher::new(
            Some("advisor-rs test@example.com".to_string()),
            dir.path().to_path_buf(),
        );
        let cik = fetcher.resolve_cik("aapl", "advisor-rs test@example.com").await.unwrap();
        assert_eq!(cik, 320193);
    }

    #[tokio::test]
    async fn test_unknown_ticker_in_cached_mapping() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join(CIK_CACHE_FILE),
            r#"{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}}"#,
        )
        .await
        .unwrap();

        let fetcher = SecEdgarFetcher::new(
            Some("advisor-rs test@example.com".to_string()),
            dir.path().to_path_buf(),
        );
        let result = fetcher.resolve_cik("ZZZZ", "advisor-rs test@example.com").await;
        assert!(matches!(result, Err(DataError::DataUnavailable { .. })));
    }
}
