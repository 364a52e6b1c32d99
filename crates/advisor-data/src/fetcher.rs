//! Data fetcher trait definition

use advisor_core::SourceRecord;
use async_trait::async_trait;

/// Trait for per-stock data sources
///
/// Fetchers are independent and fault-isolated. `fetch` never raises for
/// "no data": a failed or empty source yields an empty [`SourceRecord`],
/// which downstream prompt assembly silently excludes. A missing source
/// therefore means fewer records, never a pipeline failure.
#[async_trait]
pub trait DataFetcher: Send + Sync {
    /// Identifier of this source, used as the origin of its records
    fn origin(&self) -> &str;

    /// Fetch data for one ticker symbol
    async fn fetch(&self, ticker: &str) -> SourceRecord;
}
