//! Concrete data fetcher implementations

pub mod finnhub;
pub mod fmp;
pub mod sec_edgar;
pub mod yahoo;

pub use finnhub::FinnhubFetcher;
pub use fmp::FmpFetcher;
pub use sec_edgar::SecEdgarFetcher;
pub use yahoo::{YahooFinancialFetcher, YahooTechnicalFetcher};
