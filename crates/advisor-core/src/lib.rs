//! Core domain types for advisor-rs
//!
//! This crate provides the shared vocabulary of the report pipeline:
//!
//! - Report types tagged with their pipeline role
//! - Portfolio items loaded from a declarative definition
//! - Normalized source records produced by data fetchers
//! - Core error types

pub mod error;
pub mod portfolio;
pub mod report;
pub mod source;

// Re-export main types
pub use error::{CoreError, Result};
pub use portfolio::{PortfolioItem, load_portfolio};
pub use report::{Report, ReportRole};
pub use source::{IndicatorTable, SourceRecord};
