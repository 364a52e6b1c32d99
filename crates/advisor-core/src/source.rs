//! Normalized source records produced by data fetchers
//!
//! Each fetcher returns one [`SourceRecord`] per stock. Fetchers are
//! independent and fault-isolated: a source with nothing to contribute
//! returns an empty record, which the analyzers silently exclude from
//! prompts.

use comfy_table::Table;
use comfy_table::presets::ASCII_MARKDOWN;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A block of tabular indicator data from one fetcher
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorTable {
    /// Short label for the table (e.g. "Technical indicators")
    pub title: String,

    /// Column headers
    pub headers: Vec<String>,

    /// Data rows; ragged rows are padded by the renderer
    pub rows: Vec<Vec<String>>,
}

impl IndicatorTable {
    /// Create an empty table with the given title and headers
    pub fn new(title: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            title: title.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a data row
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Render as a markdown-style text table for prompt embedding
    pub fn to_markdown(&self) -> String {
        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        table.set_header(self.headers.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        format!("{}:\n{table}", self.title)
    }
}

/// Normalized unit of raw data from one fetcher for one stock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Identifier of the fetcher that produced this record, never empty
    pub origin: String,

    /// Key-value metadata (price, valuation figures, ...), ordered for
    /// stable prompt output
    pub metadata: Option<BTreeMap<String, String>>,

    /// Ordered sequence of tabular indicator blocks
    pub indicators: Vec<IndicatorTable>,
}

impl SourceRecord {
    /// Create an empty record for the given origin
    pub fn empty(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            metadata: None,
            indicators: Vec::new(),
        }
    }

    /// Whether this record has anything to contribute to a prompt
    ///
    /// A record contributes only if at least one of metadata/indicators is
    /// non-empty.
    pub fn has_data(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| !m.is_empty()) || !self.indicators.is_empty()
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach an indicator table
    pub fn with_indicators(mut self, table: IndicatorTable) -> Self {
        self.indicators.push(table);
        self
    }

    /// Render this record as one block of prompt text
    ///
    /// Layout: origin header, metadata lines, then each indicator table.
    /// Returns an empty string when the record has no data.
    pub fn to_prompt_block(&self) -> String {
        if !self.has_data() {
            return String::new();
        }
        let mut block = format!("{}:\n", self.origin);
        if let Some(metadata) = &self.metadata {
            for (key, value) in metadata {
                block.push_str(&format!("{key}: {value}\n"));
            }
        }
        for table in &self.indicators {
            block.push_str(&table.to_markdown());
            block.push('\n');
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_has_no_data() {
        let record = SourceRecord::empty("yahoo_technical");
        assert!(!record.has_data());
        assert_eq!(record.to_prompt_block(), "");
    }

    #[test]
    fn test_metadata_only_record_has_data() {
        let record = SourceRecord::empty("finnhub").with_metadata("current_price", "114.67");
        assert!(record.has_data());

        let block = record.to_prompt_block();
        assert!(block.starts_with("finnhub:\n"));
        assert!(block.contains("current_price: 114.67"));
    }

    #[test]
    fn test_metadata_order_is_stable() {
        let record = SourceRecord::empty("yahoo")
            .with_metadata("z_last", "1")
            .with_metadata("a_first", "2");
        let block = record.to_prompt_block();
        let a = block.find("a_first").unwrap();
        let z = block.find("z_last").unwrap();
        assert!(a < z);
    }

    #[test]
    fn test_indicator_table_markdown() {
        let mut table = IndicatorTable::new(
            "Technical indicators",
            vec!["indicator".to_string(), "value".to_string()],
        );
        table.push_row(vec!["RSI_14".to_string(), "24.66".to_string()]);

        let rendered = table.to_markdown();
        assert!(rendered.starts_with("Technical indicators:\n"));
        assert!(rendered.contains("RSI_14"));
        assert!(rendered.contains("24.66"));
    }

    #[test]
    fn test_record_with_indicators_renders_tables() {
        let mut table = IndicatorTable::new("Quotes", vec!["close".to_string()]);
        table.push_row(vec!["114.67".to_string()]);
        let record = SourceRecord::empty("yahoo_technical").with_indicators(table);

        assert!(record.has_data());
        let block = record.to_prompt_block();
        assert!(block.contains("Quotes:"));
        assert!(block.contains("114.67"));
    }
}
