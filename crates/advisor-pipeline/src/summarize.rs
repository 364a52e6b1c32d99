//! Per-stock report compression for the aggregation stage
//!
//! Summaries exist solely to respect the portfolio prompt's context-window
//! budget: concatenating raw reports would outgrow the backend's window as
//! the portfolio grows.

use crate::error::Result;
use crate::prompts::PromptLibrary;
use advisor_core::{Report, ReportRole};
use advisor_llm::InferenceProvider;
use std::sync::Arc;
use tracing::info;

const SUMMARY_TEMPERATURE: f32 = 1.0;

/// Compresses one stored report into a shorter summary report
pub struct ReportSummarizer {
    provider: Arc<dyn InferenceProvider>,
    prompts: Arc<PromptLibrary>,
}

impl ReportSummarizer {
    pub fn new(provider: Arc<dyn InferenceProvider>, prompts: Arc<PromptLibrary>) -> Self {
        Self { provider, prompts }
    }

    /// Summarize one report, preserving stock identity and any rating
    ///
    /// Empty input (e.g. an unreadable file) yields an empty summary
    /// without an inference call, never an error.
    pub async fn summarize(&self, name: &str, content: &str) -> Result<Report> {
        if content.trim().is_empty() {
            return Ok(Report::new(ReportRole::Summary, ""));
        }

        info!(
            report = name,
            content_chars = content.len(),
            provider = self.provider.name(),
            model = self.provider.model(),
            "Summarizing report"
        );
        let prompt = self.prompts.summary(content)?;
        let text = self.provider.infer(&prompt, SUMMARY_TEMPERATURE).await?;
        Ok(Report::new(ReportRole::Summary, text))
    }
}
