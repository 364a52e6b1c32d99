//! Portfolio-level aggregation over all per-stock reports

use crate::error::Result;
use crate::prompts::PromptLibrary;
use crate::summarize::ReportSummarizer;
use advisor_core::{Report, ReportRole};
use advisor_llm::InferenceProvider;
use std::sync::Arc;
use tracing::{info, warn};

const PORTFOLIO_TEMPERATURE: f32 = 0.5;

/// Produces the two portfolio-level artifacts from the stored reports
pub struct PortfolioAdvisor {
    provider: Arc<dyn InferenceProvider>,
    prompts: Arc<PromptLibrary>,
    summarizer: ReportSummarizer,
}

impl PortfolioAdvisor {
    pub fn new(provider: Arc<dyn InferenceProvider>, prompts: Arc<PromptLibrary>) -> Self {
        let summarizer = ReportSummarizer::new(provider.clone(), prompts.clone());
        Self {
            provider,
            prompts,
            summarizer,
        }
    }

    /// Produce the portfolio advisory over all per-stock reports
    ///
    /// Each report is compressed first; the summaries are concatenated in
    /// the given order (the store lists them sorted by name, so the corpus
    /// order is deterministic). A stock whose summarization fails is
    /// dropped from the aggregate with a warning rather than aborting the
    /// portfolio run; empty summaries contribute nothing.
    pub async fn provide_advice(&self, reports: &[(String, String)]) -> Result<Report> {
        info!(reports = reports.len(), "Aggregating stock reports into portfolio advice");

        let mut summaries = Vec::new();
        for (name, content) in reports {
            match self.summarizer.summarize(name, content).await {
                Ok(summary) if !summary.is_empty() => summaries.push(summary.text),
                Ok(_) => {}
                Err(err) => {
                    warn!(report = %name, %err,
                        "Summarization failed, dropping report from aggregate");
                }
            }
        }

        let corpus = summaries.join("\n\n");
        let prompt = self.prompts.portfolio_advice(&corpus)?;
        let text = self.provider.infer(&prompt, PORTFOLIO_TEMPERATURE).await?;
        Ok(Report::new(ReportRole::PortfolioAdvisory, text))
    }

    /// Review the quality of the portfolio based on the advisory text
    ///
    /// This pass consumes the generated advisory, not the summary corpus.
    pub async fn assess_portfolio(&self, advice: &Report) -> Result<Report> {
        info!("Assessing portfolio advisory");
        let prompt = self.prompts.portfolio_assessment(&advice.text)?;
        let text = self.provider.infer(&prompt, PORTFOLIO_TEMPERATURE).await?;
        Ok(Report::new(ReportRole::PortfolioAssessment, text))
    }
}
