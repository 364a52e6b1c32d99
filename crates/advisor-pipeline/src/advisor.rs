//! Advisory synthesis: two domain reports in, one recommendation out

use crate::error::Result;
use crate::prompts::PromptLibrary;
use advisor_core::{PortfolioItem, Report, ReportRole};
use advisor_llm::InferenceProvider;
use std::sync::Arc;
use tracing::info;

const ADVISORY_TEMPERATURE: f32 = 0.3;

/// Combines a technical and a financial report into one recommendation
///
/// The contract is "one text given two texts": both inputs are explicitly
/// labeled in the template (their argument order carries no meaning), and
/// the model's adherence to the mandated structure is not validated;
/// downstream stages treat the result as opaque text.
pub struct AdvisorySynthesizer {
    provider: Arc<dyn InferenceProvider>,
    prompts: Arc<PromptLibrary>,
}

impl AdvisorySynthesizer {
    pub fn new(provider: Arc<dyn InferenceProvider>, prompts: Arc<PromptLibrary>) -> Self {
        Self { provider, prompts }
    }

    /// Produce the advisory report for one stock
    pub async fn advise(
        &self,
        technical: &Report,
        financial: &Report,
        item: &PortfolioItem,
    ) -> Result<Report> {
        info!(
            ticker = %item.ticker_symbol,
            provider = self.provider.name(),
            model = self.provider.model(),
            "Synthesizing advisory report"
        );

        let prompt = self.prompts.advisory(
            &item.ticker_symbol,
            &item.purchase_context(),
            &technical.text,
            &financial.text,
        )?;
        let text = self.provider.infer(&prompt, ADVISORY_TEMPERATURE).await?;
        Ok(Report::new(ReportRole::Advisory, text))
    }
}
