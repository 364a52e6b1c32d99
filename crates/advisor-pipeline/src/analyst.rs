//! Domain analysts: source records in, single-domain report out

use crate::error::Result;
use crate::prompts::PromptLibrary;
use advisor_core::{PortfolioItem, Report, ReportRole, SourceRecord};
use advisor_llm::InferenceProvider;
use std::sync::Arc;
use tracing::info;

/// Low temperature favors determinism and factuality over creativity
const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Analysis domain, selecting the instruction template and report role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Technical,
    Financial,
}

impl Domain {
    /// Report role produced by this domain
    pub fn role(self) -> ReportRole {
        match self {
            Self::Technical => ReportRole::Technical,
            Self::Financial => ReportRole::Financial,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Financial => "financial",
        }
    }
}

/// Transforms pooled source records into a single-domain textual report
/// through one inference call
pub struct DomainAnalyst {
    provider: Arc<dyn InferenceProvider>,
    prompts: Arc<PromptLibrary>,
    domain: Domain,
}

impl DomainAnalyst {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        prompts: Arc<PromptLibrary>,
        domain: Domain,
    ) -> Self {
        Self {
            provider,
            prompts,
            domain,
        }
    }

    /// Analyze one stock from its pooled source records
    ///
    /// Records are embedded in fetcher registration order. Zero usable
    /// records still issue the call with an empty data block; the model has
    /// to acknowledge the missing data itself.
    pub async fn analyze(&self, records: &[SourceRecord], item: &PortfolioItem) -> Result<Report> {
        let data_block = build_data_block(records, self.domain);
        info!(
            ticker = %item.ticker_symbol,
            domain = self.domain.as_str(),
            provider = self.provider.name(),
            model = self.provider.model(),
            sources = records.iter().filter(|r| r.has_data()).count(),
            data_chars = data_block.len(),
            "Running domain analysis"
        );

        let ticker = &item.ticker_symbol;
        let purchase_context = item.purchase_context();
        let prompt = match self.domain {
            Domain::Technical => {
                self.prompts
                    .technical_analysis(ticker, &purchase_context, &data_block)?
            }
            Domain::Financial => {
                self.prompts
                    .financial_analysis(ticker, &purchase_context, &data_block)?
            }
        };

        let text = self.provider.infer(&prompt, ANALYSIS_TEMPERATURE).await?;
        Ok(Report::new(self.domain.role(), text))
    }
}

/// Concatenate all contributing records into one prompt data block
///
/// Records without data are silently excluded. The financial domain
/// compacts each segment (spaces, newlines and the literal `nan` stripped)
/// to fit statement tables into the context window.
fn build_data_block(records: &[SourceRecord], domain: Domain) -> String {
    let mut block = String::new();
    for record in records.iter().filter(|r| r.has_data()) {
        let segment = record.to_prompt_block();
        match domain {
            Domain::Technical => block.push_str(&segment),
            Domain::Financial => {
                block.push_str(&compact(&segment));
                block.push_str("\n\n");
            }
        }
    }
    block
}

fn compact(text: &str) -> String {
    text.replace(' ', "").replace('\n', "").replace("nan", "")
}
