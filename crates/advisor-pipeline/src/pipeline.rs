//! Per-stock pipeline: fetch, analyze, advise, refine, persist

use crate::advisor::AdvisorySynthesizer;
use crate::analyst::{Domain, DomainAnalyst};
use crate::config::RunConfig;
use crate::error::Result;
use crate::prompts::PromptLibrary;
use crate::refine::ReportRefiner;
use crate::storage::{ReportStore, stock_report_name};
use advisor_core::{PortfolioItem, SourceRecord};
use advisor_data::DataFetcher;
use advisor_llm::InferenceProvider;
use futures::future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Straight-line pipeline for one stock
///
/// Stages run strictly sequentially because each stage's input is the prior
/// stage's output; only the two domain analyses are independent and run
/// concurrently. A stage failure aborts this stock only.
pub struct StockPipeline {
    technical_fetchers: Vec<Arc<dyn DataFetcher>>,
    financial_fetchers: Vec<Arc<dyn DataFetcher>>,
    technical_analyst: DomainAnalyst,
    financial_analyst: DomainAnalyst,
    synthesizer: AdvisorySynthesizer,
    refiner: Option<ReportRefiner>,
    store: Arc<dyn ReportStore>,
}

impl StockPipeline {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        prompts: Arc<PromptLibrary>,
        technical_fetchers: Vec<Arc<dyn DataFetcher>>,
        financial_fetchers: Vec<Arc<dyn DataFetcher>>,
        store: Arc<dyn ReportStore>,
        config: &RunConfig,
    ) -> Self {
        let technical_analyst =
            DomainAnalyst::new(provider.clone(), prompts.clone(), Domain::Technical);
        let financial_analyst =
            DomainAnalyst::new(provider.clone(), prompts.clone(), Domain::Financial);
        let synthesizer = AdvisorySynthesizer::new(provider.clone(), prompts.clone());
        let refiner = config.refine.then(|| {
            ReportRefiner::new(provider, prompts, store.clone(), config.max_iterations)
        });

        Self {
            technical_fetchers,
            financial_fetchers,
            technical_analyst,
            financial_analyst,
            synthesizer,
            refiner,
            store,
        }
    }

    /// Run the pipeline for one portfolio item
    ///
    /// Returns the persisted report location, or `None` when the report
    /// already exists from an earlier run (skip-if-already-persisted; the
    /// skipped stock costs zero inference calls).
    pub async fn run(&self, item: &PortfolioItem) -> Result<Option<PathBuf>> {
        let ticker = item.ticker_symbol.as_str();
        let report_name = stock_report_name(ticker);
        if self.store.exists(&report_name).await {
            info!(ticker, "Report already persisted, skipping stock");
            return Ok(None);
        }

        info!(ticker, "Running stock analysis");
        let technical_records = poll_fetchers(&self.technical_fetchers, ticker).await;
        let financial_records = poll_fetchers(&self.financial_fetchers, ticker).await;

        let (technical, financial) = future::try_join(
            self.technical_analyst.analyze(&technical_records, item),
            self.financial_analyst.analyze(&financial_records, item),
        )
        .await?;

        let advisory = self.synthesizer.advise(&technical, &financial, item).await?;
        let advisory = match &self.refiner {
            Some(refiner) => refiner.refine(advisory, ticker).await?,
            None => advisory,
        };

        let path = self.store.write(&report_name, &advisory.text).await?;
        info!(ticker, path = %path.display(), "Stock report persisted");
        Ok(Some(path))
    }
}

/// Poll every fetcher for one ticker, keeping registration order
///
/// Fetchers never fail outward, so the result always has one record per
/// fetcher; records without data are excluded later, at prompt assembly.
async fn poll_fetchers(fetchers: &[Arc<dyn DataFetcher>], ticker: &str) -> Vec<SourceRecord> {
    let mut records = Vec::with_capacity(fetchers.len());
    for fetcher in fetchers {
        records.push(fetcher.fetch(ticker).await);
    }
    records
}
