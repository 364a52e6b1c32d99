//! Whole-portfolio run: every stock through the pipeline, then aggregation

use crate::config::RunConfig;
use crate::error::Result;
use crate::pipeline::StockPipeline;
use crate::portfolio::PortfolioAdvisor;
use crate::prompts::PromptLibrary;
use crate::storage::{PORTFOLIO_ADVICE_REPORT, PORTFOLIO_ASSESSMENT_REPORT, ReportStore};
use advisor_core::PortfolioItem;
use advisor_data::DataFetcher;
use advisor_llm::InferenceProvider;
use std::sync::Arc;
use tracing::{error, info};

/// Outcome counts of one portfolio run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Stocks analyzed and persisted in this run
    pub processed: usize,

    /// Stocks skipped because their report was already persisted
    pub skipped: usize,

    /// Stocks whose pipeline failed; they produce no report and are
    /// naturally re-attempted on the next full run
    pub failed: usize,

    /// Whether the portfolio artifacts were (re)generated this run
    pub aggregated: bool,
}

/// Drives one full portfolio run
///
/// Stocks are processed sequentially on one logical thread of control;
/// there is no data dependency between them, only the shared
/// skip-if-persisted checks. A per-stock failure is contained and logged;
/// the remaining stocks and the aggregation are unaffected.
pub struct PortfolioRun {
    pipeline: StockPipeline,
    portfolio_advisor: PortfolioAdvisor,
    store: Arc<dyn ReportStore>,
}

impl PortfolioRun {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        technical_fetchers: Vec<Arc<dyn DataFetcher>>,
        financial_fetchers: Vec<Arc<dyn DataFetcher>>,
        store: Arc<dyn ReportStore>,
        config: &RunConfig,
    ) -> Result<Self> {
        let prompts = Arc::new(PromptLibrary::new()?);
        let pipeline = StockPipeline::new(
            provider.clone(),
            prompts.clone(),
            technical_fetchers,
            financial_fetchers,
            store.clone(),
            config,
        );
        let portfolio_advisor = PortfolioAdvisor::new(provider, prompts);
        Ok(Self {
            pipeline,
            portfolio_advisor,
            store,
        })
    }

    /// Process every portfolio item, then aggregate
    pub async fn execute(&self, portfolio: &[PortfolioItem]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for item in portfolio {
            match self.pipeline.run(item).await {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(err) => {
                    summary.failed += 1;
                    error!(
                        ticker = %item.ticker_symbol, %err,
                        "Stock pipeline failed, continuing with remaining stocks"
                    );
                }
            }
        }

        summary.aggregated = self.aggregate().await?;
        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            aggregated = summary.aggregated,
            "Portfolio run finished"
        );
        Ok(summary)
    }

    /// Generate the two portfolio artifacts unless both already exist
    async fn aggregate(&self) -> Result<bool> {
        if self.store.exists(PORTFOLIO_ADVICE_REPORT).await
            && self.store.exists(PORTFOLIO_ASSESSMENT_REPORT).await
        {
            info!("Portfolio artifacts already persisted, skipping aggregation");
            return Ok(false);
        }

        let reports = self.store.list_all().await?;
        let advice = self.portfolio_advisor.provide_advice(&reports).await?;
        let advice_path = self.store.write(PORTFOLIO_ADVICE_REPORT, &advice.text).await?;
        info!(path = %advice_path.display(), "Portfolio advice persisted");

        let assessment = self.portfolio_advisor.assess_portfolio(&advice).await?;
        let assessment_path = self
            .store
            .write(PORTFOLIO_ASSESSMENT_REPORT, &assessment.text)
            .await?;
        info!(path = %assessment_path.display(), "Portfolio assessment persisted");

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, ScriptedProvider, StaticFetcher, portfolio_item};

    fn no_refine() -> RunConfig {
        RunConfig {
            refine: false,
            ..RunConfig::default()
        }
    }

    fn run_with(
        provider: &Arc<ScriptedProvider>,
        store: &Arc<MemoryStore>,
        technical_fetchers: Vec<Arc<dyn DataFetcher>>,
    ) -> PortfolioRun {
        PortfolioRun::new(
            provider.clone(),
            technical_fetchers,
            vec![Arc::new(StaticFetcher::new("fin_source"))],
            store.clone(),
            &no_refine(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_technical_source_affects_only_its_stock() {
        // 3 stocks, the technical source yields nothing for BBB
        let provider = Arc::new(ScriptedProvider::with_responses(vec![]));
        let store = Arc::new(MemoryStore::new());
        let run = run_with(
            &provider,
            &store,
            vec![Arc::new(StaticFetcher::empty_for("tech_source", "BBB"))],
        );

        let portfolio = vec![
            portfolio_item("AAA"),
            portfolio_item("BBB"),
            portfolio_item("CCC"),
        ];
        let summary = run.execute(&portfolio).await.unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.failed, 0);
        assert!(summary.aggregated);

        // All three reports plus both portfolio artifacts were persisted
        let names = store.names();
        for name in [
            "AAA_report",
            "BBB_report",
            "CCC_report",
            PORTFOLIO_ADVICE_REPORT,
            PORTFOLIO_ASSESSMENT_REPORT,
        ] {
            assert!(names.contains(&name.to_string()), "missing {name}");
        }

        // BBB's technical prompt reflects an empty data block; AAA and CCC
        // still carry the source
        let prompts = provider.prompts();
        let technical_prompt = |ticker: &str| {
            prompts
                .iter()
                .find(|p| p.contains(&format!("the stock: {ticker}")) && p.contains("Technical Data"))
                .unwrap()
                .clone()
        };
        assert!(!technical_prompt("BBB").contains("tech_source:"));
        assert!(technical_prompt("AAA").contains("tech_source:"));
        assert!(technical_prompt("CCC").contains("tech_source:"));
    }

    #[tokio::test]
    async fn test_failed_stock_is_contained() {
        // First inference call (AAA technical analysis) fails; every other
        // call succeeds via the script fallback
        let provider = Arc::new(ScriptedProvider::new(vec![Err(
            "backend outage".to_string(),
        )]));
        let store = Arc::new(MemoryStore::new());
        let run = run_with(
            &provider,
            &store,
            vec![Arc::new(StaticFetcher::new("tech_source"))],
        );

        let portfolio = vec![portfolio_item("AAA"), portfolio_item("BBB")];
        let summary = run.execute(&portfolio).await.unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.aggregated);

        let names = store.names();
        assert!(!names.contains(&"AAA_report".to_string()));
        assert!(names.contains(&"BBB_report".to_string()));
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let provider = Arc::new(ScriptedProvider::with_responses(vec![]));
        let store = Arc::new(MemoryStore::new());
        let run = run_with(
            &provider,
            &store,
            vec![Arc::new(StaticFetcher::new("tech_source"))],
        );

        let portfolio = vec![portfolio_item("AAA")];
        let first = run.execute(&portfolio).await.unwrap();
        assert_eq!(first.processed, 1);
        assert!(first.aggregated);

        let calls_after_first = provider.call_count();
        let second = run.execute(&portfolio).await.unwrap();

        assert_eq!(second.skipped, 1);
        assert_eq!(second.processed, 0);
        assert!(!second.aggregated);
        // The second run issued no inference calls at all
        assert_eq!(provider.call_count(), calls_after_first);
    }

    #[tokio::test]
    async fn test_aggregation_inputs_exclude_portfolio_artifacts() {
        let provider = Arc::new(ScriptedProvider::with_responses(vec![]));
        let store = Arc::new(MemoryStore::new());
        // Pre-seed a stale advisory artifact; the assessment is missing, so
        // aggregation re-runs
        store.seed("AAA_report", "aaa advisory");
        store.seed(PORTFOLIO_ADVICE_REPORT, "stale advice");
        let run = run_with(
            &provider,
            &store,
            vec![Arc::new(StaticFetcher::new("tech_source"))],
        );

        let summary = run.execute(&[portfolio_item("AAA")]).await.unwrap();
        assert!(summary.aggregated);

        // Only the stock report was summarized, never the stale artifact
        let summary_prompts: Vec<_> = provider
            .prompts()
            .into_iter()
            .filter(|p| p.contains("Summarize this text"))
            .collect();
        assert_eq!(summary_prompts.len(), 1);
        assert!(summary_prompts[0].contains("aaa advisory"));
        assert!(!summary_prompts[0].contains("stale advice"));
    }
}
