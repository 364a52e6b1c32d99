//! Command-line interface for advisor-rs

mod config;

use chrono::Utc;
use clap::Parser;
use config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use advisor_core::load_portfolio;
use advisor_data::{financial_fetchers, technical_fetchers};
use advisor_llm::create_provider;
use advisor_pipeline::{FsReportStore, PortfolioRun};

#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(about = "Investment-research report pipeline", long_about = None)]
struct Args {
    /// Path to the application configuration file
    #[arg(short, long, default_value = "./config/app_config.json")]
    config: PathBuf,

    /// Override the portfolio definition path
    #[arg(long)]
    portfolio: Option<PathBuf>,

    /// Override the reports base directory
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Skip the refinement loop for this run
    #[arg(long)]
    no_refine: bool,
}

/// Initialize tracing subscriber with default configuration
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let mut app_config = AppConfig::load(&args.config)?;
    if let Some(portfolio) = args.portfolio {
        app_config.portfolio_file = portfolio;
    }
    if let Some(reports_dir) = args.reports_dir {
        app_config.reports_dir = reports_dir;
    }
    if args.no_refine {
        app_config.run.refine = false;
    }

    // All configuration problems surface here, before any inference call
    let portfolio = load_portfolio(&app_config.portfolio_file)?;
    let provider = create_provider(&app_config.inference)?;

    let store = Arc::new(FsReportStore::new(
        &app_config.reports_dir,
        Utc::now().date_naive(),
    ));
    info!(
        stocks = portfolio.len(),
        reports = %store.root().display(),
        "Starting portfolio run"
    );

    let run = PortfolioRun::new(
        provider,
        technical_fetchers(&app_config.data),
        financial_fetchers(&app_config.data),
        store,
        &app_config.run,
    )?;

    let summary = run.execute(&portfolio).await?;
    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        aggregated = summary.aggregated,
        "Done"
    );

    Ok(())
}
