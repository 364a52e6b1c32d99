//! Report storage boundary
//!
//! Reports are addressed by logical name; the filesystem store maps them to
//! Markdown files under a date-stamped run directory. Names may contain `/`
//! to address a namespace (the refinement loop's audit artifacts live under
//! `audit/`), and `list_all` deliberately enumerates only the top level so
//! aggregation inputs are exactly the per-stock reports.

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Logical name of the portfolio-level advisory artifact
pub const PORTFOLIO_ADVICE_REPORT: &str = "portfolio_advice_report";

/// Logical name of the portfolio-level assessment artifact
pub const PORTFOLIO_ASSESSMENT_REPORT: &str = "portfolio_assessment_report";

/// Logical name of a per-stock report
pub fn stock_report_name(ticker: &str) -> String {
    format!("{ticker}_report")
}

/// Persistence boundary for reports
///
/// `exists` backs the skip-if-already-persisted idempotency checks. When
/// stocks are processed in parallel, exists-then-write is a read-then-write
/// race and needs an exclusive per-key acquisition; the sequential run has
/// no such hazard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist a report under its logical name, returning its location
    async fn write(&self, name: &str, content: &str) -> Result<PathBuf>;

    /// Whether a report with this logical name is already persisted
    async fn exists(&self, name: &str) -> bool;

    /// All top-level reports as (name, content), sorted by name, with the
    /// two portfolio-level artifact names always excluded
    async fn list_all(&self) -> Result<Vec<(String, String)>>;
}

/// Filesystem-backed report store
///
/// Layout: `{reports_dir}/report_{YYYY-MM-DD}/{name}.md`.
pub struct FsReportStore {
    root: PathBuf,
}

impl FsReportStore {
    /// Create a store rooted at the run directory for `run_date`
    pub fn new(reports_dir: impl AsRef<Path>, run_date: NaiveDate) -> Self {
        Self {
            root: reports_dir.as_ref().join(format!("report_{run_date}")),
        }
    }

    /// The run directory this store writes into
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.md"))
    }
}

#[async_trait]
impl ReportStore for FsReportStore {
    async fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path_for(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;
        debug!(name, path = %path.display(), "Report persisted");
        Ok(path)
    }

    async fn exists(&self, name: &str) -> bool {
        tokio::fs::try_exists(self.path_for(name)).await.unwrap_or(false)
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>> {
        let mut reports = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            // A run that persisted nothing has no directory yet
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(reports),
            Err(err) => return Err(err.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("md")
            {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if name == PORTFOLIO_ADVICE_REPORT || name == PORTFOLIO_ASSESSMENT_REPORT {
                continue;
            }
            let content = tokio::fs::read_to_string(&path).await?;
            reports.push((name.to_string(), content));
        }

        reports.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> FsReportStore {
        FsReportStore::new(dir.path(), NaiveDate::from_ymd_opt(2026, 8, 6).unwrap())
    }

    #[tokio::test]
    async fn test_write_then_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert!(!store.exists("NVO_report").await);
        let path = store.write("NVO_report", "# Advice").await.unwrap();
        assert!(path.ends_with("report_2026-08-06/NVO_report.md"));
        assert!(store.exists("NVO_report").await);
    }

    #[tokio::test]
    async fn test_list_all_excludes_portfolio_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.write("NVO_report", "nvo").await.unwrap();
        store.write("AMD_report", "amd").await.unwrap();
        store.write(PORTFOLIO_ADVICE_REPORT, "advice").await.unwrap();
        store
            .write(PORTFOLIO_ASSESSMENT_REPORT, "assessment")
            .await
            .unwrap();

        let reports = store.list_all().await.unwrap();
        let names: Vec<_> = reports.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["AMD_report", "NVO_report"]);
    }

    #[tokio::test]
    async fn test_list_all_is_sorted_and_top_level_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.write("ZIM_report", "z").await.unwrap();
        store.write("AMD_report", "a").await.unwrap();
        store.write("audit/AMD_draft_1", "draft").await.unwrap();

        let reports = store.list_all().await.unwrap();
        let names: Vec<_> = reports.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["AMD_report", "ZIM_report"]);
    }

    #[tokio::test]
    async fn test_list_all_on_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_names_become_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let path = store.write("audit/NVO_draft_0", "draft").await.unwrap();
        assert!(path.ends_with("report_2026-08-06/audit/NVO_draft_0.md"));
        assert!(store.exists("audit/NVO_draft_0").await);
    }
}
