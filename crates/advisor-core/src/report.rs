//! Report types produced by the pipeline stages

use serde::{Deserialize, Serialize};

/// Role of a report within the pipeline
///
/// Each role is produced exactly once per (stock, role) per run, except
/// `Advisory` which the refinement loop may rewrite before the final
/// version is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportRole {
    /// Single-domain analysis of technical indicators
    Technical,

    /// Single-domain analysis of financial statements
    Financial,

    /// Per-stock recommendation synthesized from both analyses
    Advisory,

    /// Compressed per-stock report used as aggregation input
    Summary,

    /// Portfolio-level recommendation over all summaries
    PortfolioAdvisory,

    /// Portfolio-level review of the advisory text
    PortfolioAssessment,
}

impl ReportRole {
    /// Stable lowercase label, used in log output and audit names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Financial => "financial",
            Self::Advisory => "advisory",
            Self::Summary => "summary",
            Self::PortfolioAdvisory => "portfolio_advisory",
            Self::PortfolioAssessment => "portfolio_assessment",
        }
    }
}

impl std::fmt::Display for ReportRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque block of model-generated text tagged with its pipeline role
///
/// The pipeline makes no assertions about the semantic content of the text;
/// downstream stages treat it as opaque input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// The pipeline role that produced this report
    pub role: ReportRole,

    /// The report text, trimmed of surrounding whitespace
    pub text: String,
}

impl Report {
    /// Create a report, trimming surrounding whitespace from the text
    pub fn new(role: ReportRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into().trim().to_string(),
        }
    }

    /// Whether the report carries no text at all
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
