//! Application configuration file loading
//!
//! One JSON file configures the whole run; it is read once at process
//! entry and the resulting object is passed into the component
//! constructors. Missing required configuration aborts before any
//! inference call is made.

use advisor_data::DataConfig;
use advisor_llm::InferenceConfig;
use advisor_pipeline::RunConfig;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Inference provider selection and settings
    pub inference: InferenceConfig,

    /// Data acquisition settings (API keys, cache dir)
    #[serde(default)]
    pub data: DataConfig,

    /// Pipeline run settings (refinement)
    #[serde(default)]
    pub run: RunConfig,

    /// Path to the declarative portfolio definition
    #[serde(default = "default_portfolio_file")]
    pub portfolio_file: PathBuf,

    /// Base directory for the date-stamped report folders
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

fn default_portfolio_file() -> PathBuf {
    PathBuf::from("./config/portfolio.json")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("./reports")
}

impl AppConfig {
    /// Load the configuration file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"inference": {"provider": "ollama"}}"#)
            .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.inference.provider, "ollama");
        assert_eq!(config.reports_dir, PathBuf::from("./reports"));
        assert_eq!(config.run.max_iterations, 2);
    }

    #[test]
    fn test_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "inference": {
                    "provider": "groq",
                    "groq": {"api_key": "k", "model": "llama3-70b-8192"}
                },
                "data": {"edgar_user_agent": "advisor-rs admin@example.com"},
                "run": {"max_iterations": 3, "refine": true},
                "portfolio_file": "./my_portfolio.json",
                "reports_dir": "./out"
            }"#,
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.run.max_iterations, 3);
        assert_eq!(config.reports_dir, PathBuf::from("./out"));
        assert_eq!(
            config.data.edgar_user_agent.as_deref(),
            Some("advisor-rs admin@example.com")
        );
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(AppConfig::load("/nonexistent/app_config.json").is_err());
    }
}
