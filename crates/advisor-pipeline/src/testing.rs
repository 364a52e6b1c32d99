//! Shared test doubles for the pipeline seams

use crate::storage::{PORTFOLIO_ADVICE_REPORT, PORTFOLIO_ASSESSMENT_REPORT, ReportStore};
use advisor_core::{PortfolioItem, SourceRecord};
use advisor_data::DataFetcher;
use advisor_llm::{InferenceProvider, LLMError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

/// Inference provider that replays a scripted sequence of responses and
/// records every call it receives
pub(crate) struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<(String, f32)>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self::new(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub fn temperatures(&self) -> Vec<f32> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, temperature)| *temperature)
            .collect()
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    async fn infer(&self, prompt: &str, temperature: f32) -> advisor_llm::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LLMError::RequestFailed(message)),
            // A script that runs out keeps answering; length-sensitive tests
            // script every response explicitly
            None => Ok("scripted response".to_string()),
        }
    }

    async fn infer_structured(
        &self,
        _prompt: &str,
        _expected_format: &str,
        _temperature: f32,
    ) -> advisor_llm::Result<String> {
        Err(LLMError::structured_unsupported("scripted"))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-test-model"
    }
}

/// In-memory report store with the same listing contract as the fs store
pub(crate) struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn seed(&self, name: &str, content: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    pub fn content(&self, name: &str) -> Option<String> {
        self.entries.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn write(&self, name: &str, content: &str) -> crate::Result<PathBuf> {
        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_string());
        Ok(PathBuf::from(format!("/memory/{name}.md")))
    }

    async fn exists(&self, name: &str) -> bool {
        self.entries.lock().unwrap().contains_key(name)
    }

    async fn list_all(&self) -> crate::Result<Vec<(String, String)>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| {
                !name.contains('/')
                    && name.as_str() != PORTFOLIO_ADVICE_REPORT
                    && name.as_str() != PORTFOLIO_ASSESSMENT_REPORT
            })
            .map(|(name, content)| (name.clone(), content.clone()))
            .collect())
    }
}

/// Fetcher returning a fixed record, optionally failing (= empty record)
/// for one specific ticker
pub(crate) struct StaticFetcher {
    origin: String,
    empty_for: Option<String>,
}

impl StaticFetcher {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            empty_for: None,
        }
    }

    pub fn empty_for(origin: &str, ticker: &str) -> Self {
        Self {
            origin: origin.to_string(),
            empty_for: Some(ticker.to_string()),
        }
    }
}

#[async_trait]
impl DataFetcher for StaticFetcher {
    fn origin(&self) -> &str {
        &self.origin
    }

    async fn fetch(&self, ticker: &str) -> SourceRecord {
        if self.empty_for.as_deref() == Some(ticker) {
            return SourceRecord::empty(&self.origin);
        }
        SourceRecord::empty(&self.origin).with_metadata("current_price", "100.00")
    }
}

/// Minimal portfolio item for tests
pub(crate) fn portfolio_item(ticker: &str) -> PortfolioItem {
    PortfolioItem {
        name: format!("{ticker} Inc."),
        ticker_symbol: ticker.to_string(),
        buy_price: 100.0,
        currency: "USD".to_string(),
        buy_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    }
}
