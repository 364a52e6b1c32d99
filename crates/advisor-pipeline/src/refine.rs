//! Bounded rewrite/critique refinement loop
//!
//! The loop alternates two inference calls: `rewrite` improves the draft
//! under the previous critique's instruction (empty on the first pass), and
//! `critique` either emits actionable feedback or the terminal token.
//! Control flow hangs on two string-protocol contracts with the prompts,
//! both matched as case-sensitive literal substrings and centralized here:
//!
//! - [`TERMINAL_TOKEN`] in a critique means no further refinement is needed.
//! - [`REASONING_DELIMITER`] closes a model's private deliberation segment;
//!   only the content after it is meaningful for chaining and persistence.
//!   Stripping keeps quoted "thinking" out of persisted artifacts and out
//!   of the next pass's instruction.

use crate::error::Result;
use crate::prompts::PromptLibrary;
use crate::storage::ReportStore;
use advisor_core::Report;
use advisor_llm::InferenceProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Literal marker in critique output signaling convergence
pub const TERMINAL_TOKEN: &str = "DONE";

/// Closing delimiter of a reasoning-trace segment
pub const REASONING_DELIMITER: &str = "</think>";

const REFINE_TEMPERATURE: f32 = 0.5;

/// Loop-internal state, one instance per refinement entry
struct RefinementState {
    report: String,
    instruction: String,
    count: u32,
    done: bool,
}

/// Iteratively improves a report against automated critique
///
/// Termination is guaranteed by the iteration cap even if the terminal
/// token never appears.
pub struct ReportRefiner {
    provider: Arc<dyn InferenceProvider>,
    prompts: Arc<PromptLibrary>,
    store: Arc<dyn ReportStore>,
    max_iterations: u32,
}

impl ReportRefiner {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        prompts: Arc<PromptLibrary>,
        store: Arc<dyn ReportStore>,
        max_iterations: u32,
    ) -> Self {
        Self {
            provider,
            prompts,
            store,
            max_iterations,
        }
    }

    /// Run the rewrite/critique cycle on a report
    ///
    /// Returns the last accepted draft; the input report's role is kept.
    /// Every intermediate draft and critique is persisted under the
    /// `audit/` namespace; audit failures are logged and never affect the
    /// loop.
    pub async fn refine(&self, report: Report, ticker: &str) -> Result<Report> {
        info!(
            ticker,
            max_iterations = self.max_iterations,
            provider = self.provider.name(),
            model = self.provider.model(),
            "Refining report"
        );

        let mut state = RefinementState {
            report: report.text.clone(),
            instruction: String::new(),
            count: 0,
            done: false,
        };
        self.audit(ticker, "draft", 0, &state.report).await;

        while state.count < self.max_iterations && !state.done {
            state.count += 1;

            let draft = self.rewrite(&state.report, &state.instruction).await?;
            state.report = strip_reasoning_trace(&draft).to_string();
            self.audit(ticker, "draft", state.count, &state.report).await;

            let assessment = self.critique(&state.report).await?;
            self.audit(ticker, "critique", state.count, &assessment).await;

            if assessment.contains(TERMINAL_TOKEN) {
                debug!(ticker, iteration = state.count, "Critique signaled convergence");
                state.done = true;
            } else {
                state.instruction = strip_reasoning_trace(&assessment).to_string();
            }
        }

        if !state.done {
            debug!(ticker, "Iteration budget exhausted without convergence signal");
        }
        Ok(Report::new(report.role, state.report))
    }

    async fn rewrite(&self, report: &str, instruction: &str) -> Result<String> {
        let prompt = self.prompts.refine_rewrite(report, instruction)?;
        Ok(self.provider.infer(&prompt, REFINE_TEMPERATURE).await?)
    }

    async fn critique(&self, report: &str) -> Result<String> {
        let prompt = self.prompts.refine_critique(report)?;
        Ok(self.provider.infer(&prompt, REFINE_TEMPERATURE).await?)
    }

    async fn audit(&self, ticker: &str, kind: &str, iteration: u32, content: &str) {
        let name = format!("audit/{ticker}_{kind}_{iteration}");
        if let Err(err) = self.store.write(&name, content).await {
            warn!(%name, %err, "Failed to persist refinement audit artifact");
        }
    }
}

/// Drop a leading reasoning-trace segment from model output
///
/// If the delimiter occurs, only the content after its first occurrence is
/// kept (leading whitespace trimmed); otherwise the text is returned
/// unchanged.
pub fn strip_reasoning_trace(text: &str) -> &str {
    match text.split_once(REASONING_DELIMITER) {
        Some((_, after)) => after.trim_start(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, ScriptedProvider};
    use advisor_core::ReportRole;

    fn refiner(
        provider: Arc<ScriptedProvider>,
        store: Arc<MemoryStore>,
        max_iterations: u32,
    ) -> ReportRefiner {
        ReportRefiner::new(
            provider,
            Arc::new(PromptLibrary::new().unwrap()),
            store,
            max_iterations,
        )
    }

    fn advisory(text: &str) -> Report {
        Report::new(ReportRole::Advisory, text)
    }

    #[test]
    fn test_strip_keeps_content_after_marker() {
        let text = "<think>private deliberation</think>\nThe actual report.";
        assert_eq!(strip_reasoning_trace(text), "The actual report.");
    }

    #[test]
    fn test_strip_without_marker_is_identity() {
        let text = "Plain report with no trace.";
        assert_eq!(strip_reasoning_trace(text), text);
    }

    #[test]
    fn test_strip_uses_first_marker() {
        let text = "a</think>b</think>c";
        assert_eq!(strip_reasoning_trace(text), "b</think>c");
    }

    #[tokio::test]
    async fn test_two_iterations_with_terminal_token_on_second_critique() {
        // rewrite 1, critique 1 (feedback), rewrite 2, critique 2 (DONE)
        let provider = Arc::new(ScriptedProvider::with_responses(vec![
            "draft one",
            "Add risk section",
            "draft two",
            "Reads well. DONE",
        ]));
        let store = Arc::new(MemoryStore::new());
        let refiner = refiner(provider.clone(), store.clone(), 2);

        let refined = refiner.refine(advisory("initial"), "AMD").await.unwrap();

        assert_eq!(provider.call_count(), 4);
        assert_eq!(refined.text, "draft two");
        assert_eq!(refined.role, ReportRole::Advisory);

        // The second rewrite received the first critique as instruction
        let prompts = provider.prompts();
        assert!(prompts[2].contains("Instruction: Add risk section"));
    }

    #[tokio::test]
    async fn test_terminates_at_cap_without_terminal_token() {
        let provider = Arc::new(ScriptedProvider::with_responses(vec![
            "draft one",
            "more feedback",
            "draft two",
            "still more feedback",
            "draft three",
            "never satisfied",
        ]));
        let store = Arc::new(MemoryStore::new());
        let refiner = refiner(provider.clone(), store.clone(), 3);

        let refined = refiner.refine(advisory("initial"), "NVO").await.unwrap();

        // Exactly 3 rewrite/critique round trips, never a fourth
        assert_eq!(provider.call_count(), 6);
        assert_eq!(refined.text, "draft three");
    }

    #[tokio::test]
    async fn test_terminal_token_on_first_critique_stops_early() {
        let provider = Arc::new(ScriptedProvider::with_responses(vec![
            "draft one",
            "DONE",
        ]));
        let store = Arc::new(MemoryStore::new());
        let refiner = refiner(provider.clone(), store.clone(), 2);

        let refined = refiner.refine(advisory("initial"), "NVO").await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(refined.text, "draft one");
    }

    #[tokio::test]
    async fn test_reasoning_trace_stripped_from_draft_and_instruction() {
        let provider = Arc::new(ScriptedProvider::with_responses(vec![
            "<think>how to rewrite</think>clean draft",
            "<think>what to critique</think>Tighten the summary",
            "final draft",
            "DONE",
        ]));
        let store = Arc::new(MemoryStore::new());
        let refiner = refiner(provider.clone(), store.clone(), 2);

        refiner.refine(advisory("initial"), "AMD").await.unwrap();

        let prompts = provider.prompts();
        // The critique saw the stripped draft
        assert!(prompts[1].contains("clean draft"));
        assert!(!prompts[1].contains("how to rewrite"));
        // The second rewrite's instruction is the stripped critique
        assert!(prompts[2].contains("Instruction: Tighten the summary"));
        assert!(!prompts[2].contains("what to critique"));
    }

    #[tokio::test]
    async fn test_terminal_token_inside_reasoning_trace_still_terminates() {
        // The convergence check runs before the assessment is stripped
        let provider = Arc::new(ScriptedProvider::with_responses(vec![
            "draft one",
            "<think>this is DONE I think</think>",
        ]));
        let store = Arc::new(MemoryStore::new());
        let refiner = refiner(provider.clone(), store.clone(), 2);

        refiner.refine(advisory("initial"), "AMD").await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_audit_artifacts_persisted_per_pass() {
        let provider = Arc::new(ScriptedProvider::with_responses(vec![
            "draft one",
            "feedback",
            "draft two",
            "DONE",
        ]));
        let store = Arc::new(MemoryStore::new());
        let refiner = refiner(provider, store.clone(), 2);

        refiner.refine(advisory("initial"), "AMD").await.unwrap();

        let names = store.names();
        assert!(names.contains(&"audit/AMD_draft_0".to_string()));
        assert!(names.contains(&"audit/AMD_draft_1".to_string()));
        assert!(names.contains(&"audit/AMD_critique_1".to_string()));
        assert!(names.contains(&"audit/AMD_draft_2".to_string()));
        assert!(names.contains(&"audit/AMD_critique_2".to_string()));
        assert_eq!(store.content("audit/AMD_draft_0").unwrap(), "initial");
        assert_eq!(store.content("audit/AMD_draft_2").unwrap(), "draft two");
    }
}
