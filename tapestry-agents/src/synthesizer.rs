//! The result synthesizer: one answer from many agents' outputs.

use std::sync::Arc;
use tracing::instrument;

use tapestry_core::traits::ChatModel;

use crate::error::{AgentError, Result};
use crate::prompts;
use crate::types::AgentResult;

/// Fuses multiple agents' results into one coherent answer.
#[derive(Debug)]
pub struct ResultSynthesizer {
    model: Arc<dyn ChatModel>,
}

impl ResultSynthesizer {
    /// Create a synthesizer backed by the given chat model.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Synthesize one answer from the collected agent results.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Synthesis`] when invoked with no results;
    /// callers must route around empty input via the executor's
    /// direct-response fallback instead. Also errors when the generation
    /// call fails.
    #[instrument(skip_all, fields(results = results.len()))]
    pub async fn synthesize(&self, prompt: &str, results: &[AgentResult]) -> Result<String> {
        if results.is_empty() {
            return Err(AgentError::synthesis("No agent results to synthesize"));
        }

        let blocks = results
            .iter()
            .map(|result| {
                let payload = serde_json::to_string_pretty(&result.to_json())
                    .unwrap_or_else(|_| "{}".to_string());
                format!("=== {} ===\n{payload}", result.kind())
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let answer = self
            .model
            .ask(&prompts::synthesis_system(&blocks), prompt)
            .await?;

        Ok(answer)
    }
}
