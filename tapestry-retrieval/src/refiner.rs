//! Query refinement.
//!
//! When the evaluator signals that evidence is insufficient, the refiner
//! rewrites the search query to target the stated missing information while
//! preserving the original intent.

use std::sync::Arc;
use tracing::{debug, instrument};

use tapestry_core::{traits::ChatModel, Evaluation, Result};

use crate::context::truncate_chars;
use crate::prompts;

/// Character budget for the context passed to the refinement call.
pub const REFINEMENT_CONTEXT_BUDGET: usize = 1500;

/// Placeholder used when the evaluator reported no specific gap.
const GENERIC_MISSING_INFORMATION: &str = "general information";

/// Rewrites search queries based on evaluation feedback.
#[derive(Debug)]
pub struct QueryRefiner {
    model: Arc<dyn ChatModel>,
}

impl QueryRefiner {
    /// Create a refiner backed by the given chat model.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Produce a refined query for the next retrieval pass.
    ///
    /// The model's response is trimmed to its first non-empty line, which
    /// defends against verbose models prepending explanation. An empty
    /// refinement falls back to `original_query` so the controller never
    /// retrieves with an empty query.
    ///
    /// # Errors
    ///
    /// Returns an error if the generation call fails.
    #[instrument(skip_all, fields(query_len = original_query.len()))]
    pub async fn refine(
        &self,
        original_query: &str,
        current_context: &str,
        evaluation: &Evaluation,
    ) -> Result<String> {
        let missing = evaluation
            .missing_information
            .as_deref()
            .unwrap_or(GENERIC_MISSING_INFORMATION);

        let user = prompts::refinement_user(
            original_query,
            truncate_chars(current_context, REFINEMENT_CONTEXT_BUDGET),
            missing,
            &evaluation.reasoning,
        );

        let response = self.model.ask(prompts::REFINEMENT_SYSTEM, &user).await?;
        let refined = Self::first_line(&response);

        if refined.is_empty() {
            debug!("refinement produced an empty query; keeping the original");
            Ok(original_query.to_string())
        } else {
            debug!(refined = %refined, "refined query");
            Ok(refined)
        }
    }

    /// Extract the first non-empty line of a response.
    fn first_line(text: &str) -> String {
        text.trim()
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_strips_explanations() {
        let text = "deployment topology kubernetes ingress\n\nI added terms about networking.";
        assert_eq!(
            QueryRefiner::first_line(text),
            "deployment topology kubernetes ingress"
        );
    }

    #[test]
    fn test_first_line_skips_leading_blank_lines() {
        assert_eq!(QueryRefiner::first_line("\n\n  refined query  \n"), "refined query");
    }

    #[test]
    fn test_first_line_of_empty_text() {
        assert_eq!(QueryRefiner::first_line("   \n \n"), "");
    }
}
