//! Retrieval quality evaluation.
//!
//! After each iterative pass the evaluator judges whether the accumulated
//! context answers the original question. The judgment is one generation
//! call parsed for an embedded JSON block; parsing failure is never fatal
//! and resolves to the conservative default so the controller can terminate
//! instead of looping forever on malformed output.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use tapestry_core::{structured::extract_json, traits::ChatModel, Evaluation, Result};

use crate::context::truncate_chars;
use crate::prompts;

/// Character budget for the current context passed to the judgment call.
pub const CURRENT_CONTEXT_BUDGET: usize = 2000;

/// Character budget for the previous iteration's context.
pub const PREVIOUS_CONTEXT_BUDGET: usize = 1000;

/// Confidence assumed when a parsed judgment omits the confidence field.
const MISSING_CONFIDENCE: f32 = 0.5;

/// Raw judgment shape as emitted by the model.
///
/// Every field is optional and loosely typed so a sloppy judgment degrades
/// field by field instead of failing wholesale.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluation {
    #[serde(default)]
    confidence: Option<serde_json::Value>,
    #[serde(default)]
    needs_refinement: Option<serde_json::Value>,
    #[serde(default)]
    missing_information: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Judges whether accumulated evidence answers the original question.
#[derive(Debug)]
pub struct RetrievalEvaluator {
    model: Arc<dyn ChatModel>,
}

impl RetrievalEvaluator {
    /// Create an evaluator backed by the given chat model.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Evaluate retrieval quality for one iteration.
    ///
    /// Context arguments are truncated to fixed character budgets so the
    /// judgment call stays cheap regardless of how much evidence has
    /// accumulated.
    ///
    /// # Errors
    ///
    /// Returns an error only when the generation call itself fails; an
    /// unparsable response yields the default judgment instead.
    #[instrument(skip_all, fields(query_len = original_query.len()))]
    pub async fn evaluate(
        &self,
        original_query: &str,
        current_context: &str,
        previous_context: &str,
    ) -> Result<Evaluation> {
        let user = prompts::evaluation_user(
            original_query,
            truncate_chars(current_context, CURRENT_CONTEXT_BUDGET),
            truncate_chars(previous_context, PREVIOUS_CONTEXT_BUDGET),
        );

        let response = self.model.ask(prompts::EVALUATION_SYSTEM, &user).await?;
        let evaluation = Self::parse(&response);
        debug!(
            confidence = evaluation.confidence,
            needs_refinement = evaluation.needs_refinement,
            "evaluated retrieval quality"
        );
        Ok(evaluation)
    }

    /// Parse a judgment out of free-form model text.
    ///
    /// Unparsable text yields [`Evaluation::fallback`]; a parsed judgment
    /// with an out-of-range confidence is also distrusted back to the
    /// fallback confidence.
    fn parse(text: &str) -> Evaluation {
        let Some(raw) = extract_json::<RawEvaluation>(text) else {
            debug!("could not extract evaluation JSON; using fallback judgment");
            return Evaluation::fallback();
        };

        let confidence = raw
            .confidence
            .as_ref()
            .and_then(value_to_f32)
            .unwrap_or(MISSING_CONFIDENCE);
        let needs_refinement = raw
            .needs_refinement
            .as_ref()
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        let missing_information = raw.missing_information.filter(|text| !text.is_empty());

        Evaluation::new(
            confidence,
            needs_refinement,
            missing_information,
            raw.reasoning.unwrap_or_default(),
        )
    }
}

/// Read a numeric value that may arrive as a JSON number or a numeric string.
fn value_to_f32(value: &serde_json::Value) -> Option<f32> {
    match value {
        serde_json::Value::Number(number) => number.as_f64().map(|v| v as f32),
        serde_json::Value::String(text) => text.trim().parse::<f32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_core::types::evaluation::FALLBACK_CONFIDENCE;
    use test_case::test_case;

    #[test]
    fn test_parse_well_formed_judgment() {
        let text = r#"{"confidence": 0.9, "needsRefinement": false, "missingInformation": null, "reasoning": "covers the question"}"#;
        let evaluation = RetrievalEvaluator::parse(text);
        assert_eq!(evaluation.confidence, 0.9);
        assert!(!evaluation.needs_refinement);
        assert!(evaluation.missing_information.is_none());
    }

    #[test]
    fn test_parse_judgment_with_surrounding_prose() {
        let text = "Here is my evaluation:\n{\"confidence\": 0.4, \"needsRefinement\": true, \"missingInformation\": \"release dates\"}\nHope that helps!";
        let evaluation = RetrievalEvaluator::parse(text);
        assert_eq!(evaluation.confidence, 0.4);
        assert!(evaluation.needs_refinement);
        assert_eq!(
            evaluation.missing_information.as_deref(),
            Some("release dates")
        );
    }

    #[test]
    fn test_parse_garbage_yields_fallback() {
        let evaluation = RetrievalEvaluator::parse("I am not sure what you mean.");
        assert_eq!(evaluation, Evaluation::fallback());
        assert!(!evaluation.needs_refinement);
    }

    #[test_case("1.7"; "above range")]
    #[test_case("-0.3"; "below range")]
    fn test_out_of_range_confidence_never_propagates(confidence: &str) {
        let text = format!("{{\"confidence\": {confidence}, \"needsRefinement\": false}}");
        let parsed = RetrievalEvaluator::parse(&text);
        assert!((0.0..=FALLBACK_CONFIDENCE).contains(&parsed.confidence));
    }

    #[test]
    fn test_confidence_as_string() {
        let evaluation = RetrievalEvaluator::parse(r#"{"confidence": "0.75"}"#);
        assert_eq!(evaluation.confidence, 0.75);
    }

    #[test]
    fn test_missing_confidence_defaults_to_mid() {
        let evaluation = RetrievalEvaluator::parse(r#"{"needsRefinement": true}"#);
        assert_eq!(evaluation.confidence, MISSING_CONFIDENCE);
        assert!(evaluation.needs_refinement);
    }
}
