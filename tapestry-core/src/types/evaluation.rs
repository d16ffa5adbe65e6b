//! Evaluator judgment types.
//!
//! An [`Evaluation`] is the structured output of one retrieval-quality
//! judgment. Judgments are parsed out of free-form model text, so the type
//! carries a conservative fallback used whenever the text cannot be parsed:
//! the iterative controller must terminate cleanly on a malformed judgment,
//! never crash or spin.

use serde::{Deserialize, Serialize};

/// Confidence assigned when a judgment cannot be parsed or reports a value
/// outside `[0, 1]`.
pub const FALLBACK_CONFIDENCE: f32 = 0.6;

/// The evaluator's judgment for one retrieval iteration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    /// How confident the evaluator is that the accumulated context answers
    /// the original question, in `[0, 1]`.
    pub confidence: f32,

    /// Whether the query should be rewritten before the next pass.
    pub needs_refinement: bool,

    /// What specific information the evaluator found missing, if any.
    pub missing_information: Option<String>,

    /// Free-text explanation. Diagnostic only, never used for control flow.
    pub reasoning: String,
}

impl Evaluation {
    /// Build an evaluation, distrusting out-of-range confidence values.
    ///
    /// A reported confidence outside `[0, 1]` is replaced by
    /// [`FALLBACK_CONFIDENCE`] rather than clamped: a judgment that cannot
    /// keep its own numbers in range is treated as unparsed.
    #[must_use]
    pub fn new(
        confidence: f32,
        needs_refinement: bool,
        missing_information: Option<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        let confidence = if (0.0..=1.0).contains(&confidence) && confidence.is_finite() {
            confidence
        } else {
            FALLBACK_CONFIDENCE
        };

        Self {
            confidence,
            needs_refinement,
            missing_information,
            reasoning: reasoning.into(),
        }
    }

    /// The conservative default used when a judgment cannot be parsed.
    ///
    /// Defaults to no refinement so the controller can still terminate
    /// instead of looping forever on malformed output.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            confidence: FALLBACK_CONFIDENCE,
            needs_refinement: false,
            missing_information: None,
            reasoning: "Unable to parse evaluation".to_string(),
        }
    }

    /// Whether this judgment satisfies the stopping condition: confidence at
    /// or above the threshold and no refinement requested.
    #[must_use]
    pub fn is_sufficient(&self, confidence_threshold: f32) -> bool {
        self.confidence >= confidence_threshold && !self.needs_refinement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1.7; "above range")]
    #[test_case(-0.3; "below range")]
    #[test_case(f32::NAN; "not a number")]
    fn test_out_of_range_confidence_falls_back(confidence: f32) {
        let evaluation = Evaluation::new(confidence, true, None, "");
        assert!((0.0..=FALLBACK_CONFIDENCE).contains(&evaluation.confidence));
        assert_eq!(evaluation.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_in_range_confidence_kept() {
        let evaluation = Evaluation::new(0.85, false, None, "looks complete");
        assert_eq!(evaluation.confidence, 0.85);
    }

    #[test]
    fn test_fallback_terminates() {
        let fallback = Evaluation::fallback();
        assert!(!fallback.needs_refinement);
        assert_eq!(fallback.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_is_sufficient() {
        let evaluation = Evaluation::new(0.9, false, None, "");
        assert!(evaluation.is_sufficient(0.8));

        let refining = Evaluation::new(0.9, true, Some("dates".to_string()), "");
        assert!(!refining.is_sufficient(0.8));

        let low = Evaluation::new(0.5, false, None, "");
        assert!(!low.is_sufficient(0.8));
    }
}
