//! Fixed instruction strings for the retrieval-side model calls.
//!
//! All prompt text lives here so the control flow in the evaluator, refiner,
//! and controller stays free of string assembly details.

/// System instruction for single-pass answer generation.
pub const ANSWER_SYSTEM: &str = "You are a helpful assistant. Answer the user's question using \
the provided context. If the context doesn't contain relevant information, say so.";

/// System instruction for answer generation over multi-pass context.
pub const ITERATIVE_ANSWER_SYSTEM: &str = "You are a helpful assistant. Answer the user's \
question using the provided context. The context may contain information from multiple \
retrieval passes. Synthesize all relevant information to provide a comprehensive answer.";

/// System instruction for the retrieval-quality evaluation call.
pub const EVALUATION_SYSTEM: &str = r#"You are a retrieval quality evaluator. Analyze whether the retrieved context is sufficient to answer the user's question.

Evaluate:
1. Confidence (0.0-1.0): How confident are you that the context contains enough information?
2. Needs refinement: Does the query need to be refined to find better information?
3. Missing information: What specific information is missing (if any)?

Respond with JSON:
{
  "confidence": 0.0-1.0,
  "needsRefinement": boolean,
  "missingInformation": "description of what's missing" or null,
  "reasoning": "brief explanation"
}"#;

/// System instruction for the query refinement call.
pub const REFINEMENT_SYSTEM: &str = r"You are a query refinement expert. Refine the search query to find better information based on what's missing.

Guidelines:
- Keep the core intent of the original query
- Add specific terms related to the missing information
- Use more precise terminology
- Maintain natural language

Return ONLY the refined query, no explanation.";

/// Render the single-pass answer instruction with the retrieved context.
#[must_use]
pub fn answer_system(context: &str) -> String {
    format!("{ANSWER_SYSTEM}\n\nContext:\n{context}")
}

/// Render the multi-pass answer instruction with the accumulated context.
#[must_use]
pub fn iterative_answer_system(context: &str) -> String {
    format!("{ITERATIVE_ANSWER_SYSTEM}\n\nContext:\n{context}")
}

/// Render the user message for an evaluation call.
#[must_use]
pub fn evaluation_user(query: &str, current_context: &str, previous_context: &str) -> String {
    let previous = if previous_context.is_empty() {
        String::new()
    } else {
        format!("Previous Context (for comparison):\n{previous_context}\n\n")
    };

    format!(
        "Original Query: {query}\n\nCurrent Context:\n{current_context}\n\n{previous}Evaluate the retrieval quality."
    )
}

/// Render the user message for a refinement call.
#[must_use]
pub fn refinement_user(
    original_query: &str,
    current_context: &str,
    missing_information: &str,
    reasoning: &str,
) -> String {
    format!(
        "Original Query: {original_query}\n\nCurrent Context Retrieved:\n{current_context}\n\n\
         Missing Information: {missing_information}\n\nReasoning: {reasoning}\n\n\
         Generate a refined search query:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_user_omits_empty_previous_context() {
        let rendered = evaluation_user("q", "ctx", "");
        assert!(!rendered.contains("Previous Context"));

        let rendered = evaluation_user("q", "ctx", "earlier");
        assert!(rendered.contains("Previous Context (for comparison):\nearlier"));
    }

    #[test]
    fn test_answer_system_embeds_context() {
        let rendered = answer_system("some context");
        assert!(rendered.ends_with("Context:\nsome context"));
    }
}
