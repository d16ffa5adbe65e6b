//! Configuration types for the orchestration engine.
//!
//! All configuration is carried by immutable value types passed explicitly
//! through the call chain; there are no ambient globals, which keeps the
//! iterative controller deterministic under test. Validation happens once,
//! before any external call is made.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TapestryError};

/// Kind of chat issuing the request, used to scope agent operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    /// Regular end-user chat.
    #[default]
    User,
    /// Administrative chat with write-capable graph operations.
    Admin,
}

impl ChatType {
    /// Stable string label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Per-pass retrieval parameters handed to a strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalOptions {
    /// Maximum number of results to fetch.
    pub limit: usize,

    /// Minimum similarity score for vector hits.
    pub threshold: f32,

    /// Hop depth for graph-neighborhood lookups.
    pub graph_depth: usize,
}

/// Options controlling one call to the answer engine.
///
/// Defaults follow the production configuration; `validate` rejects
/// out-of-range values before any external call.
///
/// # Examples
///
/// ```rust
/// use tapestry_core::config::AnswerOptions;
///
/// let options = AnswerOptions::default()
///     .with_iterative(true)
///     .with_max_iterations(5);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOptions {
    /// Whether the retrieval agent may run.
    pub use_rag: bool,

    /// Whether the knowledge graph agent may run.
    pub use_graph: bool,

    /// Whether the data processing agent may run.
    pub process_data: bool,

    /// Whether retrieval fuses vector hits with graph context.
    pub use_hybrid: bool,

    /// Whether retrieval iterates with evaluation and refinement.
    pub use_iterative: bool,

    /// Iteration budget for iterative retrieval (1–10).
    pub max_iterations: usize,

    /// Evaluator confidence at or above which iteration stops (0–1).
    pub confidence_threshold: f32,

    /// Graph traversal depth for hybrid retrieval (1–5).
    pub graph_depth: usize,

    /// Number of evidence units to retrieve per pass (1–50).
    pub retrieval_limit: usize,

    /// Minimum similarity score for vector hits (0–1).
    pub similarity_threshold: f32,

    /// Override for the generation model identifier.
    pub model: Option<String>,

    /// Kind of chat issuing the request.
    pub chat_type: ChatType,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            use_rag: true,
            use_graph: true,
            process_data: true,
            use_hybrid: true,
            use_iterative: false,
            max_iterations: 3,
            confidence_threshold: 0.8,
            graph_depth: 1,
            retrieval_limit: 5,
            similarity_threshold: 0.7,
            model: None,
            chat_type: ChatType::User,
        }
    }
}

impl AnswerOptions {
    /// Enable or disable the retrieval agent.
    #[must_use]
    pub fn with_rag(mut self, use_rag: bool) -> Self {
        self.use_rag = use_rag;
        self
    }

    /// Enable or disable the knowledge graph agent.
    #[must_use]
    pub fn with_graph(mut self, use_graph: bool) -> Self {
        self.use_graph = use_graph;
        self
    }

    /// Enable or disable the data processing agent.
    #[must_use]
    pub fn with_data_processing(mut self, process_data: bool) -> Self {
        self.process_data = process_data;
        self
    }

    /// Select hybrid (vector + graph) or vector-only retrieval.
    #[must_use]
    pub fn with_hybrid(mut self, use_hybrid: bool) -> Self {
        self.use_hybrid = use_hybrid;
        self
    }

    /// Enable or disable iterative retrieval.
    #[must_use]
    pub fn with_iterative(mut self, use_iterative: bool) -> Self {
        self.use_iterative = use_iterative;
        self
    }

    /// Set the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the stopping confidence threshold.
    #[must_use]
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the graph traversal depth.
    #[must_use]
    pub fn with_graph_depth(mut self, depth: usize) -> Self {
        self.graph_depth = depth;
        self
    }

    /// Set the per-pass retrieval limit.
    #[must_use]
    pub fn with_retrieval_limit(mut self, limit: usize) -> Self {
        self.retrieval_limit = limit;
        self
    }

    /// Set the similarity threshold.
    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the generation model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the chat type.
    #[must_use]
    pub fn with_chat_type(mut self, chat_type: ChatType) -> Self {
        self.chat_type = chat_type;
        self
    }

    /// The per-pass retrieval parameters these options describe.
    #[must_use]
    pub fn retrieval_options(&self) -> RetrievalOptions {
        RetrievalOptions {
            limit: self.retrieval_limit,
            threshold: self.similarity_threshold,
            graph_depth: self.graph_depth,
        }
    }

    /// Validate option ranges.
    ///
    /// # Errors
    ///
    /// Returns [`TapestryError::Validation`] for any out-of-range value.
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.max_iterations) {
            return Err(TapestryError::validation(
                "max_iterations must be between 1 and 10",
            ));
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(TapestryError::validation(
                "confidence_threshold must be between 0 and 1",
            ));
        }

        if !(1..=5).contains(&self.graph_depth) {
            return Err(TapestryError::validation(
                "graph_depth must be between 1 and 5",
            ));
        }

        if !(1..=50).contains(&self.retrieval_limit) {
            return Err(TapestryError::validation(
                "retrieval_limit must be between 1 and 50",
            ));
        }

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(TapestryError::validation(
                "similarity_threshold must be between 0 and 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AnswerOptions::default().validate().is_ok());
    }

    #[test_case(0; "zero iterations")]
    #[test_case(11; "too many iterations")]
    fn test_invalid_max_iterations(max_iterations: usize) {
        let options = AnswerOptions::default().with_max_iterations(max_iterations);
        assert!(matches!(
            options.validate(),
            Err(TapestryError::Validation { .. })
        ));
    }

    #[test]
    fn test_invalid_confidence_threshold() {
        let options = AnswerOptions::default().with_confidence_threshold(1.2);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_retrieval_limit() {
        let options = AnswerOptions::default().with_retrieval_limit(51);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_graph_depth() {
        let options = AnswerOptions::default().with_graph_depth(6);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_retrieval_options_projection() {
        let options = AnswerOptions::default()
            .with_retrieval_limit(8)
            .with_similarity_threshold(0.6)
            .with_graph_depth(2);

        let retrieval = options.retrieval_options();
        assert_eq!(retrieval.limit, 8);
        assert_eq!(retrieval.threshold, 0.6);
        assert_eq!(retrieval.graph_depth, 2);
    }
}
