//! The knowledge graph agent.
//!
//! Pairs a model analysis of the request with a keyword-routed graph
//! operation: entity search, neighborhood lookup by entity reference, or
//! graph statistics. Operation failures degrade to an explanatory message
//! inside the report rather than failing the agent.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tapestry_core::{
    traits::{ChatModel, GraphStore},
    Result as CoreResult,
};

use crate::agents::Agent;
use crate::error::Result;
use crate::prompts;
use crate::types::{AgentKind, AgentResult, ExecutionContext, GraphReport};

/// Maximum entities returned by a search operation.
const ENTITY_SEARCH_LIMIT: usize = 10;

/// Traversal depth for neighborhood lookups issued by this agent.
const NEIGHBORHOOD_DEPTH: usize = 2;

/// Queries and explains entity relationships.
#[derive(Debug)]
pub struct KnowledgeGraphAgent {
    model: Arc<dyn ChatModel>,
    graph: Arc<dyn GraphStore>,
}

impl KnowledgeGraphAgent {
    /// Create a knowledge graph agent.
    pub fn new(model: Arc<dyn ChatModel>, graph: Arc<dyn GraphStore>) -> Self {
        Self { model, graph }
    }

    /// Run the graph operation the prompt asks for, degrading errors to an
    /// explanatory summary.
    async fn run_operation(&self, prompt: &str) -> (String, Option<serde_json::Value>) {
        match self.try_operation(prompt).await {
            Ok(Some(value)) => {
                let summary = serde_json::to_string_pretty(&value)
                    .unwrap_or_else(|_| value.to_string());
                (summary, Some(value))
            }
            Ok(None) => (
                "Please provide more specific graph query details (search term, entity \
                 reference, or stats)."
                    .to_string(),
                None,
            ),
            Err(err) => (format!("Error executing graph operation: {err}"), None),
        }
    }

    /// Keyword-routed dispatch over the graph store operations.
    async fn try_operation(&self, prompt: &str) -> CoreResult<Option<serde_json::Value>> {
        let lower = prompt.to_lowercase();

        if lower.contains("search") || lower.contains("find") {
            let term = strip_search_keywords(prompt);
            debug!(term = %term, "searching graph entities");
            let entities = self
                .graph
                .search_entities(&term, ENTITY_SEARCH_LIMIT)
                .await?;
            return Ok(Some(serde_json::to_value(entities)?));
        }

        if lower.contains("relationship") || lower.contains("connected") {
            if let Some(entity_id) = extract_entity_reference(prompt) {
                debug!(entity_id = %entity_id, "fetching entity neighborhood");
                let neighborhood = self.graph.neighbors(&entity_id, NEIGHBORHOOD_DEPTH).await?;
                return Ok(Some(serde_json::to_value(neighborhood)?));
            }
        }

        if lower.contains("stats") || lower.contains("statistics") {
            return Ok(Some(self.graph.stats().await?));
        }

        Ok(None)
    }
}

#[async_trait]
impl Agent for KnowledgeGraphAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::KnowledgeGraph
    }

    async fn execute(
        &self,
        prompt: &str,
        _data: Option<&serde_json::Value>,
        context: &ExecutionContext,
    ) -> Result<AgentResult> {
        let analysis = self
            .model
            .ask(
                &prompts::graph_analysis_system(context.options.chat_type),
                prompt,
            )
            .await?;

        let (summary, graph_data) = self.run_operation(prompt).await;

        Ok(AgentResult::KnowledgeGraph(GraphReport {
            answer: format!("{analysis}\n\nGraph query result:\n{summary}"),
            graph_data,
        }))
    }
}

/// Drop the query keywords from a search request, leaving the search term.
fn strip_search_keywords(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .filter(|word| {
            let bare: String = word
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_lowercase();
            !matches!(
                bare.as_str(),
                "search" | "find" | "for" | "entity" | "entities" | "node" | "nodes"
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the token following an `entity:`/`entity <id>` reference.
fn extract_entity_reference(prompt: &str) -> Option<String> {
    const KEYWORD: &[u8] = b"entity";
    let bytes = prompt.as_bytes();
    let mut offset = 0;

    while offset + KEYWORD.len() <= bytes.len() {
        let found = bytes[offset..]
            .windows(KEYWORD.len())
            .position(|window| window.eq_ignore_ascii_case(KEYWORD))?;
        let after = offset + found + KEYWORD.len();
        let tail = &prompt[after..];

        if tail.starts_with(':') || tail.starts_with(char::is_whitespace) {
            let candidate = tail.trim_start().trim_start_matches(':').trim_start();
            if let Some(token) = candidate.split_whitespace().next() {
                let token = token.trim_end_matches(['.', ',', '?', '!']);
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }

        offset = after;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_search_keywords() {
        assert_eq!(
            strip_search_keywords("search for billing entities"),
            "billing"
        );
        assert_eq!(strip_search_keywords("find Payment Gateway"), "Payment Gateway");
    }

    #[test]
    fn test_extract_entity_reference_with_colon() {
        assert_eq!(
            extract_entity_reference("show relationships for entity: svc-42"),
            Some("svc-42".to_string())
        );
    }

    #[test]
    fn test_extract_entity_reference_with_space() {
        assert_eq!(
            extract_entity_reference("what is connected to entity payments?"),
            Some("payments".to_string())
        );
    }

    #[test]
    fn test_extract_entity_reference_ignores_plural() {
        // "entities" is not an "entity <id>" reference.
        assert_eq!(
            extract_entity_reference("list entities connected together"),
            None
        );
    }

    #[test]
    fn test_extract_entity_reference_absent() {
        assert_eq!(extract_entity_reference("how are these connected?"), None);
        assert_eq!(extract_entity_reference("tail word entity"), None);
    }
}
