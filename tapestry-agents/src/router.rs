//! The agent router.
//!
//! One generation call classifies a request into the set of capability
//! agents to invoke. Routing never fails: an unparsable or missing decision
//! resolves to the direct-response default so an unroutable request still
//! gets an answer.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use tapestry_core::{config::ChatType, structured::parse_structured_or, traits::ChatModel};

use crate::prompts;
use crate::types::{AgentKind, DataProcessingMode, RoutingDecision};

/// Raw routing shape as emitted by the model.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRouting {
    #[serde(default)]
    agents: Option<serde_json::Value>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    data_processing: Option<String>,
}

/// Classifies requests into capability agents.
#[derive(Debug)]
pub struct RouterAgent {
    model: Arc<dyn ChatModel>,
}

impl RouterAgent {
    /// Create a router backed by the given chat model.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Route a request.
    ///
    /// Infallible by contract: generation failures and unparsable output
    /// both resolve to [`RoutingDecision::direct_response`].
    #[instrument(skip_all, fields(has_data = has_data))]
    pub async fn route(
        &self,
        prompt: &str,
        has_data: bool,
        chat_type: ChatType,
    ) -> RoutingDecision {
        let user = prompts::router_user(prompt, has_data, chat_type);

        let response = match self.model.ask(prompts::ROUTER_SYSTEM, &user).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "routing call failed; using default routing");
                return RoutingDecision::direct_response();
            }
        };

        let decision = Self::parse(&response);
        debug!(agents = ?decision.agents, "parsed routing decision");
        decision
    }

    /// Parse a routing decision out of free-form model text.
    ///
    /// An unextractable decision and a decision naming no agents both
    /// resolve to the direct-response default.
    fn parse(text: &str) -> RoutingDecision {
        let raw = parse_structured_or(text, RawRouting::default());

        let agents: Vec<AgentKind> = match raw.agents {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(AgentKind::parse)
                .collect(),
            Some(serde_json::Value::String(token)) => vec![AgentKind::parse(&token)],
            _ => Vec::new(),
        };

        if agents.is_empty() {
            debug!("no agents in routing response; using default routing");
            return RoutingDecision::direct_response();
        }

        RoutingDecision {
            agents,
            reasoning: raw
                .reasoning
                .unwrap_or_else(|| "Routed by model".to_string()),
            data_mode: raw
                .data_processing
                .as_deref()
                .map_or(DataProcessingMode::None, DataProcessingMode::parse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_decision() {
        let text = r#"{"agents": ["RAG_AGENT", "KNOWLEDGE_GRAPH_AGENT"], "reasoning": "needs docs and graph", "dataProcessing": "none"}"#;
        let decision = RouterAgent::parse(text);
        assert_eq!(
            decision.agents,
            vec![AgentKind::Retrieval, AgentKind::KnowledgeGraph]
        );
        assert_eq!(decision.data_mode, DataProcessingMode::None);
    }

    #[test]
    fn test_parse_normalizes_token_case() {
        let text = r#"{"agents": ["rag_agent"]}"#;
        let decision = RouterAgent::parse(text);
        assert_eq!(decision.agents, vec![AgentKind::Retrieval]);
    }

    #[test]
    fn test_parse_preserves_unknown_tokens() {
        let text = r#"{"agents": ["RAG_AGENT", "TranslationAgent"]}"#;
        let decision = RouterAgent::parse(text);
        assert_eq!(decision.agents.len(), 2);
        assert_eq!(
            decision.agents[1],
            AgentKind::Other("TranslationAgent".to_string())
        );
    }

    #[test]
    fn test_parse_garbage_defaults_to_direct() {
        let decision = RouterAgent::parse("I would route this to the docs team.");
        assert!(decision.is_direct());
    }

    #[test]
    fn test_parse_empty_agent_list_defaults_to_direct() {
        let decision = RouterAgent::parse(r#"{"agents": [], "reasoning": "unsure"}"#);
        assert!(decision.is_direct());
    }

    #[test]
    fn test_parse_single_string_agent() {
        let decision = RouterAgent::parse(r#"{"agents": "DATA_PROCESSING_AGENT", "dataProcessing": "both"}"#);
        assert_eq!(decision.agents, vec![AgentKind::DataProcessing]);
        assert_eq!(decision.data_mode, DataProcessingMode::Both);
    }

    #[test]
    fn test_parse_decision_embedded_in_prose() {
        let text = "Based on the request, here is my decision:\n{\"agents\": [\"DIRECT_RESPONSE\"], \"reasoning\": \"simple question\"}\nDone.";
        let decision = RouterAgent::parse(text);
        assert!(decision.is_direct());
        assert_eq!(decision.reasoning, "simple question");
    }
}
