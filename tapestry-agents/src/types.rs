//! Core types for the agents layer: agent kinds, routing decisions, agent
//! results, and the per-request execution context.

use serde::{Serialize, Serializer};

use tapestry_core::{config::AnswerOptions, ChatTurn, SourceRef, UserProfile};
use tapestry_retrieval::controller::RetrievalReport;

/// Canonical identifier of the retrieval agent.
pub const RETRIEVAL_AGENT_ID: &str = "RAG_AGENT";
/// Canonical identifier of the knowledge graph agent.
pub const KNOWLEDGE_GRAPH_AGENT_ID: &str = "KNOWLEDGE_GRAPH_AGENT";
/// Canonical identifier of the data processing agent.
pub const DATA_PROCESSING_AGENT_ID: &str = "DATA_PROCESSING_AGENT";
/// Canonical identifier of the direct response agent.
pub const DIRECT_RESPONSE_ID: &str = "DIRECT_RESPONSE";
/// Canonical identifier of the router agent.
pub const ROUTER_AGENT_ID: &str = "ROUTER_AGENT";

/// A capability agent kind.
///
/// The executor dispatches over the known kinds; tokens the router emits
/// that match no known kind are carried through as [`AgentKind::Other`] so a
/// novel agent name never silently vanishes from the decision, while gaining
/// no execution path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Document search and retrieval-augmented answering.
    Retrieval,
    /// Entity relationships and graph queries.
    KnowledgeGraph,
    /// Data transformation and analysis.
    DataProcessing,
    /// Plain model response without specialized processing.
    DirectResponse,
    /// The routing agent itself.
    Router,
    /// An agent token the router emitted that matches no known kind.
    Other(String),
}

impl AgentKind {
    /// Canonical identifier used in routing prompts and result labels.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Retrieval => RETRIEVAL_AGENT_ID,
            Self::KnowledgeGraph => KNOWLEDGE_GRAPH_AGENT_ID,
            Self::DataProcessing => DATA_PROCESSING_AGENT_ID,
            Self::DirectResponse => DIRECT_RESPONSE_ID,
            Self::Router => ROUTER_AGENT_ID,
            Self::Other(token) => token,
        }
    }

    /// Parse an agent token, case-normalizing against the known identifiers.
    ///
    /// Unrecognized tokens are preserved verbatim as [`AgentKind::Other`]
    /// rather than dropped.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let trimmed = token.trim();
        match trimmed.to_uppercase().as_str() {
            RETRIEVAL_AGENT_ID => Self::Retrieval,
            KNOWLEDGE_GRAPH_AGENT_ID => Self::KnowledgeGraph,
            DATA_PROCESSING_AGENT_ID => Self::DataProcessing,
            DIRECT_RESPONSE_ID => Self::DirectResponse,
            ROUTER_AGENT_ID => Self::Router,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

impl Serialize for AgentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

/// How the data processing agent should treat auxiliary data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataProcessingMode {
    /// Deterministic transformation without a model call.
    Programmatic,
    /// One model call over the serialized data.
    #[serde(rename = "model")]
    ModelAssisted,
    /// Programmatic transformation chained into a model call.
    Both,
    /// No data processing.
    #[default]
    None,
}

impl DataProcessingMode {
    /// Parse a mode token, defaulting to `None` for unknown values.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "programmatic" => Self::Programmatic,
            "model" => Self::ModelAssisted,
            "both" => Self::Both,
            _ => Self::None,
        }
    }
}

/// The router's decision for one request.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingDecision {
    /// Agents to invoke; never empty.
    pub agents: Vec<AgentKind>,

    /// Free-text explanation. Diagnostic only.
    pub reasoning: String,

    /// How auxiliary data should be processed.
    pub data_mode: DataProcessingMode,
}

impl RoutingDecision {
    /// The fallback decision used when routing cannot be determined:
    /// direct response only, no retrieval, no graph.
    #[must_use]
    pub fn direct_response() -> Self {
        Self {
            agents: vec![AgentKind::DirectResponse],
            reasoning: "Default routing".to_string(),
            data_mode: DataProcessingMode::None,
        }
    }

    /// Whether the decision calls for a direct response.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.agents.contains(&AgentKind::DirectResponse)
    }
}

/// Result of the knowledge graph agent.
#[derive(Debug, Clone, Serialize)]
pub struct GraphReport {
    /// Combined analysis and operation summary.
    pub answer: String,

    /// Raw graph payload behind the summary, when an operation ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_data: Option<serde_json::Value>,
}

/// Result of the data processing agent.
#[derive(Debug, Clone, Serialize)]
pub struct DataReport {
    /// Analysis text or processing summary.
    pub answer: String,

    /// Which processing mode ran.
    pub mode: DataProcessingMode,

    /// The transformed data, for programmatic modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<serde_json::Value>,
}

/// Result of the direct response agent.
#[derive(Debug, Clone, Serialize)]
pub struct DirectReport {
    /// The model's answer.
    pub answer: String,
}

/// A single agent's contribution to one request, tagged by agent kind.
#[derive(Debug, Clone, Serialize)]
pub enum AgentResult {
    /// Retrieval agent output.
    Retrieval(RetrievalReport),
    /// Knowledge graph agent output.
    KnowledgeGraph(GraphReport),
    /// Data processing agent output.
    DataProcessing(DataReport),
    /// Direct response output.
    Direct(DirectReport),
}

impl AgentResult {
    /// Which agent produced this result.
    #[must_use]
    pub fn kind(&self) -> AgentKind {
        match self {
            Self::Retrieval(_) => AgentKind::Retrieval,
            Self::KnowledgeGraph(_) => AgentKind::KnowledgeGraph,
            Self::DataProcessing(_) => AgentKind::DataProcessing,
            Self::Direct(_) => AgentKind::DirectResponse,
        }
    }

    /// The answer text carried by this result.
    #[must_use]
    pub fn answer(&self) -> &str {
        match self {
            Self::Retrieval(report) => &report.answer,
            Self::KnowledgeGraph(report) => &report.answer,
            Self::DataProcessing(report) => &report.answer,
            Self::Direct(report) => &report.answer,
        }
    }

    /// The inner report serialized as JSON, for synthesis.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let payload = match self {
            Self::Retrieval(report) => serde_json::to_value(report),
            Self::KnowledgeGraph(report) => serde_json::to_value(report),
            Self::DataProcessing(report) => serde_json::to_value(report),
            Self::Direct(report) => serde_json::to_value(report),
        };
        payload.unwrap_or(serde_json::Value::Null)
    }

    /// Borrow the retrieval report, if this is a retrieval result.
    #[must_use]
    pub fn as_retrieval(&self) -> Option<&RetrievalReport> {
        match self {
            Self::Retrieval(report) => Some(report),
            _ => None,
        }
    }
}

/// Retrieval metadata echoed in the response when retrieval ran.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalMetadata {
    /// Retrieval-method label.
    pub method: String,

    /// Number of passes performed, for iterative runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,

    /// Total evidence volume retrieved across all passes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_retrieved: Option<usize>,
}

/// The engine's response to one request.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    /// The final answer text.
    pub answer: String,

    /// Provenance of the evidence behind the answer.
    pub sources: Vec<SourceRef>,

    /// Agents that contributed to the answer.
    pub agents_used: Vec<AgentKind>,

    /// The routing decision that drove execution.
    pub routing: RoutingDecision,

    /// Retrieval metadata, present when retrieval ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<RetrievalMetadata>,
}

/// Read-only per-request context shared by every agent.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Resolved request options.
    pub options: AnswerOptions,

    /// Prior conversation turns, oldest first.
    pub chat_history: Vec<ChatTurn>,

    /// Profile of the requesting user.
    pub user_profile: Option<UserProfile>,
}

impl ExecutionContext {
    /// Create a context from validated options, with no history or profile.
    #[must_use]
    pub fn new(options: AnswerOptions) -> Self {
        Self {
            options,
            chat_history: Vec::new(),
            user_profile: None,
        }
    }

    /// Attach prior conversation turns.
    #[must_use]
    pub fn with_history(mut self, chat_history: Vec<ChatTurn>) -> Self {
        self.chat_history = chat_history;
        self
    }

    /// Attach a user profile.
    #[must_use]
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = Some(profile);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("rag_agent", AgentKind::Retrieval; "lowercase")]
    #[test_case("Knowledge_Graph_Agent", AgentKind::KnowledgeGraph; "mixed case")]
    #[test_case(" DIRECT_RESPONSE ", AgentKind::DirectResponse; "padded")]
    #[test_case("DATA_PROCESSING_AGENT", AgentKind::DataProcessing; "exact")]
    fn test_agent_kind_parse_normalizes_case(token: &str, expected: AgentKind) {
        assert_eq!(AgentKind::parse(token), expected);
    }

    #[test]
    fn test_unknown_agent_token_is_preserved() {
        let kind = AgentKind::parse("WeatherAgent");
        assert_eq!(kind, AgentKind::Other("WeatherAgent".to_string()));
        assert_eq!(kind.identifier(), "WeatherAgent");
    }

    #[test]
    fn test_data_processing_mode_parse() {
        assert_eq!(
            DataProcessingMode::parse("Programmatic"),
            DataProcessingMode::Programmatic
        );
        assert_eq!(
            DataProcessingMode::parse("model"),
            DataProcessingMode::ModelAssisted
        );
        assert_eq!(DataProcessingMode::parse("both"), DataProcessingMode::Both);
        assert_eq!(
            DataProcessingMode::parse("whatever"),
            DataProcessingMode::None
        );
    }

    #[test]
    fn test_default_routing_is_direct() {
        let decision = RoutingDecision::direct_response();
        assert!(decision.is_direct());
        assert_eq!(decision.agents.len(), 1);
    }

    #[test]
    fn test_agent_kind_serializes_as_identifier() {
        let serialized = serde_json::to_string(&AgentKind::Retrieval).unwrap();
        assert_eq!(serialized, "\"RAG_AGENT\"");
    }
}
