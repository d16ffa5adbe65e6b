//! Fixed instruction strings for the agent-side model calls.

use tapestry_core::config::ChatType;

/// System instruction for the routing call.
pub const ROUTER_SYSTEM: &str = r#"You are a routing agent that analyzes user requests and determines which specialized agents should handle them.

Available agents:
- RAG_AGENT: For document search, semantic queries, and knowledge retrieval
- KNOWLEDGE_GRAPH_AGENT: For entity relationships, graph queries, and knowledge graph operations
- DATA_PROCESSING_AGENT: For data transformation, analysis, and file operations
- DIRECT_RESPONSE: For simple questions that don't need specialized processing

Analyze the user's request and respond with a JSON object:
{
  "agents": ["AGENT_NAME"],
  "reasoning": "why these agents",
  "dataProcessing": "programmatic" | "model" | "both" | "none"
}"#;

/// System instruction for the result synthesis call.
pub const SYNTHESIS_SYSTEM: &str = "You are synthesizing results from multiple AI agents. \
Provide a coherent, comprehensive answer to the user's question based on all the information \
gathered.";

/// System instruction for direct responses.
pub const DIRECT_RESPONSE_SYSTEM: &str = "You are a helpful AI assistant.";

/// System instruction for the data analysis call.
pub const DATA_ANALYSIS_SYSTEM: &str = "You are a data analysis expert. Analyze the provided \
data and answer the user's question.";

/// Render the user message for a routing call.
#[must_use]
pub fn router_user(prompt: &str, has_data: bool, chat_type: ChatType) -> String {
    let has_data = if has_data { "yes" } else { "no" };
    format!(
        "Request: {prompt}\n\nData available: {has_data}\n\nChat type: {}",
        chat_type.as_str()
    )
}

/// Render the synthesis instruction with the labeled agent results.
#[must_use]
pub fn synthesis_system(results: &str) -> String {
    format!("{SYNTHESIS_SYSTEM}\n\nAgent Results:\n{results}")
}

/// Render the graph analysis instruction for the given chat type.
#[must_use]
pub fn graph_analysis_system(chat_type: ChatType) -> String {
    let write_capability = match chat_type {
        ChatType::Admin => "Create entities and relationships",
        ChatType::User => "View entities (read-only)",
    };

    format!(
        "You are a knowledge graph expert. Help users query and understand entity relationships.\n\n\
         Available operations:\n\
         - Search for entities\n\
         - Get entity details and relationships\n\
         - {write_capability}\n\n\
         Analyze the user's request and determine the best approach."
    )
}

/// Render the data analysis instruction with the serialized data.
#[must_use]
pub fn data_analysis_system(data: &str) -> String {
    format!("{DATA_ANALYSIS_SYSTEM}\n\nData:\n{data}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_user_renders_flags() {
        let rendered = router_user("summarize the outage", true, ChatType::Admin);
        assert!(rendered.contains("Data available: yes"));
        assert!(rendered.contains("Chat type: admin"));
    }

    #[test]
    fn test_graph_analysis_respects_chat_type() {
        assert!(graph_analysis_system(ChatType::Admin).contains("Create entities"));
        assert!(graph_analysis_system(ChatType::User).contains("read-only"));
    }
}
