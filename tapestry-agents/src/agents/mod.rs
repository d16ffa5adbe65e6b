//! Capability agents.
//!
//! Each agent implements one capability behind the shared [`Agent`]
//! interface; the executor dispatches over the closed set of kinds the
//! router can select.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AgentKind, AgentResult, ExecutionContext};

mod data;
mod direct;
mod graph;
mod retrieval;

pub use data::DataProcessingAgent;
pub use direct::DirectResponseAgent;
pub use graph::KnowledgeGraphAgent;
pub use retrieval::RetrievalAgent;

/// A capability unit invoked by the router/executor.
#[async_trait]
pub trait Agent: Send + Sync + std::fmt::Debug {
    /// Which kind of agent this is.
    fn kind(&self) -> AgentKind;

    /// Execute this agent against the shared, read-only request context.
    ///
    /// # Errors
    ///
    /// Returns an error when the agent cannot produce a result; the
    /// executor logs and skips failed agents so one failure never blocks
    /// the others from contributing.
    async fn execute(
        &self,
        prompt: &str,
        data: Option<&serde_json::Value>,
        context: &ExecutionContext,
    ) -> Result<AgentResult>;
}
