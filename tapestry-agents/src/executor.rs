//! The agent executor: fan-out over routed-and-enabled agents, fan-in of
//! their results.
//!
//! The executor is an aggregation point, not a fail-fast pipeline: agents
//! run independently and concurrently over the shared read-only context, and
//! one agent's failure never prevents the others from contributing.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::agents::Agent;
use crate::types::{AgentKind, AgentResult, ExecutionContext, RoutingDecision};

/// Runs the selected capability agents for one request.
#[derive(Debug)]
pub struct AgentExecutor {
    agents: Vec<Arc<dyn Agent>>,
}

impl AgentExecutor {
    /// Create an executor over the given agents.
    #[must_use]
    pub fn new(agents: Vec<Arc<dyn Agent>>) -> Self {
        Self { agents }
    }

    /// Whether an agent kind is enabled by the caller's feature flags.
    ///
    /// Routed agents whose flag is off are skipped; the data processing
    /// agent additionally requires auxiliary data to be present.
    fn is_enabled(kind: &AgentKind, context: &ExecutionContext, has_data: bool) -> bool {
        match kind {
            AgentKind::Retrieval => context.options.use_rag,
            AgentKind::KnowledgeGraph => context.options.use_graph,
            AgentKind::DataProcessing => context.options.process_data && has_data,
            AgentKind::DirectResponse | AgentKind::Router | AgentKind::Other(_) => false,
        }
    }

    /// The routed-and-enabled agent kinds for one request.
    #[must_use]
    pub fn agents_used(
        &self,
        routing: &RoutingDecision,
        context: &ExecutionContext,
        has_data: bool,
    ) -> Vec<AgentKind> {
        self.agents
            .iter()
            .map(|agent| agent.kind())
            .filter(|kind| {
                routing.agents.contains(kind) && Self::is_enabled(kind, context, has_data)
            })
            .collect()
    }

    /// Execute every routed-and-enabled agent concurrently and collect the
    /// successful results.
    ///
    /// Failed agents are logged and skipped. An empty return means nothing
    /// was routed and enabled, or everything failed; callers fall back to a
    /// direct response rather than returning an empty answer.
    #[instrument(skip_all, fields(routed = routing.agents.len()))]
    pub async fn execute(
        &self,
        prompt: &str,
        data: Option<&serde_json::Value>,
        routing: &RoutingDecision,
        context: &ExecutionContext,
    ) -> Vec<AgentResult> {
        let selected: Vec<&Arc<dyn Agent>> = self
            .agents
            .iter()
            .filter(|agent| {
                let kind = agent.kind();
                routing.agents.contains(&kind)
                    && Self::is_enabled(&kind, context, data.is_some())
            })
            .collect();

        debug!(selected = selected.len(), "executing agents");

        let tasks = selected.into_iter().map(|agent| async move {
            (agent.kind(), agent.execute(prompt, data, context).await)
        });

        join_all(tasks)
            .await
            .into_iter()
            .filter_map(|(kind, outcome)| match outcome {
                Ok(result) => Some(result),
                Err(err) => {
                    warn!(
                        agent = %kind,
                        error = %err,
                        "agent failed; continuing with remaining agents"
                    );
                    None
                }
            })
            .collect()
    }
}
