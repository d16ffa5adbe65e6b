//! The orchestrator: the engine's single entry point.
//!
//! Validates options, routes the request, executes the selected agents, and
//! synthesizes their results, falling back to a direct response whenever
//! routing or execution yields nothing usable. A request never gets an empty
//! answer: unroutable requests and all-agents-failed requests both degrade
//! to the direct path.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use tapestry_core::{
    traits::{ChatModel, Embedder, GraphStore, VectorIndex},
    SourceRef, TapestryError,
};
use tapestry_retrieval::controller::RetrievalController;

use crate::agents::{
    Agent, DataProcessingAgent, DirectResponseAgent, KnowledgeGraphAgent, RetrievalAgent,
};
use crate::error::Result;
use crate::executor::AgentExecutor;
use crate::router::RouterAgent;
use crate::synthesizer::ResultSynthesizer;
use crate::types::{
    AgentKind, AgentResult, AnswerResponse, ExecutionContext, RetrievalMetadata,
};

/// Coordinates router, executor, and synthesizer for one request at a time.
#[derive(Debug)]
pub struct Orchestrator {
    router: RouterAgent,
    executor: AgentExecutor,
    synthesizer: ResultSynthesizer,
    direct: DirectResponseAgent,
}

impl Orchestrator {
    /// Create an orchestrator from already-constructed components.
    #[must_use]
    pub fn new(
        router: RouterAgent,
        executor: AgentExecutor,
        synthesizer: ResultSynthesizer,
        direct: DirectResponseAgent,
    ) -> Self {
        Self {
            router,
            executor,
            synthesizer,
            direct,
        }
    }

    /// Create a builder that wires the standard agents over collaborator
    /// implementations.
    #[must_use]
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Answer one request.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range options before any
    /// external call, and surfaces generation errors only when even the
    /// direct-response fallback cannot produce an answer.
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    pub async fn answer(
        &self,
        prompt: &str,
        data: Option<serde_json::Value>,
        context: ExecutionContext,
    ) -> Result<AnswerResponse> {
        context.options.validate()?;

        let routing = self
            .router
            .route(prompt, data.is_some(), context.options.chat_type)
            .await;
        info!(agents = ?routing.agents, reasoning = %routing.reasoning, "routing decision");

        let mut agents_used: Vec<AgentKind> = Vec::new();
        let mut results: Vec<AgentResult> = Vec::new();

        let answer = if routing.is_direct() {
            agents_used.push(AgentKind::DirectResponse);
            self.direct_answer(prompt, &context).await?
        } else {
            results = self
                .executor
                .execute(prompt, data.as_ref(), &routing, &context)
                .await;

            if results.is_empty() {
                // Nothing was routed and enabled, or everything failed.
                agents_used.push(AgentKind::DirectResponse);
                self.direct_answer(prompt, &context).await?
            } else {
                agents_used = self
                    .executor
                    .agents_used(&routing, &context, data.is_some());

                match self.synthesizer.synthesize(prompt, &results).await {
                    Ok(answer) => answer,
                    Err(err) => {
                        warn!(error = %err, "synthesis failed; falling back to direct response");
                        agents_used.push(AgentKind::DirectResponse);
                        self.direct_answer(prompt, &context).await?
                    }
                }
            }
        };

        let (retrieval, sources) = extract_retrieval_metadata(&results);

        Ok(AnswerResponse {
            answer,
            sources,
            agents_used,
            routing,
            retrieval,
        })
    }

    /// Produce a direct response without specialized agents.
    async fn direct_answer(&self, prompt: &str, context: &ExecutionContext) -> Result<String> {
        let result = self.direct.execute(prompt, None, context).await?;
        Ok(result.answer().to_string())
    }
}

/// Pull retrieval metadata and sources out of the collected agent results.
fn extract_retrieval_metadata(
    results: &[AgentResult],
) -> (Option<RetrievalMetadata>, Vec<SourceRef>) {
    for result in results {
        if let Some(report) = result.as_retrieval() {
            return (
                Some(RetrievalMetadata {
                    method: report.method.clone(),
                    iterations: report.iterations,
                    total_retrieved: report.total_retrieved,
                }),
                report.sources.clone(),
            );
        }
    }
    (None, Vec::new())
}

/// Builder wiring the standard agent set over collaborator implementations.
#[derive(Debug, Default)]
pub struct OrchestratorBuilder {
    embedder: Option<Arc<dyn Embedder>>,
    vector_index: Option<Arc<dyn VectorIndex>>,
    graph_store: Option<Arc<dyn GraphStore>>,
    chat_model: Option<Arc<dyn ChatModel>>,
}

impl OrchestratorBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the embedder.
    #[must_use]
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index.
    #[must_use]
    pub fn vector_index(mut self, vector_index: Arc<dyn VectorIndex>) -> Self {
        self.vector_index = Some(vector_index);
        self
    }

    /// Set the graph store, enabling hybrid retrieval and the knowledge
    /// graph agent.
    #[must_use]
    pub fn graph_store(mut self, graph_store: Arc<dyn GraphStore>) -> Self {
        self.graph_store = Some(graph_store);
        self
    }

    /// Set the chat model shared by every LLM-backed component.
    #[must_use]
    pub fn chat_model(mut self, chat_model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(chat_model);
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the embedder, vector index, or
    /// chat model is missing. The graph store is optional; without it the
    /// knowledge graph agent is not registered and hybrid retrieval falls
    /// back to vector-only.
    pub fn build(self) -> Result<Orchestrator> {
        let model = self
            .chat_model
            .ok_or_else(|| TapestryError::Configuration {
                message: "Chat model is required".to_string(),
            })?;
        let embedder = self.embedder.ok_or_else(|| TapestryError::Configuration {
            message: "Embedder is required".to_string(),
        })?;
        let vector_index = self
            .vector_index
            .ok_or_else(|| TapestryError::Configuration {
                message: "Vector index is required".to_string(),
            })?;

        let mut controller_builder = RetrievalController::builder()
            .embedder(embedder)
            .vector_index(vector_index)
            .chat_model(Arc::clone(&model));
        if let Some(graph) = &self.graph_store {
            controller_builder = controller_builder.graph_store(Arc::clone(graph));
        }
        let controller = controller_builder.build()?;

        let mut agents: Vec<Arc<dyn Agent>> = vec![Arc::new(RetrievalAgent::new(controller))];
        if let Some(graph) = self.graph_store {
            agents.push(Arc::new(KnowledgeGraphAgent::new(
                Arc::clone(&model),
                graph,
            )));
        }
        agents.push(Arc::new(DataProcessingAgent::new(Arc::clone(&model))));

        Ok(Orchestrator {
            router: RouterAgent::new(Arc::clone(&model)),
            executor: AgentExecutor::new(agents),
            synthesizer: ResultSynthesizer::new(Arc::clone(&model)),
            direct: DirectResponseAgent::new(model),
        })
    }
}
