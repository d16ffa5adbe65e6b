//! The iterative retrieval controller.
//!
//! This is the central state machine of the engine:
//! `RETRIEVING → EVALUATING → (REFINING → RETRIEVING) | DONE`.
//!
//! Each call owns one [`RetrievalSession`] for its full duration. Evidence
//! accumulates monotonically across passes, deduplicated by source id; the
//! loop terminates on sufficient confidence, on an exhausted iteration
//! budget, or immediately when the store yields nothing at all. Upstream
//! failures mid-loop never discard accumulated evidence: the controller
//! falls through to finalization with whatever it has already gathered.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use serde::Serialize;

use tapestry_core::{
    config::{AnswerOptions, RetrievalOptions},
    traits::{ChatModel, Embedder, GraphStore, VectorIndex},
    Evaluation, Evidence, Result, SourceRef, TapestryError,
};

use crate::context::ContextBuilder;
use crate::evaluator::RetrievalEvaluator;
use crate::prompts;
use crate::refiner::QueryRefiner;
use crate::strategy::{HybridStrategy, RetrievalStrategy, VectorStrategy};

/// Factor applied to the per-pass limit during iterative passes.
///
/// Iterative passes intentionally over-fetch so deduplication and evaluation
/// have material to work with. Tunable, not load-bearing.
pub const ITERATIVE_LIMIT_FACTOR: usize = 2;

/// Factor applied to the similarity threshold during iterative passes.
pub const ITERATIVE_THRESHOLD_FACTOR: f32 = 0.9;

/// Answer returned when single-pass retrieval finds nothing.
const NO_EVIDENCE_ANSWER: &str = "No relevant documents found in the knowledge base.";

/// Answer returned when iterative retrieval finds nothing.
const NO_EVIDENCE_ITERATIVE_ANSWER: &str =
    "No relevant documents found in the knowledge base after iterative search.";

/// Outcome of one retrieval run: the generated answer plus provenance and
/// retrieval metadata.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalReport {
    /// The generated answer, or the explicit no-evidence message.
    pub answer: String,

    /// Provenance of the evidence behind the answer, capped at the
    /// requested retrieval limit.
    pub sources: Vec<SourceRef>,

    /// Retrieval-method label (`vector`, `hybrid`, `iterative-vector`,
    /// `iterative-hybrid`).
    pub method: String,

    /// Number of passes performed, present for iterative runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,

    /// Total evidence volume retrieved across all passes, before the final
    /// cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_retrieved: Option<usize>,
}

impl RetrievalReport {
    /// Whether the run produced any evidence at all.
    #[must_use]
    pub fn found_evidence(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Transient per-query state, owned exclusively by the controller.
///
/// Created at the start of a retrieval-augmented query and discarded once a
/// final answer is produced; never persisted, never shared.
#[derive(Debug)]
struct RetrievalSession {
    id: Uuid,
    original_query: String,
    current_query: String,
    seen_source_ids: HashSet<String>,
    accumulated: Vec<Evidence>,
    iteration: usize,
    last_evaluation: Option<Evaluation>,
}

impl RetrievalSession {
    fn new(query: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_query: query.to_string(),
            current_query: query.to_string(),
            seen_source_ids: HashSet::new(),
            accumulated: Vec::new(),
            iteration: 0,
            last_evaluation: None,
        }
    }

    /// Append results whose source id has not been seen, growing the seen
    /// set. Returns how many results were new.
    fn absorb(&mut self, results: Vec<Evidence>) -> usize {
        let mut added = 0;
        for result in results {
            if self.seen_source_ids.insert(result.source_id.clone()) {
                self.accumulated.push(result);
                added += 1;
            }
        }
        added
    }
}

/// The iterative retrieval controller.
///
/// Combines strategies, evaluator, and refiner under an iteration and
/// confidence budget, and produces the final answer from the accumulated
/// evidence.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tapestry_retrieval::controller::RetrievalController;
/// use tapestry_core::prelude::*;
///
/// # async fn example(
/// #     embedder: Arc<dyn Embedder>,
/// #     index: Arc<dyn VectorIndex>,
/// #     model: Arc<dyn ChatModel>,
/// # ) -> Result<()> {
/// let controller = RetrievalController::builder()
///     .embedder(embedder)
///     .vector_index(index)
///     .chat_model(model)
///     .build()?;
///
/// let options = AnswerOptions::default().with_hybrid(false);
/// let report = controller.run("How is failover handled?", &options).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RetrievalController {
    embedder: Arc<dyn Embedder>,
    model: Arc<dyn ChatModel>,
    vector: VectorStrategy,
    hybrid: Option<HybridStrategy>,
    evaluator: RetrievalEvaluator,
    refiner: QueryRefiner,
    context: ContextBuilder,
}

impl RetrievalController {
    /// Create a builder for constructing controllers.
    #[must_use]
    pub fn builder() -> RetrievalControllerBuilder {
        RetrievalControllerBuilder::new()
    }

    /// Run one retrieval-augmented query.
    ///
    /// Dispatches to the iterative loop or the single-pass degenerate case
    /// according to `options.use_iterative`.
    ///
    /// # Errors
    ///
    /// Returns an error only when an upstream call fails before any
    /// evidence has been gathered, or when the final answer generation
    /// fails; mid-loop failures finalize with accumulated evidence instead.
    #[instrument(skip(self, options), fields(iterative = options.use_iterative))]
    pub async fn run(&self, query: &str, options: &AnswerOptions) -> Result<RetrievalReport> {
        if options.use_iterative {
            self.run_iterative(query, options).await
        } else {
            self.run_single_pass(query, options).await
        }
    }

    /// Resolve the strategy for this run.
    ///
    /// Hybrid falls back to vector-only when no graph store was configured.
    fn resolve_strategy(&self, use_hybrid: bool) -> (&dyn RetrievalStrategy, bool) {
        if use_hybrid {
            if let Some(hybrid) = &self.hybrid {
                return (hybrid, true);
            }
            warn!("hybrid retrieval requested but no graph store configured; using vector");
        }
        (&self.vector, false)
    }

    /// One embed-then-retrieve pass.
    async fn retrieve_pass(
        &self,
        strategy: &dyn RetrievalStrategy,
        query: &str,
        options: &RetrievalOptions,
    ) -> Result<Vec<Evidence>> {
        let embedding = self.embedder.embed(query).await?;
        strategy.retrieve(query, &embedding, options).await
    }

    /// Single-pass retrieval: one fetch at the requested limit/threshold,
    /// no evaluation, no refinement.
    async fn run_single_pass(
        &self,
        query: &str,
        options: &AnswerOptions,
    ) -> Result<RetrievalReport> {
        let (strategy, hybrid_active) = self.resolve_strategy(options.use_hybrid);
        let results = self
            .retrieve_pass(strategy, query, &options.retrieval_options())
            .await?;

        if results.is_empty() {
            info!("single-pass retrieval found no evidence");
            return Ok(RetrievalReport {
                answer: NO_EVIDENCE_ANSWER.to_string(),
                sources: Vec::new(),
                method: strategy.name().to_string(),
                iterations: None,
                total_retrieved: None,
            });
        }

        let context_text = self.context.build_context_text(&results, hybrid_active);
        let answer = self
            .model
            .ask(&prompts::answer_system(&context_text), query)
            .await?;

        Ok(RetrievalReport {
            answer,
            sources: self.context.format_sources(&results),
            method: strategy.name().to_string(),
            iterations: None,
            total_retrieved: None,
        })
    }

    /// The iterative loop: retrieve, deduplicate, evaluate, refine, repeat
    /// within the iteration budget.
    async fn run_iterative(
        &self,
        query: &str,
        options: &AnswerOptions,
    ) -> Result<RetrievalReport> {
        let (strategy, hybrid_active) = self.resolve_strategy(options.use_hybrid);
        let mut session = RetrievalSession::new(query);
        debug!(session_id = %session.id, "starting iterative retrieval");

        // Iterative passes widen the net; the final answer is built from the
        // originally requested limit.
        let widened = RetrievalOptions {
            limit: options.retrieval_limit * ITERATIVE_LIMIT_FACTOR,
            threshold: options.similarity_threshold * ITERATIVE_THRESHOLD_FACTOR,
            graph_depth: options.graph_depth,
        };
        let context_cap = options.retrieval_limit * ITERATIVE_LIMIT_FACTOR;
        let mut previous_context = String::new();

        while session.iteration < options.max_iterations {
            session.iteration += 1;

            let fresh = match self
                .retrieve_pass(strategy, &session.current_query, &widened)
                .await
            {
                Ok(results) => results,
                Err(err) if session.accumulated.is_empty() => return Err(err),
                Err(err) => {
                    warn!(
                        session_id = %session.id,
                        iteration = session.iteration,
                        error = %err,
                        "retrieval pass failed; finalizing with accumulated evidence"
                    );
                    break;
                }
            };

            let added = session.absorb(fresh);
            debug!(
                session_id = %session.id,
                iteration = session.iteration,
                added,
                accumulated = session.accumulated.len(),
                "absorbed retrieval pass"
            );

            if added == 0 && session.accumulated.is_empty() {
                info!(session_id = %session.id, "iterative retrieval found no evidence");
                return Ok(RetrievalReport {
                    answer: NO_EVIDENCE_ITERATIVE_ANSWER.to_string(),
                    sources: Vec::new(),
                    method: format!("iterative-{}", strategy.name()),
                    iterations: Some(session.iteration),
                    total_retrieved: Some(0),
                });
            }

            // The last permitted pass goes straight to finalization.
            if session.iteration >= options.max_iterations {
                break;
            }

            let capped = session.accumulated.len().min(context_cap);
            let context_text = self
                .context
                .build_context_text(&session.accumulated[..capped], hybrid_active);

            let evaluation = match self
                .evaluator
                .evaluate(&session.original_query, &context_text, &previous_context)
                .await
            {
                Ok(evaluation) => evaluation,
                Err(err) => {
                    warn!(
                        session_id = %session.id,
                        error = %err,
                        "evaluation failed; finalizing with accumulated evidence"
                    );
                    break;
                }
            };
            session.last_evaluation = Some(evaluation.clone());

            if evaluation.is_sufficient(options.confidence_threshold) {
                debug!(
                    session_id = %session.id,
                    confidence = evaluation.confidence,
                    "sufficient evidence gathered"
                );
                break;
            }

            if evaluation.needs_refinement {
                match self
                    .refiner
                    .refine(&session.original_query, &context_text, &evaluation)
                    .await
                {
                    Ok(refined) => session.current_query = refined,
                    Err(err) => {
                        warn!(
                            session_id = %session.id,
                            error = %err,
                            "refinement failed; finalizing with accumulated evidence"
                        );
                        break;
                    }
                }
            }
            // Low confidence without a refinement signal keeps the same
            // query and gathers more of the same.
            previous_context = context_text;
        }

        self.finalize(&session, strategy.name(), hybrid_active, options)
            .await
    }

    /// Generate the final answer from the accumulated evidence.
    async fn finalize(
        &self,
        session: &RetrievalSession,
        strategy_name: &str,
        hybrid_active: bool,
        options: &AnswerOptions,
    ) -> Result<RetrievalReport> {
        let method = format!("iterative-{strategy_name}");

        if session.accumulated.is_empty() {
            return Ok(RetrievalReport {
                answer: NO_EVIDENCE_ITERATIVE_ANSWER.to_string(),
                sources: Vec::new(),
                method,
                iterations: Some(session.iteration),
                total_retrieved: Some(0),
            });
        }

        if let Some(evaluation) = &session.last_evaluation {
            debug!(
                session_id = %session.id,
                confidence = evaluation.confidence,
                "finalizing after evaluation"
            );
        }

        let final_count = session.accumulated.len().min(options.retrieval_limit);
        let final_slice = &session.accumulated[..final_count];
        let context_text = self.context.build_context_text(final_slice, hybrid_active);

        let answer = self
            .model
            .ask(
                &prompts::iterative_answer_system(&context_text),
                &session.original_query,
            )
            .await?;

        info!(
            session_id = %session.id,
            iterations = session.iteration,
            total_retrieved = session.accumulated.len(),
            "iterative retrieval complete"
        );

        Ok(RetrievalReport {
            answer,
            sources: self.context.format_sources(final_slice),
            method,
            iterations: Some(session.iteration),
            total_retrieved: Some(session.accumulated.len()),
        })
    }
}

/// Builder for creating retrieval controllers.
#[derive(Debug, Default)]
pub struct RetrievalControllerBuilder {
    embedder: Option<Arc<dyn Embedder>>,
    vector_index: Option<Arc<dyn VectorIndex>>,
    graph_store: Option<Arc<dyn GraphStore>>,
    chat_model: Option<Arc<dyn ChatModel>>,
}

impl RetrievalControllerBuilder {
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

    /// Set the graph store, enabling hybrid retrieval.
    #[must_use]
    pub fn graph_store(mut self, graph_store: Arc<dyn GraphStore>) -> Self {
        self.graph_store = Some(graph_store);
        self
    }

    /// Set the chat model used for judgments and final answers.
    #[must_use]
    pub fn chat_model(mut self, chat_model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(chat_model);
        self
    }

    /// Build the controller.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the embedder, vector index, or
    /// chat model is missing. The graph store is optional; without it,
    /// hybrid requests fall back to vector-only retrieval.
    pub fn build(self) -> Result<RetrievalController> {
        let embedder = self.embedder.ok_or_else(|| TapestryError::Configuration {
            message: "Embedder is required".to_string(),
        })?;
        let vector_index = self
            .vector_index
            .ok_or_else(|| TapestryError::Configuration {
                message: "Vector index is required".to_string(),
            })?;
        let chat_model = self
            .chat_model
            .ok_or_else(|| TapestryError::Configuration {
                message: "Chat model is required".to_string(),
            })?;

        let vector = VectorStrategy::new(Arc::clone(&vector_index));
        let hybrid = self
            .graph_store
            .map(|graph| HybridStrategy::new(Arc::clone(&vector_index), graph));

        Ok(RetrievalController {
            embedder,
            model: Arc::clone(&chat_model),
            vector,
            hybrid,
            evaluator: RetrievalEvaluator::new(Arc::clone(&chat_model)),
            refiner: QueryRefiner::new(chat_model),
            context: ContextBuilder::new(),
        })
    }
}
