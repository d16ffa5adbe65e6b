//! Behavioral tests for the iterative retrieval controller.
//!
//! These tests drive the controller with scripted collaborators: a static
//! embedder, a vector index that replays predefined passes, and a chat model
//! that replays predefined responses. Evaluator, refiner, and answer calls
//! are told apart by their system instructions.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tapestry_core::prelude::*;
use tapestry_retrieval::prelude::*;

#[derive(Debug)]
struct StaticEmbedder;

#[async_trait]
impl Embedder for StaticEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.1, 0.2, 0.3])
    }

    fn dimension(&self) -> usize {
        3
    }

    fn model_name(&self) -> &str {
        "static-embedder"
    }
}

/// Vector index that replays one scripted outcome per search call.
#[derive(Debug)]
struct ScriptedIndex {
    passes: Mutex<VecDeque<Result<Vec<VectorHit>>>>,
    calls: Mutex<usize>,
}

impl ScriptedIndex {
    fn new(passes: Vec<Result<Vec<VectorHit>>>) -> Self {
        Self {
            passes: Mutex::new(passes.into_iter().collect()),
            calls: Mutex::new(0),
        }
    }

    fn search_calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl VectorIndex for ScriptedIndex {
    async fn search(
        &self,
        _embedding: &[f32],
        _limit: usize,
        _threshold: f32,
    ) -> Result<Vec<VectorHit>> {
        *self.calls.lock().unwrap() += 1;
        self.passes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Chat model that replays scripted responses and records its calls.
#[derive(Debug)]
struct ScriptedModel {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(ToString::to_string).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls_matching(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|system| system.contains(needle))
            .count()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn generate(&self, system: &str, _turns: &[ChatTurn]) -> Result<String> {
        self.calls.lock().unwrap().push(system.to_string());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "scripted answer".to_string()))
    }
}

const EVALUATOR_MARKER: &str = "retrieval quality evaluator";
const REFINER_MARKER: &str = "query refinement expert";

fn hit(id: &str, score: f32) -> VectorHit {
    VectorHit {
        source_id: id.to_string(),
        title: Some(format!("Title {id}")),
        content: format!("content of {id}"),
        score,
        origin: None,
    }
}

fn controller(
    index: Arc<ScriptedIndex>,
    model: Arc<ScriptedModel>,
) -> RetrievalController {
    RetrievalController::builder()
        .embedder(Arc::new(StaticEmbedder))
        .vector_index(index)
        .chat_model(model)
        .build()
        .unwrap()
}

fn iterative_options(max_iterations: usize) -> AnswerOptions {
    AnswerOptions::default()
        .with_hybrid(false)
        .with_iterative(true)
        .with_max_iterations(max_iterations)
}

const LOW_CONFIDENCE_REFINE: &str =
    r#"{"confidence": 0.3, "needsRefinement": true, "missingInformation": "specifics", "reasoning": "thin context"}"#;
const LOW_CONFIDENCE_CONTINUE: &str =
    r#"{"confidence": 0.4, "needsRefinement": false, "reasoning": "partial"}"#;
const HIGH_CONFIDENCE: &str = r#"{"confidence": 0.9, "needsRefinement": false}"#;

#[tokio::test]
async fn stale_second_pass_stops_once_confident() {
    // Scenario: pass 1 returns three ids, the refined pass 2 returns the
    // same three. Pass 2 contributes nothing new, and once confidence
    // clears the threshold no third pass may run.
    let pass = vec![hit("a", 0.9), hit("b", 0.8), hit("c", 0.7)];
    let index = Arc::new(ScriptedIndex::new(vec![
        Ok(pass.clone()),
        Ok(pass),
        Ok(vec![hit("d", 0.9)]),
    ]));
    let model = Arc::new(ScriptedModel::new(&[
        LOW_CONFIDENCE_REFINE,
        "narrower query about specifics",
        HIGH_CONFIDENCE,
        "final synthesized answer",
    ]));

    let controller = controller(Arc::clone(&index), Arc::clone(&model));
    let report = controller
        .run("original question", &iterative_options(3))
        .await
        .unwrap();

    assert_eq!(index.search_calls(), 2, "must not retrieve a third time");
    assert_eq!(report.iterations, Some(2));
    assert_eq!(report.total_retrieved, Some(3));
    assert_eq!(report.answer, "final synthesized answer");
    assert_eq!(report.method, "iterative-vector");
}

#[tokio::test]
async fn dedup_invariant_no_source_id_twice() {
    // Passes overlap heavily; accumulated evidence must stay unique.
    let index = Arc::new(ScriptedIndex::new(vec![
        Ok(vec![hit("a", 0.9), hit("b", 0.8)]),
        Ok(vec![hit("b", 0.8), hit("c", 0.7)]),
        Ok(vec![hit("c", 0.7), hit("a", 0.9)]),
    ]));
    let model = Arc::new(ScriptedModel::new(&[
        LOW_CONFIDENCE_CONTINUE,
        LOW_CONFIDENCE_CONTINUE,
        "answer",
    ]));

    let controller = controller(Arc::clone(&index), model);
    let options = iterative_options(3).with_retrieval_limit(10);
    let report = controller.run("question", &options).await.unwrap();

    assert_eq!(report.total_retrieved, Some(3));
    let ids: Vec<&str> = report.sources.iter().map(|s| s.source_id.as_str()).collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len(), "no source id may appear twice");
}

#[tokio::test]
async fn terminates_at_budget_even_when_always_refining() {
    // The evaluator always demands refinement; the loop must still stop at
    // the iteration budget.
    let index = Arc::new(ScriptedIndex::new(vec![
        Ok(vec![hit("a", 0.9), hit("b", 0.8)]),
        Ok(vec![hit("c", 0.9), hit("d", 0.8)]),
        Ok(vec![hit("e", 0.9), hit("f", 0.8)]),
        Ok(vec![hit("g", 0.9)]),
    ]));
    let model = Arc::new(ScriptedModel::new(&[
        LOW_CONFIDENCE_REFINE,
        "refined once",
        LOW_CONFIDENCE_REFINE,
        "refined twice",
        "final answer",
    ]));

    let controller = controller(Arc::clone(&index), Arc::clone(&model));
    let report = controller.run("question", &iterative_options(3)).await.unwrap();

    assert_eq!(index.search_calls(), 3, "exactly max_iterations passes");
    assert_eq!(report.iterations, Some(3));
    // Monotonic evidence: every pass added to the accumulated set.
    assert_eq!(report.total_retrieved, Some(6));
    // The final permitted pass skips evaluation entirely.
    assert_eq!(model.calls_matching(EVALUATOR_MARKER), 2);
    assert_eq!(model.calls_matching(REFINER_MARKER), 2);
}

#[tokio::test]
async fn empty_store_returns_no_evidence_after_one_pass() {
    let index = Arc::new(ScriptedIndex::new(vec![]));
    let model = Arc::new(ScriptedModel::new(&[]));

    let controller = controller(Arc::clone(&index), Arc::clone(&model));
    let report = controller.run("question", &iterative_options(3)).await.unwrap();

    assert_eq!(index.search_calls(), 1, "no point iterating an empty store");
    assert_eq!(report.iterations, Some(1));
    assert_eq!(report.total_retrieved, Some(0));
    assert!(report.sources.is_empty());
    assert!(report.answer.contains("No relevant documents"));
    assert_eq!(model.total_calls(), 0, "no model call without evidence");
}

#[tokio::test]
async fn single_iteration_budget_skips_evaluation_and_refinement() {
    // maxIterations = 1: exactly one retrieval, zero evaluator calls, zero
    // refiner calls, straight to the final answer.
    let index = Arc::new(ScriptedIndex::new(vec![Ok(vec![
        hit("a", 0.9),
        hit("b", 0.8),
    ])]));
    let model = Arc::new(ScriptedModel::new(&["the answer"]));

    let controller = controller(Arc::clone(&index), Arc::clone(&model));
    let report = controller.run("question", &iterative_options(1)).await.unwrap();

    assert_eq!(index.search_calls(), 1);
    assert_eq!(model.calls_matching(EVALUATOR_MARKER), 0);
    assert_eq!(model.calls_matching(REFINER_MARKER), 0);
    assert_eq!(model.total_calls(), 1, "only the final answer call");
    assert_eq!(report.answer, "the answer");
    assert_eq!(report.iterations, Some(1));
}

#[tokio::test]
async fn sources_capped_at_requested_limit() {
    let index = Arc::new(ScriptedIndex::new(vec![Ok(vec![
        hit("a", 0.9),
        hit("b", 0.8),
        hit("c", 0.7),
    ])]));
    let model = Arc::new(ScriptedModel::new(&["answer"]));

    let controller = controller(index, model);
    let options = iterative_options(1).with_retrieval_limit(2);
    let report = controller.run("question", &options).await.unwrap();

    assert_eq!(report.sources.len(), 2, "capped at the requested limit");
    assert_eq!(report.total_retrieved, Some(3), "volume reports all passes");
}

#[tokio::test]
async fn mid_loop_failure_finalizes_with_accumulated_evidence() {
    // Pass 1 succeeds, pass 2 blows up. The controller must not lose the
    // already-gathered evidence.
    let index = Arc::new(ScriptedIndex::new(vec![
        Ok(vec![hit("a", 0.9), hit("b", 0.8)]),
        Err(TapestryError::vector_index("connection reset")),
    ]));
    let model = Arc::new(ScriptedModel::new(&[
        LOW_CONFIDENCE_CONTINUE,
        "answer from what we had",
    ]));

    let controller = controller(Arc::clone(&index), model);
    let report = controller.run("question", &iterative_options(3)).await.unwrap();

    assert_eq!(report.answer, "answer from what we had");
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.iterations, Some(2));
}

#[tokio::test]
async fn first_pass_failure_with_no_evidence_surfaces() {
    let index = Arc::new(ScriptedIndex::new(vec![Err(
        TapestryError::vector_index("index offline"),
    )]));
    let model = Arc::new(ScriptedModel::new(&[]));

    let controller = controller(index, model);
    let result = controller.run("question", &iterative_options(3)).await;

    assert!(matches!(result, Err(TapestryError::VectorIndex { .. })));
}

#[tokio::test]
async fn unparsable_evaluation_terminates_instead_of_spinning() {
    // Garbage judgments resolve to the conservative default (0.6, no
    // refinement), which is below the 0.8 threshold: the loop keeps
    // gathering with the same query and still terminates at the budget.
    let index = Arc::new(ScriptedIndex::new(vec![
        Ok(vec![hit("a", 0.9)]),
        Ok(vec![hit("b", 0.9)]),
        Ok(vec![hit("c", 0.9)]),
    ]));
    let model = Arc::new(ScriptedModel::new(&[
        "I cannot judge this.",
        "Still no JSON from me.",
        "final answer",
    ]));

    let controller = controller(Arc::clone(&index), Arc::clone(&model));
    let report = controller.run("question", &iterative_options(3)).await.unwrap();

    assert_eq!(report.iterations, Some(3));
    assert_eq!(model.calls_matching(REFINER_MARKER), 0);
    assert_eq!(report.answer, "final answer");
}

#[tokio::test]
async fn unparsable_evaluation_with_lower_threshold_stops_early() {
    // With a threshold at or below the fallback confidence, the default
    // judgment counts as sufficient and stops the loop.
    let index = Arc::new(ScriptedIndex::new(vec![
        Ok(vec![hit("a", 0.9)]),
        Ok(vec![hit("b", 0.9)]),
    ]));
    let model = Arc::new(ScriptedModel::new(&["garbage", "final answer"]));

    let controller = controller(Arc::clone(&index), model);
    let options = iterative_options(3).with_confidence_threshold(0.6);
    let report = controller.run("question", &options).await.unwrap();

    assert_eq!(index.search_calls(), 1);
    assert_eq!(report.iterations, Some(1));
}

#[tokio::test]
async fn single_pass_empty_store_skips_generation() {
    let index = Arc::new(ScriptedIndex::new(vec![]));
    let model = Arc::new(ScriptedModel::new(&[]));

    let controller = controller(Arc::clone(&index), Arc::clone(&model));
    let options = AnswerOptions::default().with_hybrid(false);
    let report = controller.run("question", &options).await.unwrap();

    assert!(report.answer.contains("No relevant documents"));
    assert_eq!(report.method, "vector");
    assert_eq!(report.iterations, None);
    assert_eq!(model.total_calls(), 0);
}

#[tokio::test]
async fn single_pass_returns_answer_and_sources() {
    let index = Arc::new(ScriptedIndex::new(vec![Ok(vec![
        hit("a", 0.9),
        hit("b", 0.8),
    ])]));
    let model = Arc::new(ScriptedModel::new(&["grounded answer"]));

    let controller = controller(Arc::clone(&index), Arc::clone(&model));
    let options = AnswerOptions::default().with_hybrid(false);
    let report = controller.run("question", &options).await.unwrap();

    assert_eq!(index.search_calls(), 1);
    assert_eq!(report.answer, "grounded answer");
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.method, "vector");
    assert_eq!(report.total_retrieved, None);
}
