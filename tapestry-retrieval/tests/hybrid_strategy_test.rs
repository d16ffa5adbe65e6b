//! Tests for hybrid retrieval's graph enrichment and degradation policy.

use std::sync::Arc;

use async_trait::async_trait;

use tapestry_core::prelude::*;
use tapestry_retrieval::strategy::{HybridStrategy, RetrievalStrategy, VectorStrategy};

#[derive(Debug)]
struct FixedIndex {
    hits: Vec<VectorHit>,
}

#[async_trait]
impl VectorIndex for FixedIndex {
    async fn search(
        &self,
        _embedding: &[f32],
        _limit: usize,
        _threshold: f32,
    ) -> Result<Vec<VectorHit>> {
        Ok(self.hits.clone())
    }
}

/// Graph store that knows one entity, errors on another, and is silent on
/// the rest.
#[derive(Debug)]
struct PatchyGraphStore;

#[async_trait]
impl GraphStore for PatchyGraphStore {
    async fn neighbors(&self, source_id: &str, _depth: usize) -> Result<Option<GraphContext>> {
        match source_id {
            "doc-known" => Ok(Some(GraphContext {
                entity: GraphEntity::new("doc-known", Some("Known".to_string())),
                related: vec![GraphEntity::new("e1", Some("Billing Service".to_string()))],
                relationships: vec![],
            })),
            "doc-broken" => Err(TapestryError::graph("traversal timed out")),
            _ => Ok(None),
        }
    }

    async fn search_entities(&self, _term: &str, _limit: usize) -> Result<Vec<GraphEntity>> {
        Ok(Vec::new())
    }

    async fn stats(&self) -> Result<serde_json::Value> {
        Ok(serde_json::json!({}))
    }
}

fn hit(id: &str) -> VectorHit {
    VectorHit {
        source_id: id.to_string(),
        title: None,
        content: format!("content of {id}"),
        score: 0.8,
        origin: None,
    }
}

fn options() -> RetrievalOptions {
    RetrievalOptions {
        limit: 5,
        threshold: 0.7,
        graph_depth: 1,
    }
}

#[tokio::test]
async fn hybrid_attaches_graph_context_where_available() {
    let index = Arc::new(FixedIndex {
        hits: vec![hit("doc-known"), hit("doc-absent")],
    });
    let strategy = HybridStrategy::new(index, Arc::new(PatchyGraphStore));

    let results = strategy.retrieve("q", &[0.1], &options()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].graph_context.is_some());
    assert!(results[1].graph_context.is_none());
    assert!(results
        .iter()
        .all(|r| r.provenance == Provenance::GraphAugmented));
}

#[tokio::test]
async fn failed_graph_lookup_never_drops_the_vector_hit() {
    let index = Arc::new(FixedIndex {
        hits: vec![hit("doc-broken"), hit("doc-known")],
    });
    let strategy = HybridStrategy::new(index, Arc::new(PatchyGraphStore));

    let results = strategy.retrieve("q", &[0.1], &options()).await.unwrap();

    assert_eq!(results.len(), 2, "partial graph failure keeps every hit");
    assert!(results[0].graph_context.is_none());
    assert!(results[1].graph_context.is_some());
}

#[tokio::test]
async fn vector_strategy_reports_vector_provenance() {
    let index = Arc::new(FixedIndex {
        hits: vec![hit("doc-1")],
    });
    let strategy = VectorStrategy::new(index);

    let results = strategy.retrieve("q", &[0.1], &options()).await.unwrap();

    assert_eq!(strategy.name(), "vector");
    assert_eq!(results[0].provenance, Provenance::Vector);
    assert!(results[0].graph_context.is_none());
}
