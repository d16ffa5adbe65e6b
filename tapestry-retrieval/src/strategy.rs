//! Retrieval strategies: single-pass evidence fetches.
//!
//! A strategy performs one fetch of evidence given a query and its embedding.
//! The vector strategy returns similarity hits as-is; the hybrid strategy
//! additionally attaches graph-neighborhood context to every hit.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use tapestry_core::{
    config::RetrievalOptions,
    traits::{GraphStore, VectorIndex},
    Evidence, Provenance, Result,
};

/// A single-pass evidence fetch.
///
/// Implementations must return results sorted by descending score and must
/// treat an empty result list as a valid outcome.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync + std::fmt::Debug {
    /// Stable strategy identifier used in retrieval-method labels.
    fn name(&self) -> &'static str;

    /// Fetch evidence for a query.
    ///
    /// # Arguments
    ///
    /// * `query` - The query text (available for strategies that need it)
    /// * `embedding` - The pre-computed query embedding
    /// * `options` - Per-pass limit, threshold, and graph depth
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying search fails.
    async fn retrieve(
        &self,
        query: &str,
        embedding: &[f32],
        options: &RetrievalOptions,
    ) -> Result<Vec<Evidence>>;
}

/// Vector-only retrieval.
#[derive(Debug)]
pub struct VectorStrategy {
    index: Arc<dyn VectorIndex>,
}

impl VectorStrategy {
    /// Create a vector strategy over the given index.
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl RetrievalStrategy for VectorStrategy {
    fn name(&self) -> &'static str {
        "vector"
    }

    async fn retrieve(
        &self,
        _query: &str,
        embedding: &[f32],
        options: &RetrievalOptions,
    ) -> Result<Vec<Evidence>> {
        debug!(limit = options.limit, "performing vector search");
        let hits = self
            .index
            .search(embedding, options.limit, options.threshold)
            .await?;

        Ok(hits
            .into_iter()
            .map(|hit| Evidence::from_hit(hit, Provenance::Vector))
            .collect())
    }
}

/// Hybrid retrieval: vector hits enriched with graph-neighborhood context.
///
/// For every vector hit, the graph store is asked for the neighborhood keyed
/// by that hit's source id. The lookups are independent reads on distinct
/// ids and run concurrently. A failed or empty lookup degrades that hit's
/// graph context to absent; the vector hit itself is never dropped.
#[derive(Debug)]
pub struct HybridStrategy {
    index: Arc<dyn VectorIndex>,
    graph: Arc<dyn GraphStore>,
}

impl HybridStrategy {
    /// Create a hybrid strategy over the given index and graph store.
    pub fn new(index: Arc<dyn VectorIndex>, graph: Arc<dyn GraphStore>) -> Self {
        Self { index, graph }
    }
}

#[async_trait]
impl RetrievalStrategy for HybridStrategy {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    async fn retrieve(
        &self,
        _query: &str,
        embedding: &[f32],
        options: &RetrievalOptions,
    ) -> Result<Vec<Evidence>> {
        debug!(
            limit = options.limit,
            depth = options.graph_depth,
            "performing hybrid search"
        );
        let hits = self
            .index
            .search(embedding, options.limit, options.threshold)
            .await?;

        let lookups = hits.iter().map(|hit| {
            let graph = Arc::clone(&self.graph);
            let source_id = hit.source_id.clone();
            let depth = options.graph_depth;
            async move { graph.neighbors(&source_id, depth).await }
        });
        let neighborhoods = join_all(lookups).await;

        Ok(hits
            .into_iter()
            .zip(neighborhoods)
            .map(|(hit, neighborhood)| {
                let graph_context = match neighborhood {
                    Ok(context) => context,
                    Err(err) => {
                        warn!(
                            source_id = %hit.source_id,
                            error = %err,
                            "graph lookup failed; keeping vector hit without graph context"
                        );
                        None
                    }
                };

                Evidence::from_hit(hit, Provenance::GraphAugmented)
                    .with_graph_context(graph_context)
            })
            .collect())
    }
}
