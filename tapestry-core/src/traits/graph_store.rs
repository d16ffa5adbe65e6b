//! Graph traversal trait.
//!
//! A graph store answers entity-neighborhood lookups keyed by document
//! source ids, plus the entity search and statistics operations the
//! knowledge graph agent exposes.

use async_trait::async_trait;

use crate::{GraphContext, GraphEntity, Result};

/// Answers graph-neighborhood lookups and entity searches.
#[async_trait]
pub trait GraphStore: Send + Sync + std::fmt::Debug {
    /// Fetch the neighborhood of the entity keyed by `source_id`, up to
    /// `depth` hops.
    ///
    /// # Returns
    ///
    /// `None` when the source has no graph node; absence is a valid
    /// outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if traversal fails. During hybrid retrieval a
    /// failed lookup degrades that hit's graph context to absent; it never
    /// drops the vector hit.
    async fn neighbors(&self, source_id: &str, depth: usize) -> Result<Option<GraphContext>>;

    /// Search entities whose name or description matches `term`.
    async fn search_entities(&self, term: &str, limit: usize) -> Result<Vec<GraphEntity>>;

    /// Summary statistics about the graph (node/relationship counts).
    async fn stats(&self) -> Result<serde_json::Value>;

    /// Get a human-readable name for this store.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Check if the store is healthy and accessible.
    async fn health_check(&self) -> Result<()> {
        // Default implementation does nothing
        Ok(())
    }
}
