//! Vector similarity search trait.
//!
//! A vector index answers ranked similarity searches over document chunks.
//! The engine treats it as an external, already-populated service; indexing
//! and persistence live elsewhere.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::{Result, VectorHit};

/// Answers vector similarity searches.
///
/// This trait provides a unified interface over vector database backends.
/// Results come back sorted by descending score; an empty result list is a
/// valid, non-error outcome.
///
/// # Examples
///
/// ```rust,no_run
/// use tapestry_core::traits::VectorIndex;
/// use tapestry_core::{Result, VectorHit};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct EmptyIndex;
///
/// #[async_trait]
/// impl VectorIndex for EmptyIndex {
///     async fn search(
///         &self,
///         _embedding: &[f32],
///         _limit: usize,
///         _threshold: f32,
///     ) -> Result<Vec<VectorHit>> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync + std::fmt::Debug {
    /// Search for chunks similar to the given embedding.
    ///
    /// # Arguments
    ///
    /// * `embedding` - The query embedding
    /// * `limit` - Maximum number of hits to return
    /// * `threshold` - Minimum similarity score for a hit to qualify
    ///
    /// # Returns
    ///
    /// Hits sorted by descending score. Empty when nothing clears the
    /// threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails due to connection issues or
    /// invalid parameters.
    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<VectorHit>>;

    /// Get a human-readable name for this index.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Check if the index is healthy and accessible.
    async fn health_check(&self) -> Result<()> {
        // Default implementation does nothing
        Ok(())
    }

    /// Get metadata about the index.
    async fn metadata(&self) -> Result<HashMap<String, serde_json::Value>> {
        Ok(HashMap::new())
    }
}
