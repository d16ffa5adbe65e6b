//! Embedding generation trait.
//!
//! Embeddings turn query text into fixed-size vectors for similarity search.
//! The engine embeds the current query once per retrieval pass.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::Result;

/// Generates dense embeddings for text content.
///
/// # Examples
///
/// ```rust,no_run
/// use tapestry_core::traits::Embedder;
/// use tapestry_core::Result;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct FixedEmbedder {
///     dimension: usize,
/// }
///
/// #[async_trait]
/// impl Embedder for FixedEmbedder {
///     async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
///         Ok(vec![0.1; self.dimension])
///     }
///
///     fn dimension(&self) -> usize {
///         self.dimension
///     }
///
///     fn model_name(&self) -> &str {
///         "fixed-embedder"
///     }
/// }
/// ```
#[async_trait]
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Generate an embedding for a single text.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding generation fails due to model issues,
    /// network problems, or invalid input. The failure propagates as a
    /// retrieval-step error and is recovered by the controller when evidence
    /// has already accumulated.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the dimension of embeddings produced by this embedder.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of the embedding model.
    fn model_name(&self) -> &str;

    /// Get a human-readable name for this embedder.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Check if the embedder is healthy and ready to generate embeddings.
    async fn health_check(&self) -> Result<()> {
        // Default implementation does nothing
        Ok(())
    }

    /// Get metadata about the embedding model.
    fn metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut metadata = HashMap::new();
        metadata.insert("model_name".to_string(), self.model_name().into());
        metadata.insert("dimension".to_string(), self.dimension().into());
        metadata
    }
}
