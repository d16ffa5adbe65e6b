//! Text generation trait.
//!
//! The chat model is the single non-deterministic collaborator. Every
//! LLM-backed component (evaluator, refiner, router, synthesizer, and the
//! final-answer call) goes through this seam and must tolerate malformed
//! output without raising.

use async_trait::async_trait;

use crate::{ChatTurn, Result};

/// Generates text from a system instruction and conversation turns.
///
/// # Examples
///
/// ```rust,no_run
/// use tapestry_core::traits::ChatModel;
/// use tapestry_core::{ChatTurn, Result};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct EchoModel;
///
/// #[async_trait]
/// impl ChatModel for EchoModel {
///     async fn generate(&self, _system: &str, turns: &[ChatTurn]) -> Result<String> {
///         Ok(turns.last().map(|t| t.content.clone()).unwrap_or_default())
///     }
/// }
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    /// Generate a completion for the given system instruction and turns.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails due to provider issues or
    /// network problems. Callers reading structured judgments out of the
    /// response must treat unparsable text as a default value, never as a
    /// failure.
    async fn generate(&self, system: &str, turns: &[ChatTurn]) -> Result<String>;

    /// Generate a completion for a single user message.
    ///
    /// Convenience wrapper over [`generate`](ChatModel::generate) for the
    /// common instruction-plus-question call shape.
    async fn ask(&self, system: &str, user: &str) -> Result<String> {
        self.generate(system, &[ChatTurn::user(user)]).await
    }

    /// Get the identifier of the underlying model, if known.
    fn model_name(&self) -> &str {
        "unknown"
    }

    /// Get a human-readable name for this chat model.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Check if the model is healthy and ready to generate.
    async fn health_check(&self) -> Result<()> {
        // Default implementation does nothing
        Ok(())
    }
}
