//! Chat model implementation backed by the Siumai crate.
//!
//! This adapter exposes a unified multi-provider LLM client through the
//! [`ChatModel`] seam consumed by the evaluator, refiner, router,
//! synthesizer, and final-answer calls.

use async_trait::async_trait;

use siumai::prelude::*;

use tapestry_core::{traits::ChatModel, ChatRole, ChatTurn, Result, TapestryError};

/// A chat model that uses the Siumai crate for LLM integration.
///
/// # Examples
///
/// ```rust,no_run
/// use tapestry_retrieval::model::SiumaiChatModel;
/// use siumai::prelude::*;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Siumai::builder().openai().build().await?;
///
/// let model = SiumaiChatModel::builder()
///     .client(client)
///     .model_name("gpt-4o-mini")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SiumaiChatModel {
    /// Siumai client for LLM communication.
    client: Siumai,

    /// Identifier of the configured model, for logging and metadata.
    model_name: Option<String>,
}

impl std::fmt::Debug for SiumaiChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiumaiChatModel")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl SiumaiChatModel {
    /// Create a chat model over an existing Siumai client.
    pub fn new(client: Siumai) -> Self {
        Self {
            client,
            model_name: None,
        }
    }

    /// Create a builder for constructing Siumai chat models.
    #[must_use]
    pub fn builder() -> SiumaiChatModelBuilder {
        SiumaiChatModelBuilder::new()
    }

    /// Convert engine turns to Siumai chat messages.
    fn build_messages(system: &str, turns: &[ChatTurn]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        if !system.is_empty() {
            messages.push(ChatMessage::system(system).build());
        }

        for turn in turns {
            let message = match turn.role {
                ChatRole::User => ChatMessage::user(&turn.content).build(),
                ChatRole::Assistant => ChatMessage::assistant(&turn.content).build(),
                ChatRole::System => ChatMessage::system(&turn.content).build(),
            };
            messages.push(message);
        }

        messages
    }
}

#[async_trait]
impl ChatModel for SiumaiChatModel {
    async fn generate(&self, system: &str, turns: &[ChatTurn]) -> Result<String> {
        let messages = Self::build_messages(system, turns);

        let response = self.client.chat(messages).await.map_err(|e| {
            TapestryError::llm(format!("Siumai generation failed: {e}"))
        })?;

        Ok(response.content.all_text())
    }

    fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or("unknown")
    }

    fn name(&self) -> &'static str {
        "SiumaiChatModel"
    }

    async fn health_check(&self) -> Result<()> {
        let test_messages = vec![ChatMessage::user("Hello").build()];

        self.client.chat(test_messages).await.map_err(|e| {
            TapestryError::llm(format!("Health check failed: {e}"))
        })?;

        Ok(())
    }
}

/// Builder for creating Siumai chat models.
#[derive(Default)]
pub struct SiumaiChatModelBuilder {
    client: Option<Siumai>,
    model_name: Option<String>,
}

impl std::fmt::Debug for SiumaiChatModelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiumaiChatModelBuilder")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl SiumaiChatModelBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Siumai client.
    #[must_use]
    pub fn client(mut self, client: Siumai) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the model identifier reported in metadata.
    #[must_use]
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Build the chat model.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no client was provided.
    pub fn build(self) -> Result<SiumaiChatModel> {
        let client = self.client.ok_or_else(|| TapestryError::Configuration {
            message: "Siumai client is required".to_string(),
        })?;

        Ok(SiumaiChatModel {
            client,
            model_name: self.model_name,
        })
    }
}
