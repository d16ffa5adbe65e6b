//! The retrieval agent: retrieval-augmented answering via the iterative
//! controller.

use async_trait::async_trait;

use tapestry_retrieval::controller::RetrievalController;

use crate::agents::Agent;
use crate::error::Result;
use crate::types::{AgentKind, AgentResult, ExecutionContext};

/// Answers questions from the knowledge store, iterating when configured.
#[derive(Debug)]
pub struct RetrievalAgent {
    controller: RetrievalController,
}

impl RetrievalAgent {
    /// Create a retrieval agent over a configured controller.
    #[must_use]
    pub fn new(controller: RetrievalController) -> Self {
        Self { controller }
    }
}

#[async_trait]
impl Agent for RetrievalAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Retrieval
    }

    async fn execute(
        &self,
        prompt: &str,
        _data: Option<&serde_json::Value>,
        context: &ExecutionContext,
    ) -> Result<AgentResult> {
        // A known user profile is folded into the query so retrieval and
        // answering see the same context the user carries.
        let effective_prompt = match context
            .user_profile
            .as_ref()
            .and_then(|profile| profile.format_for_context())
        {
            Some(profile) => format!("{profile}\n\nUser question: {prompt}"),
            None => prompt.to_string(),
        };

        let report = self
            .controller
            .run(&effective_prompt, &context.options)
            .await?;

        Ok(AgentResult::Retrieval(report))
    }
}
