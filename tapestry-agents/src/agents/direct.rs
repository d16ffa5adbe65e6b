//! The direct response agent: a plain model answer with chat history and
//! user profile context, no specialized processing.

use async_trait::async_trait;
use std::sync::Arc;

use tapestry_core::{traits::ChatModel, ChatTurn};

use crate::agents::Agent;
use crate::error::Result;
use crate::prompts;
use crate::types::{AgentKind, AgentResult, DirectReport, ExecutionContext};

/// Answers without consulting any knowledge store.
#[derive(Debug)]
pub struct DirectResponseAgent {
    model: Arc<dyn ChatModel>,
}

impl DirectResponseAgent {
    /// Create a direct response agent.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Agent for DirectResponseAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::DirectResponse
    }

    async fn execute(
        &self,
        prompt: &str,
        _data: Option<&serde_json::Value>,
        context: &ExecutionContext,
    ) -> Result<AgentResult> {
        let mut system = prompts::DIRECT_RESPONSE_SYSTEM.to_string();
        if let Some(profile) = context
            .user_profile
            .as_ref()
            .and_then(|profile| profile.format_for_context())
        {
            system.push_str("\n\n");
            system.push_str(&profile);
        }

        let mut turns = context.chat_history.clone();
        turns.push(ChatTurn::user(prompt));

        let answer = self.model.generate(&system, &turns).await?;
        Ok(AgentResult::Direct(DirectReport { answer }))
    }
}
