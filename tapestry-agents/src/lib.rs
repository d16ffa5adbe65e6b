//! Agent routing, execution, and result synthesis for Tapestry.
//!
//! This crate provides the multi-agent layer above the retrieval engine:
//!
//! - **Router**: classifies a request into the set of capability agents to
//!   invoke, with a safe direct-response default
//! - **Capability agents**: retrieval, knowledge graph, data processing, and
//!   direct response, all behind one `Agent` interface
//! - **Executor**: runs routed-and-enabled agents concurrently and collects
//!   their results, isolating individual failures
//! - **Synthesizer**: fuses multiple agents' outputs into one answer
//! - **Orchestrator**: the `answer` entry point wiring everything together
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tapestry_agents::prelude::*;
//! use tapestry_core::prelude::*;
//!
//! # async fn example(
//! #     embedder: Arc<dyn Embedder>,
//! #     index: Arc<dyn VectorIndex>,
//! #     graph: Arc<dyn GraphStore>,
//! #     model: Arc<dyn ChatModel>,
//! # ) -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::builder()
//!     .embedder(embedder)
//!     .vector_index(index)
//!     .graph_store(graph)
//!     .chat_model(model)
//!     .build()?;
//!
//! let context = ExecutionContext::new(AnswerOptions::default());
//! let response = orchestrator
//!     .answer("How do invoices reach the ledger?", None, context)
//!     .await?;
//! println!("{}", response.answer);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agents;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod prompts;
pub mod router;
pub mod synthesizer;
pub mod types;

pub use error::{AgentError, Result};

/// Re-export commonly used types and traits.
pub mod prelude {
    pub use crate::agents::{
        Agent, DataProcessingAgent, DirectResponseAgent, KnowledgeGraphAgent, RetrievalAgent,
    };
    pub use crate::error::{AgentError, Result};
    pub use crate::executor::AgentExecutor;
    pub use crate::orchestrator::{Orchestrator, OrchestratorBuilder};
    pub use crate::router::RouterAgent;
    pub use crate::synthesizer::ResultSynthesizer;
    pub use crate::types::{
        AgentKind, AgentResult, AnswerResponse, DataProcessingMode, DataReport, DirectReport,
        ExecutionContext, GraphReport, RetrievalMetadata, RoutingDecision,
    };
}
