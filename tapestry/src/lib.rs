//! # Tapestry - Retrieval Orchestration Engine
//!
//! Tapestry answers natural-language questions by retrieving supporting
//! evidence from a mixed vector + graph knowledge store and feeding it to a
//! language model. Its core is the retrieval orchestration loop: deciding
//! what to retrieve, fusing two heterogeneous retrieval signals, judging
//! whether the gathered evidence suffices, and rewriting the query and
//! retrieving again under an iteration budget, plus the multi-agent
//! routing, execution, and result-fusion layer around it.
//!
//! ## Quick Start
//!
//! ```rust
//! use tapestry::prelude::*;
//!
//! let options = AnswerOptions::default()
//!     .with_iterative(true)
//!     .with_confidence_threshold(0.85);
//! assert!(options.validate().is_ok());
//! ```
//!
//! ## Architecture
//!
//! The engine is organized into three crates:
//!
//! - **tapestry-core**: collaborator traits, data types, configuration,
//!   structured-output extraction
//! - **tapestry-retrieval**: retrieval strategies, evaluation, refinement,
//!   and the iterative retrieval controller
//! - **tapestry-agents**: agent routing, execution, synthesis, and the
//!   orchestrator entry point

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export all public APIs from sub-crates
pub use tapestry_agents as agents;
pub use tapestry_core as core;
pub use tapestry_retrieval as retrieval;

/// Prelude module for convenient imports.
///
/// Re-exports the most commonly used types and traits from all Tapestry
/// crates.
pub mod prelude {
    pub use tapestry_agents::prelude::{
        Agent, AgentError, AgentExecutor, AgentKind, AgentResult, AnswerResponse,
        DataProcessingAgent, DataProcessingMode, DataReport, DirectReport, DirectResponseAgent,
        ExecutionContext, GraphReport, KnowledgeGraphAgent, Orchestrator, OrchestratorBuilder,
        ResultSynthesizer, RetrievalAgent, RetrievalMetadata, RouterAgent, RoutingDecision,
    };
    pub use tapestry_core::prelude::*;
    pub use tapestry_retrieval::prelude::{
        ContextBuilder, HybridStrategy, QueryRefiner, RetrievalController,
        RetrievalControllerBuilder, RetrievalEvaluator, RetrievalReport, RetrievalStrategy,
        SiumaiChatModel, SiumaiChatModelBuilder, VectorStrategy,
    };
}

/// Version information for the Tapestry engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
