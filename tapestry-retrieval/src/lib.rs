//! Retrieval strategies and the iterative retrieval controller for Tapestry.
//!
//! This crate turns one or more imperfect retrieval calls into a terminating,
//! evaluated, deduplicated evidence set:
//!
//! - **Strategies**: single-pass vector and hybrid (vector + graph) fetches
//! - **Evaluator**: LLM judgment of whether accumulated evidence answers the
//!   original question
//! - **Refiner**: query rewriting targeted at the evaluator's stated gaps
//! - **Controller**: the stateful loop combining the above under an
//!   iteration/confidence budget
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tapestry_retrieval::prelude::*;
//! use tapestry_core::prelude::*;
//!
//! # async fn example(
//! #     embedder: Arc<dyn Embedder>,
//! #     index: Arc<dyn VectorIndex>,
//! #     graph: Arc<dyn GraphStore>,
//! #     model: Arc<dyn ChatModel>,
//! # ) -> Result<()> {
//! let controller = RetrievalController::builder()
//!     .embedder(embedder)
//!     .vector_index(index)
//!     .graph_store(graph)
//!     .chat_model(model)
//!     .build()?;
//!
//! let options = AnswerOptions::default().with_iterative(true);
//! let report = controller.run("What is the deployment topology?", &options).await?;
//! println!("{}", report.answer);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Query → Embedder → Strategy (vector | hybrid) → dedup/accumulate
//!   ↓                                                 ↓
//! Refiner ← Evaluator ←───────────── context text ────┘
//!   ↓
//! next pass … → finalize → ChatModel → answer + provenance
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod controller;
pub mod evaluator;
pub mod model;
pub mod prompts;
pub mod refiner;
pub mod strategy;

/// Re-export commonly used types and traits.
pub mod prelude {
    pub use crate::context::ContextBuilder;
    pub use crate::controller::{
        RetrievalController, RetrievalControllerBuilder, RetrievalReport,
    };
    pub use crate::evaluator::RetrievalEvaluator;
    pub use crate::model::{SiumaiChatModel, SiumaiChatModelBuilder};
    pub use crate::refiner::QueryRefiner;
    pub use crate::strategy::{HybridStrategy, RetrievalStrategy, VectorStrategy};

    // Re-export core types
    pub use tapestry_core::prelude::*;
}
