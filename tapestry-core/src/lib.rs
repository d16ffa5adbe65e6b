//! # Tapestry Core
//!
//! Core traits, types, and interfaces for the Tapestry retrieval orchestration
//! engine.
//!
//! This crate provides the foundational building blocks shared by the retrieval
//! and agent layers:
//!
//! - **Data structures**: Evidence, graph context, evaluations, chat turns
//! - **Collaborator traits**: `Embedder`, `VectorIndex`, `GraphStore`, `ChatModel`
//! - **Configuration**: Validated, immutable option types passed explicitly
//!   through the call chain
//! - **Structured extraction**: Parsing structured judgments out of free-form
//!   model output with safe defaults
//! - **Error handling**: Comprehensive error types with context
//!
//! ## Quick Start
//!
//! ```rust
//! use tapestry_core::prelude::*;
//!
//! let options = AnswerOptions::default().with_retrieval_limit(8);
//! assert!(options.validate().is_ok());
//! ```
//!
//! ## Architecture
//!
//! The core defines the seams between the orchestration engine and the
//! services it consumes:
//!
//! - **Embedders** turn query text into vectors
//! - **Vector indexes** answer similarity searches
//! - **Graph stores** answer entity-neighborhood lookups
//! - **Chat models** produce text for judgments and final answers

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used types and traits
pub mod prelude;

// Core modules
pub mod config;
pub mod error;
pub mod structured;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use error::{Result, TapestryError};
pub use types::{
    ChatRole, ChatTurn, Evaluation, Evidence, GraphContext, GraphEntity, GraphRelationship,
    Provenance, SourceRef, UserProfile, VectorHit,
};

// Re-export traits for convenience
pub use traits::*;

/// Version information for the Tapestry core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the Tapestry core library.
pub const NAME: &str = env!("CARGO_PKG_NAME");
