//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types and traits from the core crate.
//!
//! # Examples
//!
//! ```rust
//! use tapestry_core::prelude::*;
//!
//! let options = AnswerOptions::default();
//! assert!(options.use_hybrid);
//! ```

pub use crate::config::{AnswerOptions, ChatType, RetrievalOptions};
pub use crate::error::{Result, TapestryError};
pub use crate::structured::{extract_json, parse_structured_or};
pub use crate::traits::{ChatModel, Embedder, GraphStore, VectorIndex};
pub use crate::types::{
    ChatRole, ChatTurn, Evaluation, Evidence, GraphContext, GraphEntity, GraphRelationship,
    Provenance, SourceRef, UserProfile, VectorHit,
};
