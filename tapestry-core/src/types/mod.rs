//! Core data types for the Tapestry engine.
//!
//! This module contains the fundamental data structures used throughout
//! the retrieval orchestration loop: evidence units, graph context,
//! evaluator judgments, and chat turns.

pub mod chat;
pub mod evaluation;
pub mod evidence;
pub mod graph;

// Re-export all types for convenience
pub use chat::*;
pub use evaluation::*;
pub use evidence::*;
pub use graph::*;
