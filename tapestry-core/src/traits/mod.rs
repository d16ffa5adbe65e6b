//! Collaborator traits consumed by the orchestration engine.
//!
//! The engine never talks to a concrete vector database, graph database, or
//! LLM provider; it talks to these seams. Implementations are expected to be
//! safely shared by many concurrent sessions.

pub mod chat_model;
pub mod embedder;
pub mod graph_store;
pub mod vector_index;

pub use chat_model::*;
pub use embedder::*;
pub use graph_store::*;
pub use vector_index::*;
