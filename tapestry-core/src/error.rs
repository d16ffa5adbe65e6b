//! Error types for the Tapestry engine.
//!
//! This module provides context-aware error types covering every failure mode
//! of the retrieval orchestration loop. Upstream failures are recoverable by
//! design: callers are expected to degrade locally (fall through to finalize,
//! use a documented default) rather than abort the request.

use thiserror::Error;

/// Core error types for the Tapestry engine.
///
/// This enum covers all error conditions that can occur during embedding,
/// retrieval, graph traversal, judgment parsing, and response generation.
#[derive(Error, Debug)]
pub enum TapestryError {
    /// I/O related errors (file reading, network operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Embedding generation errors
    #[error("Embedding error: {message}")]
    Embedding {
        /// Detailed error message
        message: String,
    },

    /// Vector index operation errors
    #[error("Vector index error: {message}")]
    VectorIndex {
        /// Detailed error message
        message: String,
    },

    /// Graph store operation errors
    #[error("Graph error: {message}")]
    Graph {
        /// Detailed error message
        message: String,
    },

    /// LLM/generation errors
    #[error("LLM error: {message}")]
    Llm {
        /// Detailed error message
        message: String,
    },

    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
    },

    /// Input validation errors
    #[error("Validation error: {message}")]
    Validation {
        /// Detailed error message
        message: String,
    },

    /// Resource not found errors
    #[error("Not found: {resource}")]
    NotFound {
        /// Name of the missing resource
        resource: String,
    },

    /// Operation timeout errors
    #[error("Timeout: {operation}")]
    Timeout {
        /// Name of the operation that timed out
        operation: String,
    },

    /// Internal engine errors
    #[error("Internal error: {message}")]
    Internal {
        /// Detailed error message
        message: String,
    },

    /// Generic errors from external dependencies
    #[error("External error: {source}")]
    External {
        /// The underlying error
        #[source]
        source: anyhow::Error,
    },
}

impl TapestryError {
    /// Create a new embedding error with a message.
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a new vector index error with a message.
    pub fn vector_index<S: Into<String>>(message: S) -> Self {
        Self::VectorIndex {
            message: message.into(),
        }
    }

    /// Create a new graph error with a message.
    pub fn graph<S: Into<String>>(message: S) -> Self {
        Self::Graph {
            message: message.into(),
        }
    }

    /// Create a new LLM error with a message.
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    /// Create a new configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new validation error with a message.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not found error with a resource name.
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a new timeout error with an operation name.
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a new internal error with a message.
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a new external error from any error that implements `Into<anyhow::Error>`.
    pub fn external<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::External {
            source: error.into(),
        }
    }

    /// Check if this error is retryable.
    ///
    /// Returns `true` for transient errors that might succeed on retry,
    /// such as network timeouts.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Io(_))
    }

    /// Check if this error is a client error (4xx-style).
    ///
    /// Returns `true` for errors caused by invalid input or configuration
    /// that won't be fixed by retrying.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Configuration { .. } | Self::NotFound { .. }
        )
    }

    /// Check if this error came from an upstream collaborator call.
    ///
    /// Upstream failures are the recoverable class: where evidence has already
    /// been accumulated the controller falls through to finalization instead
    /// of surfacing them.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Embedding { .. }
                | Self::VectorIndex { .. }
                | Self::Graph { .. }
                | Self::Llm { .. }
        )
    }
}

/// Convert from `anyhow::Error` to `TapestryError`.
impl From<anyhow::Error> for TapestryError {
    fn from(error: anyhow::Error) -> Self {
        Self::External { source: error }
    }
}

/// Result type alias for convenience.
///
/// This is the standard result type used throughout the Tapestry engine.
pub type Result<T> = std::result::Result<T, TapestryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TapestryError::embedding("Failed to generate embedding");
        assert!(matches!(err, TapestryError::Embedding { .. }));
        assert_eq!(
            err.to_string(),
            "Embedding error: Failed to generate embedding"
        );
    }

    #[test]
    fn test_error_retryable() {
        assert!(TapestryError::timeout("network").is_retryable());
        assert!(!TapestryError::validation("invalid input").is_retryable());
    }

    #[test]
    fn test_error_client_error() {
        assert!(TapestryError::validation("invalid").is_client_error());
        assert!(TapestryError::configuration("bad").is_client_error());
        assert!(!TapestryError::timeout("network").is_client_error());
    }

    #[test]
    fn test_error_upstream() {
        assert!(TapestryError::embedding("down").is_upstream());
        assert!(TapestryError::llm("down").is_upstream());
        assert!(!TapestryError::validation("bad").is_upstream());
    }
}
