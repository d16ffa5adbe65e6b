//! Error types for the Tapestry agents layer.

use tapestry_core::TapestryError;
use thiserror::Error;

/// Result type alias for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Error types for agent routing, execution, and synthesis.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Core engine errors
    #[error("Core error: {0}")]
    Core(#[from] TapestryError),

    /// Routing errors
    #[error("Routing error: {message}")]
    Routing {
        /// Error message
        message: String,
    },

    /// Agent execution errors
    #[error("Agent execution error: {agent} - {message}")]
    Execution {
        /// Agent identifier
        agent: String,
        /// Error message
        message: String,
    },

    /// Result synthesis errors
    #[error("Synthesis error: {message}")]
    Synthesis {
        /// Error message
        message: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Create a routing error.
    pub fn routing(message: impl Into<String>) -> Self {
        Self::Routing {
            message: message.into(),
        }
    }

    /// Create an execution error.
    pub fn execution(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            agent: agent.into(),
            message: message.into(),
        }
    }

    /// Create a synthesis error.
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }

    /// Get the error category for logging/metrics.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Core(_) => "core",
            Self::Routing { .. } => "routing",
            Self::Execution { .. } => "execution",
            Self::Synthesis { .. } => "synthesis",
            Self::Serialization(_) => "serialization",
        }
    }
}
