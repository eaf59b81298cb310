//! Error types for codeswarm
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::roles::Role;

/// All error types that can occur while building a project
#[derive(Debug, Error)]
pub enum SwarmError {
    /// The inference gateway gave up after its retries
    #[error("{role} produced no output after exhausting inference retries")]
    GatewayExhausted { role: Role },

    /// A task names no artifact and no fallback artifact is known
    #[error("No target artifact for task: {task}")]
    UnresolvableTarget { task: String },

    /// A required input is absent or empty
    #[error("Precondition missing: {0}")]
    PreconditionMissing(String),

    /// Blob store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Prompt template error
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SwarmError {
    /// True for the failures a worker can report for a single task.
    pub fn is_task_failure(&self) -> bool {
        matches!(
            self,
            SwarmError::GatewayExhausted { role: Role::Worker } | SwarmError::UnresolvableTarget { .. }
        )
    }
}

/// Result type alias for codeswarm operations
pub type Result<T> = std::result::Result<T, SwarmError>;
