//! Domain error types.

use agentco_types::{TaskId, TransitionError};
use thiserror::Error;

/// Domain-level errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Task is not in the loaded collection.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// Transition refused by the local status table.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Backend call failed.
    #[error(transparent)]
    Client(#[from] agentco_client::Error),

    /// The tracker loop has already exited.
    #[error("Progress tracker is not running")]
    TrackerStopped,

    /// The tracker task panicked or was aborted.
    #[error("Progress tracker failed: {0}")]
    TrackerJoin(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Check if the request was refused locally, before reaching the backend.
    pub fn is_local_rejection(&self) -> bool {
        matches!(self, DomainError::Transition(_) | DomainError::TaskNotFound(_))
    }

    /// The client error behind this one, if any.
    pub fn client_error(&self) -> Option<&agentco_client::Error> {
        match self {
            DomainError::Client(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
