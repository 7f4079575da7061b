//! Error types for the sync engine.

use std::fmt;
use taskdb_store::{DocumentId, StoreError};
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// The kind of entity an operation targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A task document.
    Task,
    /// A user document.
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Task => write!(f, "Task"),
            EntityKind::User => write!(f, "User"),
        }
    }
}

/// Errors that can occur in sync engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A payload failed validation. No writes were issued.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An id did not resolve to an existing document. No writes were
    /// attempted.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        kind: EntityKind,
        /// The id that did not resolve.
        id: DocumentId,
    },

    /// A store call failed mid-flow. Steps committed before the failure
    /// remain committed; re-issuing the mutation converges the state.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Creates a not-found error.
    pub fn not_found(kind: EntityKind, id: DocumentId) -> Self {
        Self::NotFound { kind, id }
    }

    /// Returns true if this error is the caller's fault (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_) | EngineError::NotFound { .. }
        )
    }

    /// Returns true if this error is a backend failure (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self, EngineError::Store(_))
    }
}

/// A violated validation rule.
///
/// Each variant names the rule the payload broke; the display strings
/// are the messages surfaced to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A task payload is missing `name` or `deadline`.
    #[error("name and deadline are required")]
    TaskRequiredFields,

    /// A user payload is missing `name` or `email`.
    #[error("name and email are required")]
    UserRequiredFields,

    /// A task payload references a user that does not exist.
    #[error("assignedUser does not exist")]
    AssignedUserNotFound,

    /// A user payload's email is already taken by another user.
    #[error("email must be unique")]
    EmailNotUnique,
}
