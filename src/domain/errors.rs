//! Domain errors for the wellquest core.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors surfaced by the core operations.
///
/// The leveling engine itself never raises; the lifecycle coordinator is
/// the sole translator from store-level failures into this taxonomy.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Task {task_id} is not active for user {user_id}")]
    TaskNotActive { user_id: Uuid, task_id: Uuid },

    #[error("Username {0} is already taken")]
    DuplicateUsername(String),

    #[error("Email {0} is already registered to an account")]
    DuplicateEmail(String),

    #[error("Insufficient catalog: requested {requested} task(s) worth {points} points, only {available} available")]
    InsufficientCatalog {
        points: u32,
        requested: usize,
        available: usize,
    },

    /// Optimistic-lock conflict: the row changed under us. The lifecycle
    /// coordinator retries these a bounded number of times before
    /// translating exhaustion into `Persistence`.
    #[error("Concurrency conflict: {entity} {id} was modified")]
    Conflict { entity: &'static str, id: Uuid },

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    /// Whether this error means a referenced entity is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::TaskNotFound(_))
    }

    /// Whether this error is a rejected state transition rather than a
    /// malformed request or a store failure.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::TaskNotActive { .. } | Self::DuplicateUsername(_) | Self::DuplicateEmail(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
