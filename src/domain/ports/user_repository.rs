use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::User;

/// Repository port for user persistence.
///
/// Implementations must generate no ids themselves (the domain assigns
/// them), provide read-your-writes consistency to the writing caller, and
/// surface zero-row writes so the coordinator can detect no-op updates.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateUsername` / `DuplicateEmail`
    /// when the case-insensitive uniqueness constraints are violated.
    async fn insert(&self, user: &User) -> DomainResult<()>;

    /// Get a user by id.
    async fn get(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Case-insensitive username lookup.
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Persist every mutable field as one single-row write, guarded by the
    /// user's `version`. Fails with `Conflict` when the stored version has
    /// moved on, `UserNotFound` when the row is gone.
    async fn update(&self, user: &User) -> DomainResult<()>;

    /// List all users, ordered by creation time.
    async fn list(&self) -> DomainResult<Vec<User>>;
}
