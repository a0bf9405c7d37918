//! User account service: signup, lookup, and credential checks.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::User;
use crate::domain::ports::UserRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create a new account at level 1 with empty task lists.
    ///
    /// Username and email uniqueness is case-insensitive; the password is
    /// stored only as a digest.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<User> {
        if password.trim().is_empty() {
            return Err(DomainError::Validation("Password cannot be empty".to_string()));
        }

        let user = User::new(
            first_name,
            last_name,
            username,
            email,
            hash_credential(password),
        );
        user.validate().map_err(DomainError::Validation)?;

        self.users.insert(&user).await?;
        info!(user_id = %user.id, username, "user created");

        // Read-your-writes: hand back what the store persisted.
        self.users
            .get(user.id)
            .await?
            .ok_or(DomainError::UserNotFound(user.id))
    }

    /// Check a username/password pair.
    ///
    /// A wrong username and a wrong password produce the same error, so a
    /// caller cannot probe which usernames exist.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> DomainResult<User> {
        let invalid = || DomainError::Validation("invalid username/password combo".to_string());

        let user = self.users.find_by_username(username).await?.ok_or_else(invalid)?;
        if user.credential_hash != hash_credential(password) {
            return Err(invalid());
        }
        Ok(user)
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: Uuid) -> DomainResult<Option<User>> {
        self.users.get(id).await
    }

    /// List all users.
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.users.list().await
    }
}

/// SHA-256 digest of a credential, hex-encoded. Auth hardening (salting,
/// KDF work factors) is outside this core.
fn hash_credential(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteUserRepository};

    async fn setup() -> UserService {
        let pool = create_migrated_test_pool().await.unwrap();
        UserService::new(Arc::new(SqliteUserRepository::new(pool)))
    }

    #[tokio::test]
    async fn signup_creates_level_one_user() {
        let service = setup().await;

        let user = service
            .signup("Adam", "Szyluk", "aszyluk", "aszyluk@example.com", "hunter2")
            .await
            .unwrap();

        assert_eq!(user.level, 1);
        assert_eq!(user.experience, 0);
        assert_ne!(user.credential_hash, "hunter2");
    }

    #[tokio::test]
    async fn signup_rejects_duplicates() {
        let service = setup().await;
        service
            .signup("Adam", "Szyluk", "aszyluk", "a@example.com", "pw")
            .await
            .unwrap();

        let err = service
            .signup("Other", "Person", "ASZYLUK", "b@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateUsername(_)));

        let err = service
            .signup("Other", "Person", "someone", "A@EXAMPLE.COM", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn signup_rejects_blank_fields() {
        let service = setup().await;

        let err = service
            .signup("", "Szyluk", "aszyluk", "a@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .signup("Adam", "Szyluk", "aszyluk", "a@example.com", "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn authenticate_does_not_reveal_which_part_failed() {
        let service = setup().await;
        service
            .signup("Adam", "Szyluk", "aszyluk", "a@example.com", "hunter2")
            .await
            .unwrap();

        let wrong_user = service.authenticate("nobody", "hunter2").await.unwrap_err();
        let wrong_pass = service.authenticate("aszyluk", "wrong").await.unwrap_err();
        assert_eq!(wrong_user.to_string(), wrong_pass.to_string());

        let ok = service.authenticate("aszyluk", "hunter2").await.unwrap();
        assert_eq!(ok.username, "aszyluk");
    }
}
