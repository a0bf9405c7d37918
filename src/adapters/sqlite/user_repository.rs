//! SQLite implementation of the UserRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CompletedTask, User};
use crate::domain::ports::UserRepository;

use super::{parse_datetime, parse_uuid};

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: &User) -> DomainResult<()> {
        let active_json = serde_json::to_string(&user.active_tasks)?;
        let completed_json = serde_json::to_string(&user.completed_tasks)?;

        // Uniqueness is enforced by the NOCASE unique indexes, not by a
        // pre-read: a pre-read would race with concurrent inserts.
        let result = sqlx::query(
            r#"INSERT INTO users (id, first_name, last_name, username, email, credential_hash,
               level, experience, active_tasks, completed_tasks, version, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.credential_hash)
        .bind(i64::from(user.level))
        .bind(i64::from(user.experience))
        .bind(&active_json)
        .bind(&completed_json)
        .bind(user.version)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, user))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Persistence("Could not add user".to_string()));
        }

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT * FROM users WHERE username = ? COLLATE NOCASE")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT * FROM users WHERE email = ? COLLATE NOCASE")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, user: &User) -> DomainResult<()> {
        let active_json = serde_json::to_string(&user.active_tasks)?;
        let completed_json = serde_json::to_string(&user.completed_tasks)?;

        // Single-row write guarded by the version counter: either every
        // field changes together or none do.
        let result = sqlx::query(
            r#"UPDATE users SET first_name = ?, last_name = ?, username = ?, email = ?,
               credential_hash = ?, level = ?, experience = ?, active_tasks = ?,
               completed_tasks = ?, updated_at = ?, version = version + 1
               WHERE id = ? AND version = ?"#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.credential_hash)
        .bind(i64::from(user.level))
        .bind(i64::from(user.experience))
        .bind(&active_json)
        .bind(&completed_json)
        .bind(user.updated_at.to_rfc3339())
        .bind(user.id.to_string())
        .bind(user.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Zero rows is either a stale version or a missing row.
            return if self.get(user.id).await?.is_some() {
                Err(DomainError::Conflict { entity: "user", id: user.id })
            } else {
                Err(DomainError::UserNotFound(user.id))
            };
        }

        Ok(())
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

/// Translate a unique-constraint violation into the matching duplicate
/// error; the violated index name says which field collided.
fn map_insert_error(err: sqlx::Error, user: &User) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let message = db.message();
            if message.contains("username") {
                return DomainError::DuplicateUsername(user.username.clone());
            }
            if message.contains("email") {
                return DomainError::DuplicateEmail(user.email.clone());
            }
        }
    }
    err.into()
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    credential_hash: String,
    level: i64,
    experience: i64,
    active_tasks: String,
    completed_tasks: String,
    version: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let active_tasks: Vec<Uuid> = serde_json::from_str(&row.active_tasks)?;
        let completed_tasks: Vec<CompletedTask> = serde_json::from_str(&row.completed_tasks)?;

        Ok(User {
            id: parse_uuid(&row.id)?,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            email: row.email,
            credential_hash: row.credential_hash,
            level: u32::try_from(row.level)
                .map_err(|e| DomainError::Serialization(e.to_string()))?,
            experience: u32::try_from(row.experience)
                .map_err(|e| DomainError::Serialization(e.to_string()))?,
            active_tasks,
            completed_tasks,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            version: row.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_test_repo() -> SqliteUserRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteUserRepository::new(pool)
    }

    fn test_user(username: &str, email: &str) -> User {
        User::new("Adam", "Szyluk", username, email, "digest")
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let repo = setup_test_repo().await;
        let user = test_user("aszyluk", "aszyluk@example.com");

        repo.insert(&user).await.unwrap();

        let retrieved = repo.get(user.id).await.unwrap().unwrap();
        assert_eq!(retrieved.username, "aszyluk");
        assert_eq!(retrieved.level, 1);
        assert_eq!(retrieved.experience, 0);
        assert!(retrieved.active_tasks.is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_case_insensitively() {
        let repo = setup_test_repo().await;
        repo.insert(&test_user("aszyluk", "a@example.com")).await.unwrap();

        let err = repo
            .insert(&test_user("ASZYLUK", "b@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateUsername(_)));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let repo = setup_test_repo().await;
        repo.insert(&test_user("first", "same@example.com")).await.unwrap();

        let err = repo
            .insert(&test_user("second", "Same@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn lookups_are_case_insensitive() {
        let repo = setup_test_repo().await;
        repo.insert(&test_user("aszyluk", "aszyluk@example.com")).await.unwrap();

        let by_name = repo.find_by_username("ASZYLUK").await.unwrap();
        assert!(by_name.is_some());

        let by_email = repo.find_by_email("Aszyluk@Example.com").await.unwrap();
        assert!(by_email.is_some());
        assert!(repo.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_inserts_with_same_username_surface_duplicate() {
        let repo = setup_test_repo().await;
        let first = test_user("same", "a@example.com");
        let second = test_user("same", "b@example.com");

        // No pre-read window: exactly one insert wins, the loser gets the
        // duplicate error straight from the constraint.
        let (left, right) = tokio::join!(repo.insert(&first), repo.insert(&second));
        let outcomes = [left, right];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);

        let loser = outcomes.iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(
            loser.as_ref().unwrap_err(),
            DomainError::DuplicateUsername(_)
        ));
    }

    #[tokio::test]
    async fn stale_version_update_conflicts() {
        let repo = setup_test_repo().await;
        let user = test_user("aszyluk", "aszyluk@example.com");
        repo.insert(&user).await.unwrap();

        // First write succeeds and bumps the stored version.
        repo.update(&user).await.unwrap();

        // Re-sending the same (now stale) version must conflict.
        let err = repo.update(&user).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { entity: "user", .. }));

        let stored = repo.get(user.id).await.unwrap().unwrap();
        assert_eq!(stored.version, user.version + 1);
    }

    #[tokio::test]
    async fn update_of_missing_user_is_not_found() {
        let repo = setup_test_repo().await;
        let user = test_user("ghost", "ghost@example.com");

        let err = repo.update(&user).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn task_lists_round_trip_in_order() {
        let repo = setup_test_repo().await;
        let mut user = test_user("aszyluk", "aszyluk@example.com");
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        user.assign_task(first);
        user.assign_task(second);

        repo.insert(&user).await.unwrap();

        let stored = repo.get(user.id).await.unwrap().unwrap();
        assert_eq!(stored.active_tasks, vec![first, second]);
    }
}
