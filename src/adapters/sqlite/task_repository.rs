//! SQLite implementation of the TaskRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Condition, Task, TaskOwnership, TaskSize};
use crate::domain::ports::{TaskFilter, TaskRepository};

use super::{parse_datetime, parse_uuid};

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn insert(&self, task: &Task) -> DomainResult<()> {
        let (owner_type, owner_ref) = serialize_ownership(task.ownership);

        let result = sqlx::query(
            r#"INSERT INTO tasks (id, name, points, tier, description, owner_type, owner_ref,
               category, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(task.id.to_string())
        .bind(&task.name)
        .bind(i64::from(task.points()))
        .bind(i64::from(task.size.tier()))
        .bind(&task.description)
        .bind(owner_type)
        .bind(owner_ref)
        .bind(task.category.map(Condition::as_str))
        .bind(task.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Persistence("Could not add task".to_string()));
        }

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: TaskFilter) -> DomainResult<Vec<Task>> {
        let mut query = String::from("SELECT * FROM tasks WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(size) = filter.size {
            query.push_str(" AND points = ?");
            bindings.push(size.points().to_string());
        }
        if let Some(category) = filter.category {
            query.push_str(" AND category = ?");
            bindings.push(category.as_str().to_string());
        }
        if filter.catalog_only {
            query.push_str(" AND owner_type = 'catalog'");
        }
        if let Some(owner) = filter.owner {
            query.push_str(" AND owner_type = 'user' AND owner_ref = ?");
            bindings.push(owner.to_string());
        }

        query.push_str(" ORDER BY created_at");

        if let Some(limit) = filter.limit {
            query.push_str(" LIMIT ?");
            bindings.push(limit.to_string());
        }

        let mut q = sqlx::query_as::<_, TaskRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<TaskRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn sample_catalog(&self, size: TaskSize, n: usize) -> DomainResult<Vec<Task>> {
        // ORDER BY RANDOM() is uniform and, with LIMIT, draws without
        // replacement within one call.
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"SELECT * FROM tasks WHERE owner_type = 'catalog' AND points = ?
               ORDER BY RANDOM() LIMIT ?"#,
        )
        .bind(i64::from(size.points()))
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count_catalog(&self, size: TaskSize) -> DomainResult<u64> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE owner_type = 'catalog' AND points = ?")
                .bind(i64::from(size.points()))
                .fetch_one(&self.pool)
                .await?;

        Ok(u64::try_from(result.0).unwrap_or(0))
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    name: String,
    points: i64,
    #[allow(dead_code)]
    tier: i64,
    description: String,
    owner_type: String,
    owner_ref: Option<String>,
    category: Option<String>,
    created_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = DomainError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let points = u32::try_from(row.points)
            .map_err(|e| DomainError::Serialization(e.to_string()))?;
        let size = TaskSize::from_points(points)
            .ok_or_else(|| DomainError::Serialization(format!("Invalid points: {points}")))?;

        let ownership = deserialize_ownership(&row.owner_type, row.owner_ref.as_deref())?;

        let category = row
            .category
            .as_deref()
            .map(|s| {
                Condition::from_str(s)
                    .ok_or_else(|| DomainError::Serialization(format!("Invalid category: {s}")))
            })
            .transpose()?;

        Ok(Task {
            id: parse_uuid(&row.id)?,
            name: row.name,
            size,
            description: row.description,
            ownership,
            category,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

/// Serialize ownership into (owner_type, owner_ref) for DB storage.
fn serialize_ownership(ownership: TaskOwnership) -> (&'static str, Option<String>) {
    match ownership {
        TaskOwnership::Catalog => ("catalog", None),
        TaskOwnership::UserOwned { user_id } => ("user", Some(user_id.to_string())),
    }
}

/// Deserialize (owner_type, owner_ref) from DB into ownership.
fn deserialize_ownership(
    owner_type: &str,
    owner_ref: Option<&str>,
) -> Result<TaskOwnership, DomainError> {
    match owner_type {
        "catalog" => Ok(TaskOwnership::Catalog),
        "user" => {
            let id = owner_ref.ok_or_else(|| {
                DomainError::Serialization("user ownership requires owner_ref".to_string())
            })?;
            Ok(TaskOwnership::UserOwned { user_id: parse_uuid(id)? })
        }
        other => Err(DomainError::Serialization(format!(
            "Unknown owner_type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use std::collections::HashSet;

    async fn setup_test_repo() -> SqliteTaskRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteTaskRepository::new(pool)
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let repo = setup_test_repo().await;
        let task = Task::new("Go for a walk", TaskSize::Small, "It will refresh you!")
            .with_category(Condition::Anxiety);

        repo.insert(&task).await.unwrap();

        let retrieved = repo.get(task.id).await.unwrap().unwrap();
        assert_eq!(retrieved.name, "Go for a walk");
        assert_eq!(retrieved.size, TaskSize::Small);
        assert_eq!(retrieved.category, Some(Condition::Anxiety));
        assert_eq!(retrieved.ownership, TaskOwnership::Catalog);
    }

    #[tokio::test]
    async fn user_owned_ownership_round_trips() {
        let repo = setup_test_repo().await;
        let user_id = Uuid::new_v4();
        let task = Task::new("Get a massage", TaskSize::Medium, "Relax.").with_owner(user_id);

        repo.insert(&task).await.unwrap();

        let retrieved = repo.get(task.id).await.unwrap().unwrap();
        assert_eq!(retrieved.ownership, TaskOwnership::UserOwned { user_id });
    }

    #[tokio::test]
    async fn list_filters_by_size_and_owner() {
        let repo = setup_test_repo().await;
        let user_id = Uuid::new_v4();

        repo.insert(&Task::new("Walk", TaskSize::Small, "d")).await.unwrap();
        repo.insert(&Task::new("Massage", TaskSize::Medium, "d")).await.unwrap();
        repo.insert(&Task::new("Paint", TaskSize::Large, "d").with_owner(user_id))
            .await
            .unwrap();

        let small = repo
            .list(TaskFilter { size: Some(TaskSize::Small), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(small.len(), 1);
        assert_eq!(small[0].name, "Walk");

        let owned = repo
            .list(TaskFilter { owner: Some(user_id), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].name, "Paint");

        let catalog = repo
            .list(TaskFilter { catalog_only: true, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn sample_catalog_is_without_replacement_and_size_bound() {
        let repo = setup_test_repo().await;
        for i in 0..5 {
            repo.insert(&Task::new(format!("Small {i}"), TaskSize::Small, "d"))
                .await
                .unwrap();
        }
        // User-owned tasks never enter the sampling pool.
        repo.insert(&Task::new("Owned", TaskSize::Small, "d").with_owner(Uuid::new_v4()))
            .await
            .unwrap();

        let drawn = repo.sample_catalog(TaskSize::Small, 3).await.unwrap();
        assert_eq!(drawn.len(), 3);

        let ids: HashSet<Uuid> = drawn.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(drawn.iter().all(|t| t.ownership.is_catalog()));
    }

    #[tokio::test]
    async fn sample_catalog_returns_short_when_bucket_is_short() {
        let repo = setup_test_repo().await;
        repo.insert(&Task::new("Only one", TaskSize::Large, "d")).await.unwrap();

        let drawn = repo.sample_catalog(TaskSize::Large, 2).await.unwrap();
        assert_eq!(drawn.len(), 1);
        assert_eq!(repo.count_catalog(TaskSize::Large).await.unwrap(), 1);
    }
}
