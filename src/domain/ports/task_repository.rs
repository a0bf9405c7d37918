use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Condition, Task, TaskSize};

/// Filters for querying tasks
#[derive(Default, Debug, Clone)]
pub struct TaskFilter {
    pub size: Option<TaskSize>,
    pub category: Option<Condition>,
    /// When set, only catalog tasks (for the daily sampling pool)
    pub catalog_only: bool,
    /// When set, only tasks owned by this user
    pub owner: Option<Uuid>,
    pub limit: Option<i64>,
}

/// Repository port for the immutable task catalog.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task. Tasks never change after this.
    async fn insert(&self, task: &Task) -> DomainResult<()>;

    /// Get a task by id.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>>;

    /// List tasks with optional filters.
    async fn list(&self, filter: TaskFilter) -> DomainResult<Vec<Task>>;

    /// Draw `n` distinct catalog tasks of the given size, uniformly at
    /// random and without replacement. Returns fewer than `n` rows when
    /// the bucket is short; the caller decides whether that is an error.
    async fn sample_catalog(&self, size: TaskSize, n: usize) -> DomainResult<Vec<Task>>;

    /// Count catalog tasks of the given size.
    async fn count_catalog(&self, size: TaskSize) -> DomainResult<u64>;
}
