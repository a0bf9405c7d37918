//! Task lifecycle coordination.
//!
//! The coordinator owns the read-modify-write sequence around a user
//! record: completing a task (active -> completed plus experience
//! settlement) and assigning a task to the active list. Both run under
//! per-user optimistic concurrency with a bounded conflict-retry loop,
//! and every store call is bounded by the configured timeout.

use std::future::Future;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{StoreConfig, Task, User};
use crate::domain::ports::{TaskRepository, UserRepository};

pub struct TaskLifecycleService {
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
    store: StoreConfig,
}

impl TaskLifecycleService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        store: StoreConfig,
    ) -> Self {
        Self { users, tasks, store }
    }

    /// Complete one of a user's active tasks.
    ///
    /// Fetches both records, rejects tasks that are not on the user's
    /// active list, moves the reference to the completed list, settles the
    /// awarded experience through the leveling engine, and persists the
    /// result as a single version-guarded write. Returns the refreshed
    /// user record re-read from the store.
    #[instrument(skip(self))]
    pub async fn complete_task(&self, user_id: Uuid, task_id: Uuid) -> DomainResult<User> {
        let task = self
            .bounded(self.tasks.get(task_id))
            .await?
            .ok_or(DomainError::TaskNotFound(task_id))?;

        let updated = self
            .read_modify_write(user_id, |user| user.complete_task(&task))
            .await?;

        info!(
            user_id = %updated.id,
            task_id = %task.id,
            points = task.points(),
            level = updated.level,
            experience = updated.experience,
            "task completed"
        );
        Ok(updated)
    }

    /// Append a task to a user's active list.
    #[instrument(skip(self))]
    pub async fn assign_task(&self, user_id: Uuid, task_id: Uuid) -> DomainResult<User> {
        let task = self
            .bounded(self.tasks.get(task_id))
            .await?
            .ok_or(DomainError::TaskNotFound(task_id))?;

        let updated = self
            .read_modify_write(user_id, |user| {
                user.assign_task(task.id);
                Ok(())
            })
            .await?;

        info!(user_id = %updated.id, task_id = %task.id, "task assigned");
        Ok(updated)
    }

    /// Read the user, apply `mutate`, and write back under the version
    /// guard. Conflicts re-read and retry up to the configured bound, then
    /// surface as a persistence failure; domain rejections from `mutate`
    /// propagate immediately and leave the stored record untouched.
    async fn read_modify_write<F>(&self, user_id: Uuid, mutate: F) -> DomainResult<User>
    where
        F: Fn(&mut User) -> DomainResult<()>,
    {
        let mut attempt = 0;
        loop {
            let mut user = self
                .bounded(self.users.get(user_id))
                .await?
                .ok_or(DomainError::UserNotFound(user_id))?;

            mutate(&mut user)?;

            match self.bounded(self.users.update(&user)).await {
                Ok(()) => {
                    // Read-your-writes: return what the store now holds.
                    return self
                        .bounded(self.users.get(user_id))
                        .await?
                        .ok_or(DomainError::UserNotFound(user_id));
                }
                Err(DomainError::Conflict { .. }) if attempt < self.store.max_conflict_retries => {
                    attempt += 1;
                    warn!(%user_id, attempt, "user record changed underneath, retrying");
                }
                Err(DomainError::Conflict { .. }) => {
                    return Err(DomainError::Persistence(format!(
                        "update of user {user_id} conflicted {attempt} time(s), giving up"
                    )));
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Bound a store call by the configured timeout; expiry surfaces as a
    /// persistence failure, never as an indefinite block.
    async fn bounded<T>(&self, fut: impl Future<Output = DomainResult<T>>) -> DomainResult<T> {
        match tokio::time::timeout(self.store.timeout(), fut).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Persistence(format!(
                "store call exceeded {}ms",
                self.store.timeout_ms
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteTaskRepository, SqliteUserRepository,
    };
    use crate::domain::models::TaskSize;

    struct Fixture {
        users: Arc<SqliteUserRepository>,
        tasks: Arc<SqliteTaskRepository>,
        service: TaskLifecycleService,
    }

    async fn setup() -> Fixture {
        let pool = create_migrated_test_pool().await.unwrap();
        let users = Arc::new(SqliteUserRepository::new(pool.clone()));
        let tasks = Arc::new(SqliteTaskRepository::new(pool));
        let service = TaskLifecycleService::new(
            users.clone(),
            tasks.clone(),
            StoreConfig::default(),
        );
        Fixture { users, tasks, service }
    }

    async fn seeded_user(fix: &Fixture) -> User {
        let user = User::new("Adam", "Szyluk", "aszyluk", "aszyluk@example.com", "digest");
        fix.users.insert(&user).await.unwrap();
        user
    }

    async fn seeded_task(fix: &Fixture, name: &str, size: TaskSize) -> Task {
        let task = Task::new(name, size, "test description");
        fix.tasks.insert(&task).await.unwrap();
        task
    }

    #[tokio::test]
    async fn complete_task_moves_reference_and_settles_experience() {
        let fix = setup().await;
        let user = seeded_user(&fix).await;
        let task = seeded_task(&fix, "Go for a walk", TaskSize::Medium).await;
        fix.service.assign_task(user.id, task.id).await.unwrap();

        let updated = fix.service.complete_task(user.id, task.id).await.unwrap();

        assert!(updated.active_tasks.is_empty());
        assert_eq!(updated.completed_tasks.len(), 1);
        assert_eq!(updated.completed_tasks[0].task_id, task.id);
        // 50 points from level 1: one level-up, nothing left over.
        assert_eq!(updated.level, 2);
        assert_eq!(updated.experience, 0);
    }

    #[tokio::test]
    async fn complete_task_rejects_unassigned_task_without_mutation() {
        let fix = setup().await;
        let user = seeded_user(&fix).await;
        let task = seeded_task(&fix, "Painting", TaskSize::Large).await;

        let err = fix.service.complete_task(user.id, task.id).await.unwrap_err();
        assert!(matches!(err, DomainError::TaskNotActive { .. }));

        let stored = fix.users.get(user.id).await.unwrap().unwrap();
        assert_eq!(stored.level, 1);
        assert_eq!(stored.experience, 0);
        assert!(stored.completed_tasks.is_empty());
        assert_eq!(stored.version, user.version);
    }

    #[tokio::test]
    async fn complete_task_unknown_ids_are_not_found() {
        let fix = setup().await;
        let user = seeded_user(&fix).await;
        let task = seeded_task(&fix, "Walk", TaskSize::Small).await;

        let err = fix
            .service
            .complete_task(user.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TaskNotFound(_)));

        let err = fix
            .service
            .complete_task(Uuid::new_v4(), task.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn double_completion_is_rejected() {
        let fix = setup().await;
        let user = seeded_user(&fix).await;
        let task = seeded_task(&fix, "Take your medication", TaskSize::Medium).await;
        fix.service.assign_task(user.id, task.id).await.unwrap();

        fix.service.complete_task(user.id, task.id).await.unwrap();
        let err = fix.service.complete_task(user.id, task.id).await.unwrap_err();
        assert!(matches!(err, DomainError::TaskNotActive { .. }));

        let stored = fix.users.get(user.id).await.unwrap().unwrap();
        assert_eq!(stored.completed_tasks.len(), 1);
    }

    #[tokio::test]
    async fn assignment_preserves_order() {
        let fix = setup().await;
        let user = seeded_user(&fix).await;
        let first = seeded_task(&fix, "First", TaskSize::Small).await;
        let second = seeded_task(&fix, "Second", TaskSize::Small).await;

        fix.service.assign_task(user.id, first.id).await.unwrap();
        let updated = fix.service.assign_task(user.id, second.id).await.unwrap();

        assert_eq!(updated.active_tasks, vec![first.id, second.id]);
    }
}
