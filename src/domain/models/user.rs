//! User domain model.
//!
//! A user's level and experience mutate only through the leveling engine;
//! the task lists mutate only through assignment (active) and completion
//! (active -> completed). Completion is implemented here as a single
//! in-memory mutation so the repository can persist it as one write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::leveling;
use crate::domain::models::Task;

/// Record of one finished task, kept in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub task_id: Uuid,
    pub points: u32,
    pub completed_at: DateTime<Utc>,
}

/// An account with a leveling state and ordered task lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique, case-insensitive
    pub username: String,
    /// Unique, case-insensitive
    pub email: String,
    /// Opaque credential digest; never a plaintext password
    pub credential_hash: String,
    /// Current level, >= 1
    pub level: u32,
    /// Settled experience: always below the next level's threshold
    pub experience: u32,
    /// Ordered references to assigned, not-yet-completed tasks
    pub active_tasks: Vec<Uuid>,
    /// Ordered completion records
    pub completed_tasks: Vec<CompletedTask>,
    /// When created
    pub created_at: DateTime<Utc>,
    /// When last updated
    pub updated_at: DateTime<Utc>,
    /// Version for optimistic locking
    pub version: i64,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        credential_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            email: email.into(),
            credential_hash: credential_hash.into(),
            level: 1,
            experience: 0,
            active_tasks: Vec::new(),
            completed_tasks: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("First name cannot be empty".to_string());
        }
        if self.last_name.trim().is_empty() {
            return Err("Last name cannot be empty".to_string());
        }
        if self.username.trim().is_empty() {
            return Err("Username cannot be empty".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email cannot be empty".to_string());
        }
        if self.credential_hash.is_empty() {
            return Err("Credential hash cannot be empty".to_string());
        }
        Ok(())
    }

    /// Whether a task is currently assigned and uncompleted.
    pub fn has_active_task(&self, task_id: Uuid) -> bool {
        self.active_tasks.contains(&task_id)
    }

    /// Append a task reference to the active list.
    pub fn assign_task(&mut self, task_id: Uuid) {
        self.active_tasks.push(task_id);
        self.touch();
    }

    /// Complete one active task: move exactly one matching reference from
    /// active to completed and settle the awarded experience.
    ///
    /// Fails with `TaskNotActive` without mutating anything when the task
    /// is not on the active list, which is what prevents double-completion
    /// and awarding experience for tasks never assigned.
    pub fn complete_task(&mut self, task: &Task) -> DomainResult<()> {
        let position = self
            .active_tasks
            .iter()
            .position(|&id| id == task.id)
            .ok_or(DomainError::TaskNotActive {
                user_id: self.id,
                task_id: task.id,
            })?;

        self.active_tasks.remove(position);
        self.completed_tasks.push(CompletedTask {
            task_id: task.id,
            points: task.points(),
            completed_at: Utc::now(),
        });

        let (level, experience) =
            leveling::apply_experience(self.level, self.experience, task.points());
        self.level = level;
        self.experience = experience;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TaskSize;

    fn test_user() -> User {
        User::new("Adam", "Szyluk", "aszyluk", "aszyluk@example.com", "digest")
    }

    #[test]
    fn new_user_starts_at_level_one_with_empty_lists() {
        let user = test_user();
        assert_eq!(user.level, 1);
        assert_eq!(user.experience, 0);
        assert!(user.active_tasks.is_empty());
        assert!(user.completed_tasks.is_empty());
        assert_eq!(user.version, 1);
    }

    #[test]
    fn complete_task_moves_reference_and_awards_experience() {
        let mut user = test_user();
        let task = Task::new("Go for a walk", TaskSize::Small, "It will refresh you!");
        user.assign_task(task.id);

        user.complete_task(&task).unwrap();

        assert!(user.active_tasks.is_empty());
        assert_eq!(user.completed_tasks.len(), 1);
        assert_eq!(user.completed_tasks[0].task_id, task.id);
        assert_eq!(user.completed_tasks[0].points, 25);
        assert_eq!(user.level, 1);
        assert_eq!(user.experience, 25);
    }

    #[test]
    fn complete_task_rolls_excess_into_level_ups() {
        let mut user = test_user();
        user.experience = 40;
        let task = Task::new("Painting", TaskSize::Large, "It will refresh you!");
        user.assign_task(task.id);

        user.complete_task(&task).unwrap();

        // 40 + 100 = 140: level 1 -> 2 costs 50, leaving 90 of the 75
        // needed for level 3, so 2 -> 3 leaves 15.
        assert_eq!(user.level, 3);
        assert_eq!(user.experience, 15);
    }

    #[test]
    fn complete_task_not_active_is_rejected_without_mutation() {
        let mut user = test_user();
        let assigned = Task::new("Take your medication", TaskSize::Medium, "Most important.");
        let stray = Task::new("Painting", TaskSize::Large, "It will refresh you!");
        user.assign_task(assigned.id);
        let before = user.clone();

        let err = user.complete_task(&stray).unwrap_err();
        assert!(matches!(err, DomainError::TaskNotActive { .. }));
        assert_eq!(user, before);
    }

    #[test]
    fn complete_task_removes_exactly_one_matching_reference() {
        let mut user = test_user();
        let task = Task::new("Exercise for 15 minutes", TaskSize::Small, "Channel it.");
        // Duplicate assignment: completing once must leave one copy active.
        user.assign_task(task.id);
        user.assign_task(task.id);

        user.complete_task(&task).unwrap();

        assert_eq!(user.active_tasks, vec![task.id]);
        assert_eq!(user.completed_tasks.len(), 1);
    }

    #[test]
    fn second_completion_of_same_task_fails() {
        let mut user = test_user();
        let task = Task::new("Get a massage", TaskSize::Medium, "Relax.");
        user.assign_task(task.id);

        user.complete_task(&task).unwrap();
        let err = user.complete_task(&task).unwrap_err();
        assert!(matches!(err, DomainError::TaskNotActive { .. }));
        assert_eq!(user.completed_tasks.len(), 1);
    }
}
