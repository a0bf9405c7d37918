//! Task catalog: creation, deterministic condition assignment, and the
//! random daily selection.

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Condition, Task, TaskSize};
use crate::domain::ports::{TaskFilter, TaskRepository};
use crate::services::lifecycle::TaskLifecycleService;

/// How many tasks of each size make up a daily selection: 3 small,
/// 2 medium, 1 large.
const DAILY_SHAPE: [(TaskSize, usize); 3] = [
    (TaskSize::Small, 3),
    (TaskSize::Medium, 2),
    (TaskSize::Large, 1),
];

/// Fixed per-condition plan: one small, one medium, one large task.
/// Static content, deliberately not randomized.
fn condition_plan(condition: Condition) -> [(&'static str, TaskSize, &'static str); 3] {
    match condition {
        Condition::Anxiety => [
            ("Go for a walk", TaskSize::Small, "It will refresh you!"),
            (
                "Get a massage",
                TaskSize::Medium,
                "While massages can be stressful initially, they help your body and mind relax \
                 while providing a positive experience with others.",
            ),
            ("Painting", TaskSize::Large, "It will refresh you!"),
        ],
        Condition::Depression => [
            (
                "Exercise for 15 minutes",
                TaskSize::Small,
                "Exercising for a small amount of time can help channel negative emotions into \
                 a positive activity.",
            ),
            (
                "Get together with your friends",
                TaskSize::Medium,
                "Social gatherings are hard when you're suffering from depression, but as long \
                 as you have quality friends, seeing them is oftentimes very helpful.",
            ),
            ("Painting", TaskSize::Large, "It will refresh you!"),
        ],
        Condition::EatingDisorder => [
            (
                "Do research on side effects of eating disorders",
                TaskSize::Small,
                "Researching the effects is often used as a preventative measure as people see \
                 how much it messes with your body.",
            ),
            (
                "Make a list of positive affirmations",
                TaskSize::Medium,
                "Making a list of positive statements about yourself helps combat self-image \
                 issues because you can always look at the list to see good things about \
                 yourself.",
            ),
            ("Painting", TaskSize::Large, "It will refresh you!"),
        ],
        Condition::Schizophrenia => [
            (
                "Talk to friends and family",
                TaskSize::Small,
                "Building a support network of friends and family is crucial to living with \
                 schizophrenia.",
            ),
            (
                "Take your medication",
                TaskSize::Medium,
                "Taking medication is the single most important part of controlling \
                 schizophrenia.",
            ),
            ("Painting", TaskSize::Large, "It will refresh you!"),
        ],
    }
}

pub struct TaskCatalogService {
    tasks: Arc<dyn TaskRepository>,
    lifecycle: Arc<TaskLifecycleService>,
}

impl TaskCatalogService {
    pub fn new(tasks: Arc<dyn TaskRepository>, lifecycle: Arc<TaskLifecycleService>) -> Self {
        Self { tasks, lifecycle }
    }

    /// Insert a reusable catalog task.
    #[instrument(skip(self, description))]
    pub async fn add_catalog_task(
        &self,
        name: impl Into<String> + std::fmt::Debug,
        size: TaskSize,
        description: impl Into<String>,
        category: Option<Condition>,
    ) -> DomainResult<Task> {
        let mut task = Task::new(name, size, description);
        if let Some(category) = category {
            task = task.with_category(category);
        }
        task.validate().map_err(DomainError::Validation)?;
        self.tasks.insert(&task).await?;
        Ok(task)
    }

    /// Insert a task owned by one user and put it on their active list.
    #[instrument(skip(self, description))]
    pub async fn add_user_task(
        &self,
        user_id: Uuid,
        name: impl Into<String> + std::fmt::Debug,
        size: TaskSize,
        description: impl Into<String>,
        category: Option<Condition>,
    ) -> DomainResult<Task> {
        let mut task = Task::new(name, size, description).with_owner(user_id);
        if let Some(category) = category {
            task = task.with_category(category);
        }
        task.validate().map_err(DomainError::Validation)?;
        self.tasks.insert(&task).await?;
        self.lifecycle.assign_task(user_id, task.id).await?;
        Ok(task)
    }

    /// Create and assign the fixed plan for each reported condition:
    /// exactly three tasks (small, medium, large) per condition, in plan
    /// order. Conditions are a set; repeats are assigned once.
    #[instrument(skip(self))]
    pub async fn assign_condition_tasks(
        &self,
        user_id: Uuid,
        conditions: &[Condition],
    ) -> DomainResult<Vec<Task>> {
        let mut seen: Vec<Condition> = Vec::with_capacity(conditions.len());
        let mut assigned = Vec::with_capacity(conditions.len() * 3);
        for &condition in conditions {
            if seen.contains(&condition) {
                continue;
            }
            seen.push(condition);
            for (name, size, description) in condition_plan(condition) {
                let task = self
                    .add_user_task(user_id, name, size, description, Some(condition))
                    .await?;
                assigned.push(task);
            }
        }

        info!(%user_id, count = assigned.len(), "condition tasks assigned");
        Ok(assigned)
    }

    /// Draw today's selection: 3 small, 2 medium, and 1 large catalog
    /// task, each bucket sampled uniformly without replacement.
    #[instrument(skip(self))]
    pub async fn daily_tasks(&self) -> DomainResult<Vec<Task>> {
        let mut selection = Vec::with_capacity(6);
        for (size, need) in DAILY_SHAPE {
            let drawn = self.tasks.sample_catalog(size, need).await?;
            if drawn.len() < need {
                return Err(DomainError::InsufficientCatalog {
                    points: size.points(),
                    requested: need,
                    available: drawn.len(),
                });
            }
            selection.extend(drawn);
        }
        Ok(selection)
    }

    /// Get a task by id.
    pub async fn get_task(&self, id: Uuid) -> DomainResult<Option<Task>> {
        self.tasks.get(id).await
    }

    /// List tasks with optional filters.
    pub async fn list_tasks(&self, filter: TaskFilter) -> DomainResult<Vec<Task>> {
        self.tasks.list(filter).await
    }

    /// Seed the reusable catalog with the condition-plan content so the
    /// daily selection has candidates. Idempotent: a non-empty catalog is
    /// left alone.
    #[instrument(skip(self))]
    pub async fn seed_catalog(&self) -> DomainResult<usize> {
        let existing = self
            .tasks
            .list(TaskFilter { catalog_only: true, limit: Some(1), ..Default::default() })
            .await?;
        if !existing.is_empty() {
            return Ok(0);
        }

        let mut seeded = 0;
        for condition in Condition::ALL {
            for (name, size, description) in condition_plan(condition) {
                self.add_catalog_task(name, size, description, Some(condition))
                    .await?;
                seeded += 1;
            }
        }

        info!(seeded, "catalog seeded");
        Ok(seeded)
    }
}
