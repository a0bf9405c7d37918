//! Implementation of the `wellquest task` commands.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::cli::commands::user::UserView;
use crate::cli::output::{list_table, output, truncate, CommandOutput};
use crate::cli::{AppContext, TaskCommands};
use crate::domain::models::{Condition, Task, TaskSize};
use crate::domain::ports::TaskFilter;

/// Task record as presented to the outer surface.
#[derive(Debug, Serialize)]
pub struct TaskView {
    pub id: String,
    pub name: String,
    pub size: String,
    pub points: u32,
    pub tier: u8,
    pub description: String,
    pub catalog: bool,
    pub category: Option<String>,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            name: task.name.clone(),
            size: task.size.as_str().to_string(),
            points: task.points(),
            tier: task.size.tier(),
            description: task.description.clone(),
            catalog: task.ownership.is_catalog(),
            category: task.category.map(|c| c.as_str().to_string()),
        }
    }
}

impl CommandOutput for TaskView {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("{} ({} pts, tier {})", self.name, self.points, self.tier),
            format!("  ID: {}", self.id),
            format!("  {}", self.description),
        ];
        if let Some(category) = &self.category {
            lines.push(format!("  Category: {category}"));
        }
        lines.push(format!(
            "  Source: {}",
            if self.catalog { "catalog" } else { "user-owned" }
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
struct TaskList {
    tasks: Vec<TaskView>,
}

impl CommandOutput for TaskList {
    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks found.".to_string();
        }
        let mut table = list_table(&["id", "name", "points", "category", "source"]);
        for task in &self.tasks {
            table.add_row(vec![
                truncate(&task.id, 12),
                truncate(&task.name, 40),
                task.points.to_string(),
                task.category.clone().unwrap_or_else(|| "-".to_string()),
                if task.catalog { "catalog" } else { "user" }.to_string(),
            ]);
        }
        format!("{table}\n\nShowing {} task(s)", self.tasks.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.tasks).unwrap_or_default()
    }
}

fn parse_size(s: &str) -> Result<TaskSize> {
    TaskSize::from_str(s)
        .ok_or_else(|| anyhow!("Invalid size: {s}. Must be one of: small, medium, large"))
}

fn parse_category(s: &str) -> Result<Condition> {
    Condition::from_str(s).ok_or_else(|| {
        anyhow!("Invalid category: {s}. Must be one of: anxiety, depression, eating_disorder, schizophrenia")
    })
}

pub async fn execute(command: TaskCommands, json_mode: bool) -> Result<()> {
    let ctx = AppContext::build().await?;

    match command {
        TaskCommands::Add { name, size, description, category, user } => {
            let size = parse_size(&size)?;
            let category = category.as_deref().map(parse_category).transpose()?;

            let task = match user {
                Some(user_id) => {
                    ctx.catalog
                        .add_user_task(user_id, name, size, description, category)
                        .await?
                }
                None => {
                    ctx.catalog
                        .add_catalog_task(name, size, description, category)
                        .await?
                }
            };
            output(&TaskView::from(task), json_mode);
        }
        TaskCommands::Show { task_id } => {
            let task = ctx
                .catalog
                .get_task(task_id)
                .await?
                .with_context(|| format!("Task not found: {task_id}"))?;
            output(&TaskView::from(task), json_mode);
        }
        TaskCommands::List { size, category, catalog } => {
            let filter = TaskFilter {
                size: size.as_deref().map(parse_size).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                catalog_only: catalog,
                ..Default::default()
            };
            let tasks = ctx.catalog.list_tasks(filter).await.context("Failed to list tasks")?;
            let list = TaskList { tasks: tasks.into_iter().map(TaskView::from).collect() };
            output(&list, json_mode);
        }
        TaskCommands::Daily => {
            let tasks = ctx.catalog.daily_tasks().await?;
            let list = TaskList { tasks: tasks.into_iter().map(TaskView::from).collect() };
            output(&list, json_mode);
        }
        TaskCommands::Assign { user_id, conditions } => {
            let conditions: Vec<Condition> = conditions
                .iter()
                .map(|s| parse_category(s))
                .collect::<Result<_>>()?;
            let assigned = ctx.catalog.assign_condition_tasks(user_id, &conditions).await?;
            let list = TaskList { tasks: assigned.into_iter().map(TaskView::from).collect() };
            output(&list, json_mode);
        }
        TaskCommands::Complete { user_id, task_id } => {
            let user = ctx.lifecycle.complete_task(user_id, task_id).await?;
            output(&UserView::from(user), json_mode);
        }
    }

    Ok(())
}
