//! Command-line interface: a thin surface over the services layer.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands, TaskCommands, UserCommands};

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::sqlite::{initialize_database, SqliteTaskRepository, SqliteUserRepository};
use crate::domain::models::Config;
use crate::services::{ConfigLoader, TaskCatalogService, TaskLifecycleService, UserService};

/// Everything a command needs, wired from config.
pub struct AppContext {
    pub config: Config,
    pub users: UserService,
    pub catalog: TaskCatalogService,
    pub lifecycle: Arc<TaskLifecycleService>,
}

impl AppContext {
    /// Load config, open the database, and wire the services.
    pub async fn build() -> Result<Self> {
        let config = ConfigLoader::load()?;
        let pool = initialize_database(&format!("sqlite:{}", config.database.path))
            .await
            .context("Failed to initialize database")?;

        let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let task_repo = Arc::new(SqliteTaskRepository::new(pool));

        let lifecycle = Arc::new(TaskLifecycleService::new(
            user_repo.clone(),
            task_repo.clone(),
            config.store.clone(),
        ));
        let users = UserService::new(user_repo);
        let catalog = TaskCatalogService::new(task_repo, lifecycle.clone());

        Ok(Self { config, users, catalog, lifecycle })
    }
}

/// Print a failure and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) {
    if json_mode {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).unwrap_or_default()
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
