//! Implementation of the `wellquest init` command.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use crate::adapters::sqlite::{initialize_database, SqliteTaskRepository, SqliteUserRepository};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::{TaskCatalogService, TaskLifecycleService};

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub database_initialized: bool,
    pub catalog_seeded: usize,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.database_initialized {
            lines.push(format!("Database initialized at {}", Config::default().database.path));
        }
        if self.catalog_seeded > 0 {
            lines.push(format!("Seeded {} catalog task(s)", self.catalog_seeded));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(force: bool, json_mode: bool) -> Result<()> {
    let wellquest_dir = PathBuf::from(".wellquest");
    let config_path = wellquest_dir.join("config.yaml");

    if wellquest_dir.exists() && !force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            config_path,
            database_initialized: false,
            catalog_seeded: 0,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    if force && wellquest_dir.exists() {
        fs::remove_dir_all(&wellquest_dir)
            .await
            .context("Failed to remove existing .wellquest directory")?;
    }

    fs::create_dir_all(&wellquest_dir)
        .await
        .context("Failed to create .wellquest directory")?;

    let config = Config::default();
    let config_yaml =
        serde_yaml::to_string(&config).context("Failed to serialize default config")?;
    fs::write(&config_path, config_yaml)
        .await
        .context("Failed to write config.yaml")?;

    let pool = initialize_database(&format!("sqlite:{}", config.database.path))
        .await
        .context("Failed to initialize database")?;

    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let task_repo = Arc::new(SqliteTaskRepository::new(pool));
    let lifecycle = Arc::new(TaskLifecycleService::new(
        user_repo,
        task_repo.clone(),
        config.store.clone(),
    ));
    let catalog = TaskCatalogService::new(task_repo, lifecycle);
    let catalog_seeded = catalog.seed_catalog().await?;

    let output_data = InitOutput {
        success: true,
        message: "Initialized wellquest project.".to_string(),
        config_path,
        database_initialized: true,
        catalog_seeded,
    };
    output(&output_data, json_mode);
    Ok(())
}

