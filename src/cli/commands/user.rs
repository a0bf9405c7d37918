//! Implementation of the `wellquest user` commands.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{list_table, output, truncate, CommandOutput};
use crate::cli::{AppContext, UserCommands};
use crate::domain::models::User;

/// User record as presented to the outer surface: id in canonical string
/// form, credential digest omitted.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub level: u32,
    pub experience: u32,
    pub active_tasks: Vec<String>,
    pub completed_tasks: usize,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            email: user.email,
            level: user.level,
            experience: user.experience,
            active_tasks: user.active_tasks.iter().map(ToString::to_string).collect(),
            completed_tasks: user.completed_tasks.len(),
        }
    }
}

impl CommandOutput for UserView {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("{} {} (@{})", self.first_name, self.last_name, self.username),
            format!("  ID: {}", self.id),
            format!("  Email: {}", self.email),
            format!("  Level {} with {} XP", self.level, self.experience),
            format!(
                "  {} active task(s), {} completed",
                self.active_tasks.len(),
                self.completed_tasks
            ),
        ];
        for task_id in &self.active_tasks {
            lines.push(format!("    - {task_id}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
struct UserList {
    users: Vec<UserView>,
}

impl CommandOutput for UserList {
    fn to_human(&self) -> String {
        if self.users.is_empty() {
            return "No users found.".to_string();
        }
        let mut table = list_table(&["id", "username", "name", "level", "xp", "active"]);
        for user in &self.users {
            table.add_row(vec![
                truncate(&user.id, 12),
                user.username.clone(),
                format!("{} {}", user.first_name, user.last_name),
                user.level.to_string(),
                user.experience.to_string(),
                user.active_tasks.len().to_string(),
            ]);
        }
        format!("{table}\n\nShowing {} user(s)", self.users.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.users).unwrap_or_default()
    }
}

pub async fn execute(command: UserCommands, json_mode: bool) -> Result<()> {
    let ctx = AppContext::build().await?;

    match command {
        UserCommands::Create { first_name, last_name, username, email, password } => {
            let user = ctx
                .users
                .signup(&first_name, &last_name, &username, &email, &password)
                .await
                .context("Failed to create user")?;
            output(&UserView::from(user), json_mode);
        }
        UserCommands::Show { user_id } => {
            let user = ctx
                .users
                .get_user(user_id)
                .await?
                .with_context(|| format!("User not found: {user_id}"))?;
            output(&UserView::from(user), json_mode);
        }
        UserCommands::List => {
            let users = ctx.users.list_users().await.context("Failed to list users")?;
            let list = UserList { users: users.into_iter().map(UserView::from).collect() };
            output(&list, json_mode);
        }
        UserCommands::Login { username, password } => {
            let user = ctx.users.authenticate(&username, &password).await?;
            output(&UserView::from(user), json_mode);
        }
    }

    Ok(())
}
