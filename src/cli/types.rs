//! CLI type definitions
//!
//! Clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "wellquest")]
#[command(about = "Wellquest - wellness task gamification core", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize wellquest configuration, database, and task catalog
    Init {
        /// Force reinitialization even if already initialized
        #[arg(short, long)]
        force: bool,
    },

    /// User account commands
    #[command(subcommand)]
    User(UserCommands),

    /// Task catalog and lifecycle commands
    #[command(subcommand)]
    Task(TaskCommands),
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a new user account
    Create {
        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,

        /// Username (unique, case-insensitive)
        username: String,

        /// Email address (unique, case-insensitive)
        #[arg(long)]
        email: String,

        /// Password (digested before storage)
        #[arg(long)]
        password: String,
    },

    /// Show a user's level, experience, and task lists
    Show {
        /// User ID
        user_id: Uuid,
    },

    /// List all users
    List,

    /// Check a username/password pair
    Login {
        username: String,

        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to the catalog, or to one user's active list
    Add {
        /// Task name
        name: String,

        /// Size bucket: small (25), medium (50), or large (100)
        #[arg(short, long)]
        size: String,

        /// What to do and why it helps
        #[arg(short, long)]
        description: String,

        /// Condition category tag
        #[arg(short, long)]
        category: Option<String>,

        /// Owner: create this task for one user and assign it
        #[arg(short, long)]
        user: Option<Uuid>,
    },

    /// Show details for a specific task
    Show {
        /// Task ID
        task_id: Uuid,
    },

    /// List tasks
    List {
        /// Filter by size bucket
        #[arg(short, long)]
        size: Option<String>,

        /// Filter by condition category
        #[arg(short, long)]
        category: Option<String>,

        /// Only catalog tasks
        #[arg(long)]
        catalog: bool,
    },

    /// Draw today's selection: 3 small, 2 medium, 1 large
    Daily,

    /// Assign the fixed plan for each reported condition to a user
    Assign {
        /// User ID
        user_id: Uuid,

        /// Conditions (comma-separated): anxiety, depression,
        /// eating_disorder, schizophrenia
        #[arg(short, long, value_delimiter = ',')]
        conditions: Vec<String>,
    },

    /// Complete one of a user's active tasks
    Complete {
        /// User ID
        user_id: Uuid,

        /// Task ID
        task_id: Uuid,
    },
}
