//! Domain models for the wellquest core.

pub mod config;
pub mod task;
pub mod user;

pub use config::{Config, DatabaseConfig, LoggingConfig, StoreConfig};
pub use task::{Condition, Task, TaskOwnership, TaskSize};
pub use user::{CompletedTask, User};
