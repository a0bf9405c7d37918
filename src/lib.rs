//! Wellquest - wellness task gamification core
//!
//! Users receive tasks tied to self-reported conditions, complete them,
//! and earn experience that drives a leveling curve. The interesting part
//! is the experience/leveling state machine and its task-lifecycle
//! transitions; everything else is plumbing around a document store.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): the leveling engine, user/task models,
//!   error taxonomy, and repository ports
//! - **Adapters** (`adapters`): SQLite implementations of the ports
//! - **Service Layer** (`services`): lifecycle coordination, catalog and
//!   assignment logic, user accounts, config loading
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::leveling::{apply_experience, required_exp};
pub use domain::models::{
    CompletedTask, Condition, Config, DatabaseConfig, LoggingConfig, StoreConfig, Task,
    TaskOwnership, TaskSize, User,
};
pub use domain::ports::{TaskFilter, TaskRepository, UserRepository};
pub use domain::{DomainError, DomainResult};
pub use services::{
    ConfigError, ConfigLoader, TaskCatalogService, TaskLifecycleService, UserService,
};
