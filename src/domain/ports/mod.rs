//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - `UserRepository`: persistence for user records
//! - `TaskRepository`: persistence for the immutable task catalog
//!
//! These contracts keep the domain independent of the SQLite adapters.

pub mod task_repository;
pub mod user_repository;

pub use task_repository::{TaskFilter, TaskRepository};
pub use user_repository::UserRepository;
