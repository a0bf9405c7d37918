//! Domain layer for the wellquest core.
//!
//! Pure business logic: the leveling engine, the user/task models, the
//! error taxonomy, and the repository ports.

pub mod errors;
pub mod leveling;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
