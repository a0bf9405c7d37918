//! Service layer coordinating the domain over the injected store ports.

pub mod catalog;
pub mod config;
pub mod lifecycle;
pub mod users;

pub use catalog::TaskCatalogService;
pub use config::{ConfigError, ConfigLoader};
pub use lifecycle::TaskLifecycleService;
pub use users::UserService;
