//! Infrastructure layer: student storage backends and configuration.

pub mod config;
pub mod store;

pub use config::{Config, ConfigError};
pub use store::{InMemoryStudentStore, SqliteStudentStore, StoreError, StudentStore};
