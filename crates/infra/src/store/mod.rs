//! Student record storage boundary.
//!
//! `StudentStore` is the capability set the HTTP layer depends on. Two
//! backends ship here: SQLite for real deployments and an in-memory map for
//! tests/dev.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

#[cfg(test)]
mod conformance;

pub use in_memory::InMemoryStudentStore;
pub use r#trait::{StoreError, StudentStore};
pub use sqlite::SqliteStudentStore;
