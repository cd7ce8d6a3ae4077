//! `students-core` — the student record and its field rules.
//!
//! This crate contains **pure domain** types (no HTTP, no storage).

pub mod error;
pub mod id;
pub mod student;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::StudentId;
pub use student::{Student, StudentFields};
pub use validation::{FieldCheck, FieldValue, IntRule, Rule, TextRule, ValidationErrors, Violation};
