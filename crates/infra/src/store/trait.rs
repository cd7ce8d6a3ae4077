use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use students_core::{Student, StudentFields, StudentId};

/// Student store operation error.
///
/// ## Error Categories
///
/// - **NotFound**: no present record has the requested id
/// - **ConstraintViolation**: duplicate email, age out of range, empty name
/// - **Backend**: anything else the storage engine reports (I/O, pool, lock)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("student with ID {0} not found")]
    NotFound(StudentId),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("storage error: {0}")]
    Backend(String),
}

/// Persistence boundary for student records.
///
/// One instance is shared by every request handler, so implementations do
/// their own locking. Each mutating call is atomic: two concurrent creates
/// with the same email cannot both succeed, and a delete racing an update
/// on the same id leaves one consistent outcome.
///
/// ## What is not guaranteed
///
/// - `list()` order is backend-defined and may change between calls.
/// - Whether an id is handed out again after its record was deleted.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert a new record and return its store-assigned id.
    async fn create(&self, fields: StudentFields) -> Result<StudentId, StoreError>;

    /// Fetch a present record.
    async fn get(&self, id: StudentId) -> Result<Student, StoreError>;

    /// All present records.
    async fn list(&self) -> Result<Vec<Student>, StoreError>;

    /// Replace name, email and age of a present record in one step.
    async fn update(&self, id: StudentId, fields: StudentFields) -> Result<(), StoreError>;

    /// Remove a present record.
    async fn delete(&self, id: StudentId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> StudentStore for Arc<S>
where
    S: StudentStore + ?Sized,
{
    async fn create(&self, fields: StudentFields) -> Result<StudentId, StoreError> {
        (**self).create(fields).await
    }

    async fn get(&self, id: StudentId) -> Result<Student, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        (**self).list().await
    }

    async fn update(&self, id: StudentId, fields: StudentFields) -> Result<(), StoreError> {
        (**self).update(id, fields).await
    }

    async fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }
}
