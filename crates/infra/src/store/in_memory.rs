use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use students_core::student::{MAX_AGE, MIN_AGE};
use students_core::{Student, StudentFields, StudentId};

use super::r#trait::{StoreError, StudentStore};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<StudentId, Student>,
    next_id: i64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Table {
    /// Same constraints the SQLite schema declares.
    fn check(&self, fields: &StudentFields, own_id: Option<StudentId>) -> Result<(), StoreError> {
        if fields.name.is_empty() {
            return Err(StoreError::ConstraintViolation("name must not be empty".to_string()));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&fields.age) {
            return Err(StoreError::ConstraintViolation(format!(
                "age {} outside [{MIN_AGE}, {MAX_AGE}]",
                fields.age
            )));
        }
        let taken = self
            .rows
            .values()
            .any(|s| s.email == fields.email && Some(s.id) != own_id);
        if taken {
            return Err(StoreError::ConstraintViolation(format!(
                "email '{}' already exists",
                fields.email
            )));
        }
        Ok(())
    }
}

/// In-memory student store.
///
/// Intended for tests/dev. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStudentStore {
    table: RwLock<Table>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn create(&self, fields: StudentFields) -> Result<StudentId, StoreError> {
        let mut table = self.table.write().map_err(poisoned)?;
        table.check(&fields, None)?;

        let id = StudentId::new(table.next_id);
        table.next_id += 1;
        table.rows.insert(id, fields.into_student(id));
        Ok(id)
    }

    async fn get(&self, id: StudentId) -> Result<Student, StoreError> {
        let table = self.table.read().map_err(poisoned)?;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn update(&self, id: StudentId, fields: StudentFields) -> Result<(), StoreError> {
        let mut table = self.table.write().map_err(poisoned)?;
        if !table.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        table.check(&fields, Some(id))?;
        table.rows.insert(id, fields.into_student(id));
        Ok(())
    }

    async fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        let mut table = self.table.write().map_err(poisoned)?;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
