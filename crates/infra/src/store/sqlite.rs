//! SQLite-backed student store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | SQLite constraint | StoreError |
//! |------------|-------------------|------------|
//! | Database (unique) | `UNIQUE(email)` | `ConstraintViolation` |
//! | Database (check) | `CHECK(age ...)`, `CHECK(length(name) > 0)` | `ConstraintViolation` |
//! | Database (not null) | `NOT NULL` | `ConstraintViolation` |
//! | Database (other) | any other | `Backend` |
//! | anything else | N/A | `Backend` |
//!
//! ## Thread Safety
//!
//! `SqliteStudentStore` is `Send + Sync`. Every operation is a single
//! statement, so SQLite's own write lock makes it atomic; the pool waits on
//! a busy database instead of failing.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{FromRow, Row};
use tracing::{Span, instrument};

use students_core::{Student, StudentFields, StudentId};

use super::r#trait::{StoreError, StudentStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(name) > 0),
    email TEXT NOT NULL UNIQUE,
    age INTEGER NOT NULL CHECK(age >= 0 AND age <= 130)
)
"#;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CONNECTIONS: u32 = 5;

/// Student store over a SQLite database file.
///
/// Ids come from `AUTOINCREMENT`, so SQLite does not hand out a deleted id
/// again within the same database file.
#[derive(Debug, Clone)]
pub struct SqliteStudentStore {
    pool: SqlitePool,
}

impl SqliteStudentStore {
    /// Open (creating if missing) the database at `path` and make sure the
    /// schema exists. Existing data is left untouched.
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("create_dir {}: {e}", parent.display()))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| map_sqlx_error("create_schema", e))?;
        Ok(Self { pool })
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StudentStore for SqliteStudentStore {
    #[instrument(skip_all, fields(id = tracing::field::Empty), err)]
    async fn create(&self, fields: StudentFields) -> Result<StudentId, StoreError> {
        let result = sqlx::query("INSERT INTO students (name, email, age) VALUES (?, ?, ?)")
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(fields.age)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_student", e))?;

        let id = StudentId::new(result.last_insert_rowid());
        Span::current().record("id", id.get());
        Ok(id)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn get(&self, id: StudentId) -> Result<Student, StoreError> {
        let row = sqlx::query("SELECT id, name, email, age FROM students WHERE id = ? LIMIT 1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_student", e))?;

        match row {
            Some(row) => decode_row(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    #[instrument(skip_all, fields(count = tracing::field::Empty), err)]
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        let rows = sqlx::query("SELECT id, name, email, age FROM students")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_students", e))?;

        let students = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;
        Span::current().record("count", students.len());
        Ok(students)
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn update(&self, id: StudentId, fields: StudentFields) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE students SET name = ?, email = ?, age = ? WHERE id = ?")
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(fields.age)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_student", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::info!("student updated");
        Ok(())
    }

    #[instrument(skip_all, fields(id = %id), err)]
    async fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_student", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::info!("student deleted");
        Ok(())
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    use sqlx::error::ErrorKind;

    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("{operation}: {}", db_err.message());
            match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::ForeignKeyViolation => StoreError::ConstraintViolation(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("{operation}: connection pool closed")),
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct StudentRow {
    id: i64,
    name: String,
    email: String,
    age: i64,
}

impl<'r> FromRow<'r, SqliteRow> for StudentRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(StudentRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            age: row.try_get("age")?,
        })
    }
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: StudentId::new(row.id),
            name: row.name,
            email: row.email,
            age: row.age,
        }
    }
}

fn decode_row(row: &SqliteRow) -> Result<Student, StoreError> {
    StudentRow::from_row(row)
        .map(Student::from)
        .map_err(|e| StoreError::Backend(format!("failed to decode student row: {e}")))
}
