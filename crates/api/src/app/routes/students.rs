use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post},
};

use students_core::{Student, StudentId};
use students_infra::StoreError;

use crate::app::SharedStore;
use crate::app::dto::{self, CreatedResponse, MessageResponse};
use crate::app::errors::ApiError;

pub fn router() -> Router {
    Router::new()
        .route("/api/students", post(create_student).get(list_students))
        .route(
            "/api/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

fn parse_id(raw: &str) -> Result<StudentId, ApiError> {
    Ok(raw.parse::<StudentId>()?)
}

pub async fn create_student(
    Extension(store): Extension<SharedStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let fields = dto::decode_student(&body)?;

    let id = store.create(fields).await.map_err(|e| {
        tracing::error!(error = %e, "failed to create student");
        ApiError::internal(e)
    })?;

    tracing::info!(id = %id, "student created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn get_student(
    Extension(store): Extension<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&raw_id)?;

    match store.get(id).await {
        Ok(student) => {
            tracing::info!(id = %id, "student retrieved");
            Ok(Json(student))
        }
        Err(StoreError::NotFound(_)) => {
            tracing::warn!(id = %id, "student not found");
            Err(ApiError::NotFound(format!("student with ID {id} not found")))
        }
        Err(e) => {
            tracing::error!(id = %id, error = %e, "failed to get student");
            Err(ApiError::internal(e))
        }
    }
}

pub async fn list_students(
    Extension(store): Extension<SharedStore>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let students = store.list().await.map_err(|e| {
        tracing::error!(error = %e, "failed to list students");
        ApiError::internal(e)
    })?;

    tracing::info!(count = students.len(), "students listed");
    Ok(Json(students))
}

/// Store failures here, including an unknown id, are reported as 500.
pub async fn update_student(
    Extension(store): Extension<SharedStore>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    let fields = dto::decode_student(&body)?;

    store.update(id, fields).await.map_err(|e| {
        tracing::error!(id = %id, error = %e, "failed to update student");
        ApiError::internal(e)
    })?;

    Ok(Json(MessageResponse::ok(format!(
        "student with ID {id} updated successfully"
    ))))
}

/// Store failures here, including an unknown id, are reported as 500.
pub async fn delete_student(
    Extension(store): Extension<SharedStore>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id)?;

    store.delete(id).await.map_err(|e| {
        tracing::error!(id = %id, error = %e, "failed to delete student");
        ApiError::internal(e)
    })?;

    Ok(Json(MessageResponse::ok(format!(
        "student with ID {id} deleted successfully"
    ))))
}
