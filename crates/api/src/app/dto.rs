use serde::{Deserialize, Serialize};

use students_core::{StudentFields, StudentId};

use crate::app::errors::{ApiError, STATUS_OK};

// -------------------------
// Request DTOs
// -------------------------

/// Body of create and update. Missing keys decode to empty/zero so the
/// validation step reports them.
#[derive(Debug, Default, Deserialize)]
pub struct StudentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: i64,
}

impl From<StudentRequest> for StudentFields {
    fn from(req: StudentRequest) -> Self {
        StudentFields::new(req.name, req.email, req.age)
    }
}

/// Decode and validate a create/update body.
///
/// Only the first JSON value is read; anything after it is ignored.
pub fn decode_student(body: &[u8]) -> Result<StudentFields, ApiError> {
    let req = serde_json::Deserializer::from_slice(body)
        .into_iter::<StudentRequest>()
        .next()
        .ok_or_else(|| ApiError::bad_request("request body is empty"))?
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let fields = StudentFields::from(req);
    fields
        .validate()
        .map_err(|e| ApiError::from(students_core::DomainError::from(e)))?;
    Ok(fields)
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: StudentId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            message: message.into(),
        }
    }
}
