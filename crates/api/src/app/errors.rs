//! Wire envelope for failures.
//!
//! Every failure leaves the service as `{"status": "Error", "error": "<message>"}`
//! with a matching status code. Successful responses carry the raw value.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use students_core::DomainError;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            error: error.into(),
        }
    }
}

/// Request failure, mapped one-to-one onto a status code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed id, empty or undecodable body, field-validation failure.
    #[error("{0}")]
    BadRequest(String),

    /// No record for the id on the read path.
    #[error("{0}")]
    NotFound(String),

    /// Any store failure on a write path.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use students_core::StudentFields;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_errors_are_bad_requests() {
        let err: ApiError = DomainError::invalid_id("abc").into();
        assert_eq!(err, ApiError::BadRequest("invalid id format: abc".to_string()));

        let violations = StudentFields::new("", "ann@x.com", 1).validate().unwrap_err();
        let err: ApiError = DomainError::from(violations).into();
        assert_eq!(err, ApiError::BadRequest("Field Name is required".to_string()));
    }

    #[test]
    fn envelope_shape() {
        let v = serde_json::to_value(ErrorEnvelope::new("boom")).unwrap();
        assert_eq!(v, serde_json::json!({"status": "Error", "error": "boom"}));
    }

    #[test]
    fn response_sets_status_and_json_content_type() {
        let resp = ApiError::NotFound("gone".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
