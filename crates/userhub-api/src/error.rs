//! Error to HTTP response mapping

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use userhub_core::error::DomainError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable request: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Every error body is `{"detail": "..."}`.
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UserNotFound | DomainError::GroupNotFound => ApiError::NotFound(err.to_string()),
            DomainError::UsernameAlreadyExists(_)
            | DomainError::EmailAlreadyExists(_)
            | DomainError::GroupNameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            DomainError::ValidationError(msg) => ApiError::Validation(msg),
            DomainError::DatabaseError(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg)
            }
            ApiError::Validation(msg) => {
                tracing::warn!("Unprocessable request: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_mapping() {
        assert!(matches!(ApiError::from(DomainError::UserNotFound), ApiError::NotFound(m) if m == "User not found"));
        assert!(matches!(ApiError::from(DomainError::GroupNotFound), ApiError::NotFound(m) if m == "Group not found"));
        assert!(matches!(
            ApiError::from(DomainError::EmailAlreadyExists("a@b.c".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::ValidationError("bad".into())),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::DatabaseError("locked".into())),
            ApiError::InternalError(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        let status = |e: ApiError| e.into_response().status();
        assert_eq!(status(ApiError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(ApiError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(status(ApiError::Validation("x".into())), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status(ApiError::InternalError("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
