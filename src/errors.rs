// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use tonic::Status;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to an HTTP status code and a gRPC status code
#[derive(Error, Debug)]
pub enum PhotoShareError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Unauthorized create attempt of {0}")]
    UnauthorizedCreate(String),

    #[error("Unauthorized edit attempt of {0}")]
    UnauthorizedEdit(String),

    #[error("Unauthorized deletion attempt of {0}")]
    UnauthorizedDelete(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),
}

impl PhotoShareError {
    fn error_code(&self) -> &'static str {
        match self {
            PhotoShareError::NotFound(_) => "NOT_FOUND",
            PhotoShareError::InvalidInput(_) => "INVALID_INPUT",
            PhotoShareError::ValidationError(_) => "VALIDATION_ERROR",
            PhotoShareError::Unauthorized => "UNAUTHORIZED",
            PhotoShareError::UnauthorizedCreate(_)
            | PhotoShareError::UnauthorizedEdit(_)
            | PhotoShareError::UnauthorizedDelete(_) => "FORBIDDEN",
            PhotoShareError::DatabaseError(_) => "DATABASE_ERROR",
            PhotoShareError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
        }
    }
}

/// Convert PhotoShareError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PhotoShareError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PhotoShareError::NotFound(_) => StatusCode::NOT_FOUND,
            PhotoShareError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PhotoShareError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PhotoShareError::Unauthorized => StatusCode::UNAUTHORIZED,
            PhotoShareError::UnauthorizedCreate(_)
            | PhotoShareError::UnauthorizedEdit(_)
            | PhotoShareError::UnauthorizedDelete(_) => StatusCode::FORBIDDEN,
            PhotoShareError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PhotoShareError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Convert PhotoShareError to a gRPC status
/// DOCUMENTATION: Mirror of the HTTP mapping, used by the Commenter service
impl From<PhotoShareError> for Status {
    fn from(err: PhotoShareError) -> Self {
        let message = err.to_string();
        match err {
            PhotoShareError::NotFound(_) => Status::not_found(message),
            PhotoShareError::InvalidInput(_) | PhotoShareError::ValidationError(_) => {
                Status::invalid_argument(message)
            }
            PhotoShareError::Unauthorized => Status::unauthenticated(message),
            PhotoShareError::UnauthorizedCreate(_)
            | PhotoShareError::UnauthorizedEdit(_)
            | PhotoShareError::UnauthorizedDelete(_) => Status::permission_denied(message),
            PhotoShareError::DatabaseError(_) => Status::internal(message),
            PhotoShareError::ExternalApiError(_) => Status::unavailable(message),
        }
    }
}

impl From<validator::ValidationErrors> for PhotoShareError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PhotoShareError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_and_grpc_not_found() {
        let err = PhotoShareError::NotFound("Photo".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Status::from(err).code(), tonic::Code::NotFound);
    }

    #[test]
    fn ownership_violations_map_to_403_and_permission_denied() {
        for err in [
            PhotoShareError::UnauthorizedEdit("Photo".into()),
            PhotoShareError::UnauthorizedDelete("Comment".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
            assert_eq!(Status::from(err).code(), tonic::Code::PermissionDenied);
        }
    }

    #[test]
    fn missing_identity_maps_to_401_and_unauthenticated() {
        let err = PhotoShareError::Unauthorized;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Status::from(err).code(), tonic::Code::Unauthenticated);
    }
}
