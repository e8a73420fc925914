/// Unified error types for the vidtube backend
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad username/email or password. Deliberately carries no detail:
    /// "no such account" and "wrong password" must be indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired, or otherwise unverifiable token
    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    /// Authenticated but not allowed to touch the resource
    #[error("Not authorized: {0}")]
    Forbidden(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors (duplicate unique field)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Media store errors
    #[error("Media storage error: {0}")]
    MediaStorage(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure half of the wire envelope; parallels the success shape
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub error: String,
    pub message: String,
    pub success: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                self.to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "InvalidCredentials",
                self.to_string(),
            ),
            // Never tell the client whether the token was malformed,
            // expired, or signed with the wrong secret
            ApiError::Unauthenticated(detail) => {
                tracing::debug!("authentication rejected: {}", detail);
                (
                    StatusCode::UNAUTHORIZED,
                    "Unauthenticated",
                    "Unauthorized request".to_string(),
                )
            }
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden", self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound", self.to_string()),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", self.to_string()),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RateLimitExceeded",
                self.to_string(),
            ),
            ApiError::Database(_)
            | ApiError::MediaStorage(_)
            | ApiError::Internal(_)
            | ApiError::Io(_) => {
                tracing::error!("internal failure: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal",
                    "Internal server error".to_string(), // Don't leak details
                )
            }
        };

        let body = Json(ErrorEnvelope {
            status_code: status.as_u16(),
            error: error_code.to_string(),
            message,
            success: false,
        });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_carries_no_detail() {
        let err = ApiError::InvalidCredentials;
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn unauthenticated_response_is_401() {
        let response = ApiError::Unauthenticated("signature mismatch".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_and_forbidden_are_distinct_statuses() {
        let nf = ApiError::NotFound("video".to_string()).into_response();
        let fb = ApiError::Forbidden("not your video".to_string()).into_response();
        assert_eq!(nf.status(), StatusCode::NOT_FOUND);
        assert_eq!(fb.status(), StatusCode::FORBIDDEN);
    }
}
