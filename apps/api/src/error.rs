//! Error types for the Lavka API.
//!
//! The auth chain's taxonomy maps 1:1 onto HTTP statuses:
//!
//! ```text
//! Unauthorized   → 401 + WWW-Authenticate: Bearer   (bad/missing/expired token)
//! InactiveUser   → 400                              (account disabled)
//! Forbidden      → 403                              (missing required role)
//! ```
//!
//! Each is terminal and raised exactly once per failing resolution step;
//! none is retried. Response bodies are `{"detail": "..."}`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use lavka_core::{CoreError, ValidationError};
use lavka_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Token absent, malformed, unknown or expired.
    #[error("Invalid authentication credentials")]
    Unauthorized,

    /// Authenticated account with `is_active = false`.
    #[error("Inactive user")]
    InactiveUser,

    /// Authenticated and active, but missing every required role.
    #[error("Not enough permissions")]
    Forbidden,

    /// Malformed or rejected input.
    #[error("{0}")]
    BadRequest(String),

    /// Entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Unique constraint hit (duplicate barcode, username, ...).
    #[error("{0}")]
    Conflict(String),

    /// Upstream payment provider failure.
    #[error("Payment provider error: {0}")]
    Payment(String),

    /// Database failure surfaced to the client as a 500.
    #[error("Database error")]
    Database(#[source] DbError),

    /// Anything else.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InactiveUser | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Payment(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal detail stays in the server log.
    fn detail(&self) -> String {
        match self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "A database error occurred".to_string()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let challenge = matches!(self, ApiError::Unauthorized);
        let body = Json(json!({ "detail": self.detail() }));

        let mut response = (status, body).into_response();

        if challenge {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::NotFound(format!("{} {}", entity, id)),
            DbError::UniqueViolation { constraint } => {
                ApiError::Conflict(format!("Duplicate value for {}", constraint))
            }
            other => ApiError::Database(other),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::NotFound(format!("Product {}", id)),
            CoreError::UserNotFound(name) => ApiError::NotFound(format!("User {}", name)),
            CoreError::UserAlreadyExists(name) => {
                ApiError::BadRequest(format!("User '{}' already exists", name))
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Result type alias for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InactiveUser.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("Product 1".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_unauthorized_response_carries_bearer_challenge() {
        let response = ApiError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }

    #[test]
    fn test_other_responses_have_no_challenge() {
        let response = ApiError::Forbidden.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_db_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Product", "42").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err: ApiError = DbError::UniqueViolation {
            constraint: "products_barcode_key".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
