// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::access::AccessError;
use crate::service::DropError;
use crate::store::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert service-layer errors to ApiError
impl From<DropError> for ApiError {
    fn from(err: DropError) -> Self {
        match err {
            DropError::Forbidden(msg) => ApiError::forbidden(msg),
            DropError::InvalidInput(msg) => ApiError::bad_request(msg),
            DropError::NotFound => ApiError::not_found("Drop not found"),
            DropError::CrossTenant => {
                ApiError::forbidden("Drop does not belong to this tenant")
            }
            DropError::Access(e) => e.into(),
            DropError::Store(e) => e.into(),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::CheckFailed(msg) => {
                // Log the real error but return generic message
                tracing::error!("Access check failed: {}", msg);
                ApiError::internal_server_error("Failed to verify tenant access")
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::not_found("Drop not found"),
            StoreError::Unavailable(msg) => {
                tracing::error!("Drop store unreachable: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            StoreError::Backend { status, message } => {
                tracing::error!("Drop store request failed ({}): {}", status, message);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            StoreError::Decode(msg) => {
                tracing::error!("Drop store returned malformed data: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_errors_map_to_http_status_codes() {
        assert_eq!(ApiError::from(DropError::InvalidInput("Content is required")).status_code(), 400);
        assert_eq!(ApiError::from(DropError::Forbidden("Admin access required")).status_code(), 403);
        assert_eq!(ApiError::from(DropError::NotFound).status_code(), 404);
        assert_eq!(ApiError::from(DropError::CrossTenant).status_code(), 403);
        assert_eq!(
            ApiError::from(DropError::Access(AccessError::CheckFailed("down".into()))).status_code(),
            500
        );
    }

    #[test]
    fn store_failures_never_leak_details() {
        let err = ApiError::from(StoreError::Backend {
            status: 500,
            message: "secret internal detail".to_string(),
        });
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("secret"));
    }

    #[test]
    fn error_body_shape() {
        let body = ApiError::unauthorized("Missing Authorization header").to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}
