//! Unified error handling for the Renta backend
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the application, with automatic HTTP response mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Authentication Errors ====================
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    // ==================== Business Logic Errors ====================
    #[error("Identity record not found: {0}")]
    IdentityNotFound(String),

    #[error("Identity not verified: {0}")]
    IdentityNotVerified(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_) | AppError::InvalidInput(_) | AppError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }

            // 401 Unauthorized
            AppError::InvalidToken(_) | AppError::TokenExpired => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            AppError::Forbidden | AppError::Unauthorized(_) | AppError::IdentityNotVerified(_) => {
                StatusCode::FORBIDDEN
            }

            // 404 Not Found
            AppError::IdentityNotFound(_) | AppError::BookingNotFound(_) | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            AppError::Conflict(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::TokenExpired => "token_expired",
            AppError::InvalidToken(_) => "invalid_token",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden => "forbidden",
            AppError::IdentityNotFound(_) => "identity_not_found",
            AppError::IdentityNotVerified(_) => "identity_not_verified",
            AppError::BookingNotFound(_) => "booking_not_found",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::MissingField(_) => "missing_field",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Server-side failures are logged in full but never leak
        // storage-layer detail to the client.
        let message = if status.is_server_error() {
            error!(error = %self, code = self.error_code(), "internal error");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "error": self.error_code(),
            "message": message,
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::Validation("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::IdentityNotFound("123".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BookingNotFound("123".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("identity already uploaded".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Conflict("dup".to_string()).error_code(),
            "conflict"
        );
        assert_eq!(
            AppError::IdentityNotVerified("x".to_string()).error_code(),
            "identity_not_verified"
        );
    }

    #[test]
    fn test_server_errors_do_not_leak_detail() {
        let err = AppError::Database("connection refused at 10.0.0.5:5432".to_string());
        let resp = err.error_response();
        let body = resp.into_body().try_into_bytes().unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(!body.contains("10.0.0.5"));
        assert!(body.contains("internal server error"));
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::Conflict("identity already uploaded".to_string());
        let resp = err.error_response();
        let body = resp.into_body().try_into_bytes().unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("identity already uploaded"));
    }
}
