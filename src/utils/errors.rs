//! Error handling
//!
//! This module defines every error the API can return and how each one is
//! turned into an HTTP response with a uniform JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::order::OrderStatus;

/// Main application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),
}

/// Error body returned by the API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: &'static str,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &'static str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message,
            details: None,
            code,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Database(e) => {
                log::error!("❌ Database error: {}", e);
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                )
            }

            AppError::Validation(e) => {
                log::warn!("Validation error: {}", e);
                ErrorResponse::new(
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    "VALIDATION_ERROR",
                )
                .with_details(json!(e))
            }

            AppError::Unauthorized(msg) => {
                log::warn!("Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED")
            }

            AppError::Forbidden(msg) => {
                log::warn!("Forbidden access: {}", msg);
                ErrorResponse::new("Forbidden", msg, "FORBIDDEN")
            }

            AppError::NotFound(msg) => {
                log::info!("Resource not found: {}", msg);
                ErrorResponse::new("Not Found", msg, "NOT_FOUND")
            }

            AppError::Conflict(msg) => {
                log::info!("Conflict: {}", msg);
                ErrorResponse::new("Conflict", msg, "CONFLICT")
            }

            AppError::InvalidTransition { from, to } => {
                log::info!("Rejected status transition {} -> {}", from, to);
                ErrorResponse::new(
                    "Invalid Transition",
                    format!("Order status cannot move from {} to {}", from, to),
                    "INVALID_TRANSITION",
                )
                .with_details(json!({ "from": from, "to": to }))
            }

            AppError::BadRequest(msg) => {
                log::info!("Bad request: {}", msg);
                ErrorResponse::new("Bad Request", msg, "BAD_REQUEST")
            }

            AppError::Internal(msg) => {
                log::error!("❌ Internal error: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    "INTERNAL_ERROR",
                )
            }

            AppError::Jwt(msg) => {
                log::warn!("JWT error: {}", msg);
                ErrorResponse::new("JWT Error", msg, "JWT_ERROR")
            }

            AppError::Hash(msg) => {
                log::error!("❌ Hash error: {}", msg);
                ErrorResponse::new(
                    "Hash Error",
                    "An error occurred while processing credentials".to_string(),
                    "HASH_ERROR",
                )
            }

            AppError::Upstream(msg) => {
                log::error!("❌ Upstream API error: {}", msg);
                ErrorResponse::new(
                    "Upstream Error",
                    "The delivery API could not be reached".to_string(),
                    "UPSTREAM_ERROR",
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Helper for a single-field validation error
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Helper for resource-not-found errors
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Helper for uniqueness conflicts
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Helper for forbidden operations
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("Cannot {}: {}", operation, reason))
}

/// Maps a unique-constraint violation to a conflict, anything else stays a database error
pub fn map_unique_violation(error: sqlx::Error, message: &str) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Placed,
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            validation_error("password", "too short").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = not_found_error("Quote", 42);
        assert_eq!(err.to_string(), "Not found: Quote with id '42' not found");
    }
}
