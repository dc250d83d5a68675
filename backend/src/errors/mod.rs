//! Error handling module for the storefront publisher.
//!
//! Provides centralized error types with mapping to HTTP status codes and JSON error bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::publish::PublishError;
use crate::storage::StorageError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const CORRUPTED_DATA: &str = "CORRUPTED_DATA";
    pub const PUBLISH_FAILED: &str = "PUBLISH_FAILED";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing request input
    BadRequest(String),
    /// Hard validation errors blocked the operation
    Validation {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
    /// Nothing stored under the requested key
    NotFound(String),
    /// Storage binding or settings are missing or malformed
    Configuration(String),
    /// Object store failure
    Storage(String),
    /// Stored content exists but does not parse
    Corrupted(String),
    /// Write or read-back verification failed
    Publish(String),
    /// Publish history database error
    Database(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Corrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Publish(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Validation { .. } => codes::VALIDATION_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Configuration(_) => codes::CONFIGURATION_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Corrupted(_) => codes::CORRUPTED_DATA,
            AppError::Publish(_) => codes::PUBLISH_FAILED,
            AppError::Database(_) => codes::DATABASE_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Validation { .. } => "Validation failed".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Configuration(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Corrupted(msg) => msg.clone(),
            AppError::Publish(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Storage error: {}", err);
        AppError::Storage(err.to_string())
    }
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::NotConfigured => AppError::Configuration(err.to_string()),
            other => AppError::Publish(other.to_string()),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub timestamp: String,
    /// Set on not-found reads so the storefront switches to sample data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let mut body = Self {
            error: error.message(),
            code: error.error_code().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            fallback: None,
            errors: None,
            warnings: None,
        };

        match error {
            AppError::NotFound(_) => body.fallback = Some(true),
            AppError::Validation { errors, warnings } => {
                body.errors = Some(errors.clone());
                body.warnings = Some(warnings.clone());
            }
            _ => {}
        }

        body
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
