// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the directory service and cache pipeline

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: One enum for every failure the pipeline and the HTTP layer can hit.
/// Per-item variants (NotFound, ProviderError, DatabaseError, BlobError) are caught by
/// the jobs and counted; the rest surface as HTTP responses.
#[derive(Error, Debug)]
pub enum BeachError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Places provider error: {0}")]
    ProviderError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Blob storage error: {0}")]
    BlobError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BeachError {
    fn code(&self) -> &'static str {
        match self {
            BeachError::NotFound(_) => "NOT_FOUND",
            BeachError::ProviderError(_) => "PROVIDER_ERROR",
            BeachError::DatabaseError(_) => "DATABASE_ERROR",
            BeachError::BlobError(_) => "BLOB_ERROR",
            BeachError::InvalidInput(_) => "INVALID_INPUT",
            BeachError::ValidationError(_) => "VALIDATION_ERROR",
            BeachError::Unauthorized => "UNAUTHORIZED",
            BeachError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Convert BeachError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for BeachError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BeachError::NotFound(_) => StatusCode::NOT_FOUND,
            BeachError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            BeachError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BeachError::BlobError(_) => StatusCode::BAD_GATEWAY,
            BeachError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BeachError::ValidationError(_) => StatusCode::BAD_REQUEST,
            BeachError::Unauthorized => StatusCode::UNAUTHORIZED,
            BeachError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
