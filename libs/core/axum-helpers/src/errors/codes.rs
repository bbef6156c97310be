//! Type-safe error codes for API responses.
//!
//! This module provides a single source of truth for error codes used across
//! the application. Each error code includes:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
///
/// This enum provides a type-safe way to represent error codes across the
/// application. It combines string identifiers (for clients), integer codes
/// (for monitoring), and default messages (for consistency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Invalid identifier format in path or query parameter
    InvalidId,

    /// Invalid JSON format in request body
    InvalidJson,

    /// Requested resource was not found
    NotFound,

    /// JSON extraction from request body failed
    JsonExtraction,

    // Server errors (1000s)
    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Database errors (2000-2999)
    /// Database connection or query error
    DatabaseError,

    /// Database query returned no results
    DatabaseNotFound,

    // Serialization/IO errors (3000s)
    /// JSON serialization error
    SerdeJsonError,

    /// I/O error
    IoError,
}

impl ErrorCode {
    /// String identifier for clients (SCREAMING_SNAKE_CASE).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }

    /// Integer code for logging and monitoring.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::JsonExtraction => 1005,
            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1503,
            Self::DatabaseError => 2001,
            Self::DatabaseNotFound => 2002,
            Self::SerdeJsonError => 3001,
            Self::IoError => 3002,
        }
    }

    /// Default human-readable message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid identifier format",
            Self::InvalidJson => "Invalid JSON in request body",
            Self::NotFound => "The requested resource was not found",
            Self::JsonExtraction => "Failed to extract JSON from request body",
            Self::InternalError => "An unexpected internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database connection or query error",
            Self::DatabaseNotFound => "Database query returned no results",
            Self::SerdeJsonError => "JSON serialization error",
            Self::IoError => "I/O error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_roundtrip() {
        let code = ErrorCode::ValidationError;
        assert_eq!(code.as_str(), "VALIDATION_ERROR");
        assert_eq!(code.code(), 1001);
        assert_eq!(code.default_message(), "Request validation failed");
    }

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }
}
