//! Event domain error types

use axum_helpers::AppError;
use std::fmt;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Event domain errors
#[derive(Debug)]
pub enum EventError {
    /// Event not found
    NotFound { id: String },

    /// Malformed identifier, rejected before reaching the store
    InvalidId { id: String },

    /// Validation error (missing/empty required fields, malformed dates)
    Validation { message: String },

    /// The store did not acknowledge an insert
    InsertFailed,

    /// MongoDB error
    Database {
        message: String,
        source: Option<mongodb::error::Error>,
    },

    /// Serialization error
    Serialization { message: String },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "Event not found: {}", id),
            Self::InvalidId { id } => write!(f, "Invalid event id: {}", id),
            Self::Validation { message } => write!(f, "Validation error: {}", message),
            Self::InsertFailed => write!(f, "Event insert was not acknowledged by the store"),
            Self::Database { message, .. } => write!(f, "Database error: {}", message),
            Self::Serialization { message } => write!(f, "Serialization error: {}", message),
        }
    }
}

impl std::error::Error for EventError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database {
                source: Some(e), ..
            } => Some(e),
            _ => None,
        }
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::Database {
            message: format!("BSON serialization error: {}", err),
            source: None,
        }
    }
}

impl From<mongodb::bson::de::Error> for EventError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::Database {
            message: format!("BSON deserialization error: {}", err),
            source: None,
        }
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for EventError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }
}

// Convert to axum_helpers::AppError for HTTP responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound { id } => AppError::NotFound(format!("Event not found: {}", id)),
            EventError::InvalidId { id } => {
                AppError::BadRequest(format!("Invalid event id: {}", id))
            }
            EventError::Validation { message } => AppError::BadRequest(message),
            EventError::InsertFailed => {
                AppError::InternalServerError("Failed to insert event".to_string())
            }
            EventError::Database { message, .. } => AppError::InternalServerError(message),
            EventError::Serialization { message } => AppError::InternalServerError(message),
        }
    }
}

impl axum::response::IntoResponse for EventError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (
                EventError::NotFound {
                    id: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                EventError::InvalidId {
                    id: "x".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                EventError::Validation {
                    message: "missing title".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (EventError::InsertFailed, StatusCode::INTERNAL_SERVER_ERROR),
            (
                EventError::Database {
                    message: "down".to_string(),
                    source: None,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
