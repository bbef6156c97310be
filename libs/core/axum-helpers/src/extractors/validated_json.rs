//! JSON extractor with automatic validation using the validator crate.

use crate::errors::{ErrorCode, ErrorResponse};
use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Deserializes the request body and validates it with the `validator`
/// crate's `Validate` trait. Every rejection (unreadable body, missing or
/// mistyped fields, failed validation rules) becomes a 400 with the shared
/// [`ErrorResponse`] shape, so clients never see the extractor's own
/// status codes.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(length(min = 3, max = 50))]
///     username: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     format!("Creating user: {}", payload.username)
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::info!(
                error_code = ErrorCode::InvalidJson.code(),
                "JSON extraction rejected: {}",
                e.body_text()
            );
            let body = axum::Json(ErrorResponse {
                code: ErrorCode::InvalidJson.code(),
                error: ErrorCode::InvalidJson.as_str().to_string(),
                message: e.body_text(),
                details: None,
            });
            (StatusCode::BAD_REQUEST, body).into_response()
        })?;

        data.validate().map_err(|e| {
            let details = e
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let messages: Vec<serde_json::Value> = errors
                        .iter()
                        .map(|err| {
                            serde_json::json!({
                                "code": err.code,
                                "message": err.message,
                                "params": err.params,
                            })
                        })
                        .collect();
                    (field.to_string(), serde_json::json!(messages))
                })
                .collect::<serde_json::Map<_, _>>();

            let body = axum::Json(ErrorResponse {
                code: ErrorCode::ValidationError.code(),
                error: ErrorCode::ValidationError.as_str().to_string(),
                message: ErrorCode::ValidationError.default_message().to_string(),
                details: Some(serde_json::Value::Object(details)),
            });

            (StatusCode::BAD_REQUEST, body).into_response()
        })?;

        Ok(ValidatedJson(data))
    }
}
