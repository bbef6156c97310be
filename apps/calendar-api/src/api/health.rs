//! Health check endpoint

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, extract::State, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    timestamp: String,
}

/// Create the health check router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check with a database round-trip.
///
/// Reports 200 with `database: "connected"` when the ping succeeds,
/// 500 with the failure details otherwise.
async fn health_check(State(state): State<AppState>) -> Response {
    let status = database::mongodb::check_health_detailed(&state.mongo_client).await;
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    if status.healthy {
        Json(HealthResponse {
            status: "ok".to_string(),
            database: "connected".to_string(),
            timestamp,
        })
        .into_response()
    } else {
        let error = status
            .message
            .unwrap_or_else(|| "unknown database error".to_string());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "database": "disconnected",
                "message": "Database connection failed",
                "error": error,
                "timestamp": timestamp,
            })),
        )
            .into_response()
    }
}
