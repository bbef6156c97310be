//! HTTP handlers for the events API

use crate::error::EventError;
use crate::models::{parse_event_date, CreateEvent, Event, UpdateEvent};
use crate::repository::EventRepository;
use crate::service::EventService;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::ValidatedJson;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

/// Events router state
pub type EventsState<R> = Arc<EventService<R>>;

/// Date window for range queries, both bounds required and inclusive
#[derive(Debug, Deserialize, IntoParams)]
pub struct RangeParams {
    /// Window start (ISO 8601 or YYYY-MM-DD)
    pub start: Option<String>,
    /// Window end (ISO 8601 or YYYY-MM-DD)
    pub end: Option<String>,
}

/// Body returned by a successful delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}

/// Create the events router
pub fn events_router<R: EventRepository + 'static>() -> Router<EventsState<R>> {
    Router::new()
        .route("/", get(list_events::<R>).post(create_event::<R>))
        .route("/range", get(list_events_by_range::<R>))
        .route("/{id}", axum::routing::put(update_event::<R>).delete(delete_event::<R>))
}

/// List all events
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "List of events", body = Vec<Event>),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn list_events<R: EventRepository>(
    State(state): State<EventsState<R>>,
) -> Result<Json<Vec<Event>>, EventError> {
    let events = state.list().await?;
    Ok(Json(events))
}

/// List events inside an inclusive date window, ordered by date
#[utoipa::path(
    get,
    path = "/range",
    params(RangeParams),
    responses(
        (status = 200, description = "Events inside the window", body = Vec<Event>),
        (status = 400, description = "Missing or malformed bounds"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn list_events_by_range<R: EventRepository>(
    State(state): State<EventsState<R>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<Event>>, EventError> {
    let start = parse_bound(params.start.as_deref(), "start")?;
    let end = parse_bound(params.end.as_deref(), "end")?;

    let events = state.list_range(start, end).await?;
    Ok(Json(events))
}

fn parse_bound(
    value: Option<&str>,
    name: &str,
) -> Result<chrono::DateTime<chrono::Utc>, EventError> {
    let raw = value.ok_or_else(|| EventError::Validation {
        message: format!("Missing required query parameter: {name}"),
    })?;
    parse_event_date(raw).ok_or_else(|| EventError::Validation {
        message: format!("Invalid date for query parameter: {name}"),
    })
}

/// Create a new event
#[utoipa::path(
    post,
    path = "/",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state, create), fields(title = %create.title))]
pub async fn create_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    ValidatedJson(create): ValidatedJson<CreateEvent>,
) -> Result<impl IntoResponse, EventError> {
    let event = state.create(create).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Apply a partial update to an event
#[utoipa::path(
    put,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Updated event", body = Event),
        (status = 400, description = "Invalid ID or validation error"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state, changes))]
pub async fn update_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    Path(id): Path<String>,
    ValidatedJson(changes): ValidatedJson<UpdateEvent>,
) -> Result<Json<Event>, EventError> {
    let event = state.update(&id, changes).await?;
    Ok(Json(event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted", body = DeleteResponse),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn delete_event<R: EventRepository>(
    State(state): State<EventsState<R>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, EventError> {
    state.delete(&id).await?;
    Ok(Json(DeleteResponse {
        message: "Event deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_event_date;
    use crate::repository::mock::MockEventRepository;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(mock: MockEventRepository) -> Router {
        let service = Arc::new(EventService::new(Arc::new(mock)));
        events_router().with_state(service)
    }

    fn sample_event() -> Event {
        CreateEvent {
            title: "Standup".to_string(),
            description: Some("Daily".to_string()),
            date: parse_event_date("2024-11-05").unwrap(),
            event_type: "meeting".to_string(),
            time: Some("09:30".to_string()),
        }
        .into()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_event_returns_201_with_defaults() {
        let mut mock = MockEventRepository::new();
        mock.expect_insert().returning(|event| Ok(event));

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "title": "Standup",
                    "date": "2024-11-05",
                    "type": "meeting"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["title"], "Standup");
        assert_eq!(body["type"], "meeting");
        assert_eq!(body["description"], "");
        assert_eq!(body["time"], "");
        assert_eq!(body["date"], "2024-11-05T00:00:00.000Z");
        assert_eq!(body["createdAt"], body["updatedAt"]);
        assert!(body["_id"].is_string());
    }

    #[tokio::test]
    async fn test_create_event_empty_title_is_400() {
        let mock = MockEventRepository::new();

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "title": "",
                    "date": "2024-11-05",
                    "type": "meeting"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_event_missing_title_is_400() {
        let mock = MockEventRepository::new(); // no expectations: store untouched

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "date": "2024-11-05",
                    "type": "meeting"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_create_event_malformed_date_is_400() {
        let mock = MockEventRepository::new();

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "title": "Standup",
                    "date": "soon",
                    "type": "meeting"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_malformed_date_is_400() {
        let mock = MockEventRepository::new();

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/{}", Uuid::now_v7()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "date": "soon" }).to_string()))
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_events() {
        let event = sample_event();
        let expected_id = event.id;

        let mut mock = MockEventRepository::new();
        mock.expect_list().returning(move || Ok(vec![event.clone()]));

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["_id"], expected_id.to_string());
    }

    #[tokio::test]
    async fn test_range_missing_bound_is_400() {
        let mock = MockEventRepository::new();

        let request = Request::builder()
            .uri("/range?start=2024-11-01")
            .body(Body::empty())
            .unwrap();
        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_range_malformed_bound_is_400() {
        let mock = MockEventRepository::new();

        let request = Request::builder()
            .uri("/range?start=yesterday&end=2024-11-30")
            .body(Body::empty())
            .unwrap();
        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_range_returns_events() {
        let event = sample_event();

        let mut mock = MockEventRepository::new();
        mock.expect_list_range()
            .returning(move |_, _| Ok(vec![event.clone()]));

        let request = Request::builder()
            .uri("/range?start=2024-11-01&end=2024-11-30")
            .body(Body::empty())
            .unwrap();
        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_partial_returns_updated_event() {
        let event = sample_event();
        let id = event.id;

        let mut mock = MockEventRepository::new();
        mock.expect_update()
            .returning(move |_, changes, updated_at| {
                let mut updated = event.clone();
                if let Some(time) = &changes.time {
                    updated.time = time.clone();
                }
                updated.updated_at = updated_at;
                Ok(Some(updated))
            });

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/{id}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "time": "21:00" }).to_string()))
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["time"], "21:00");
        assert_eq!(body["title"], "Standup");
    }

    #[tokio::test]
    async fn test_update_invalid_id_is_400() {
        let mock = MockEventRepository::new();

        let request = Request::builder()
            .method("PUT")
            .uri("/not-a-uuid")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "time": "21:00" }).to_string()))
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_returns_message() {
        let mut mock = MockEventRepository::new();
        mock.expect_delete().returning(|_| Ok(true));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/{}", Uuid::now_v7()))
            .body(Body::empty())
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Event deleted successfully");
    }

    #[tokio::test]
    async fn test_delete_missing_event_is_404() {
        let mut mock = MockEventRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/{}", Uuid::now_v7()))
            .body(Body::empty())
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
