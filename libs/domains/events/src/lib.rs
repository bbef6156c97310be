//! Calendar Events Domain
//!
//! CRUD over a single `events` collection with:
//! - MongoDB for persistence
//! - Field-presence validation and partial updates
//! - Inclusive date-range queries
//!
//! # Architecture
//!
//! ```text
//! HTTP (axum handlers)
//!        │
//!        ▼
//! EventService ── validation, id checks, timestamps
//!        │
//!        ▼
//! EventRepository (trait) ── MongoEventRepository (MongoDB)
//! ```

use utoipa::OpenApi;

mod error;
mod handlers;
mod models;
mod mongodb;
mod repository;
mod service;

pub use error::{EventError, Result};
pub use handlers::{events_router, DeleteResponse, RangeParams};
pub use models::{
    format_event_date, is_valid_id, parse_event_date, CreateEvent, Event, UpdateEvent,
};
pub use mongodb::MongoEventRepository;
pub use repository::EventRepository;
pub use service::EventService;

/// OpenAPI documentation for the Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_events,
        handlers::list_events_by_range,
        handlers::create_event,
        handlers::update_event,
        handlers::delete_event,
    ),
    components(schemas(Event, CreateEvent, UpdateEvent, DeleteResponse)),
    tags(
        (name = "events", description = "Calendar event management")
    )
)]
pub struct ApiDoc;
