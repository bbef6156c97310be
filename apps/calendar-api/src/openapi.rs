//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Calendar API",
        version = "0.1.0",
        description = "MongoDB-based REST API for managing calendar events",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    tags(
        (name = "events", description = "Calendar event management endpoints")
    )
)]
pub struct ApiDoc;
