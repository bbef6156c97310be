//! Business logic for event management

use crate::error::{EventError, Result};
use crate::models::{is_valid_id, now_millis, CreateEvent, Event, UpdateEvent};
use crate::repository::EventRepository;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

/// Event service coordinating validation and persistence
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// List all events
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Event>> {
        self.repository.list().await
    }

    /// List events with a date inside the inclusive `[start, end]` window,
    /// ordered by date ascending
    #[instrument(skip(self))]
    pub async fn list_range(
        &self,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Event>> {
        self.repository.list_range(start, end).await
    }

    /// Create a new event, assigning id and timestamps
    #[instrument(skip(self, create), fields(title = %create.title))]
    pub async fn create(&self, create: CreateEvent) -> Result<Event> {
        create.validate()?;
        let event: Event = create.into();
        self.repository.insert(event).await
    }

    /// Apply a partial update to an existing event.
    ///
    /// The id is checked before the store is touched, so a malformed id
    /// never turns into a lookup.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &str, changes: UpdateEvent) -> Result<Event> {
        if !is_valid_id(id) {
            return Err(EventError::InvalidId { id: id.to_string() });
        }
        changes.validate()?;

        let uuid = parse_id(id)?;
        let updated_at = now_millis();
        self.repository
            .update(&uuid, &changes, updated_at)
            .await?
            .ok_or_else(|| EventError::NotFound { id: id.to_string() })
    }

    /// Delete an event by id
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !is_valid_id(id) {
            return Err(EventError::InvalidId { id: id.to_string() });
        }

        let uuid = parse_id(id)?;
        if self.repository.delete(&uuid).await? {
            Ok(())
        } else {
            Err(EventError::NotFound { id: id.to_string() })
        }
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| EventError::InvalidId { id: id.to_string() })
}
