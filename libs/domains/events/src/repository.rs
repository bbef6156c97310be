//! Event repository trait

use crate::error::Result;
use crate::models::{Event, UpdateEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository trait for event storage operations
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event and return the freshly-read stored record.
    ///
    /// Implementations must read the record back after the insert so the
    /// caller sees exactly what the store accepted.
    async fn insert(&self, event: Event) -> Result<Event>;

    /// List all events in store order
    async fn list(&self) -> Result<Vec<Event>>;

    /// List events with `start <= date <= end`, ordered by date ascending
    async fn list_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Apply a partial update atomically and return the post-update record,
    /// or `None` if no record matched the id. Only fields present in
    /// `changes` are written; `updated_at` is always refreshed.
    async fn update(
        &self,
        id: &Uuid,
        changes: &UpdateEvent,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Event>>;

    /// Delete event by ID; returns whether a record was removed
    async fn delete(&self, id: &Uuid) -> Result<bool>;
}
