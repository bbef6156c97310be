//! MongoDB implementation of EventRepository

use crate::error::{EventError, Result};
use crate::models::{format_event_date, Event, UpdateEvent};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, to_bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use tracing::instrument;
use uuid::Uuid;

/// MongoDB-based event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    /// Create a new MongoDB event repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("events"),
        }
    }

    /// Create indexes for efficient querying
    pub async fn create_indexes(&self) -> Result<()> {
        use mongodb::IndexModel;

        let indexes = vec![
            // Index on date for range queries
            IndexModel::builder().keys(doc! { "date": 1 }).build(),
            // Index on type for category filtering
            IndexModel::builder().keys(doc! { "type": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    /// Build the filter for an inclusive `[start, end]` date window.
    ///
    /// Both bounds use the canonical textual form, so `$gte`/`$lte` string
    /// comparison against stored dates is chronological.
    fn build_range_filter(start: DateTime<Utc>, end: DateTime<Utc>) -> Document {
        doc! {
            "date": {
                "$gte": format_event_date(start),
                "$lte": format_event_date(end),
            }
        }
    }

    /// Build the `$set` document for a partial update.
    ///
    /// Only fields present in `changes` are written; `updatedAt` always is.
    /// Dates go through the canonical textual form, matching how the
    /// document fields are serialized on insert.
    fn build_update_document(changes: &UpdateEvent, updated_at: DateTime<Utc>) -> Document {
        let mut set = Document::new();

        if let Some(title) = &changes.title {
            set.insert("title", title);
        }
        if let Some(description) = &changes.description {
            set.insert("description", description);
        }
        if let Some(date) = changes.date {
            set.insert("date", format_event_date(date));
        }
        if let Some(event_type) = &changes.event_type {
            set.insert("type", event_type);
        }
        if let Some(time) = &changes.time {
            set.insert("time", time);
        }
        set.insert("updatedAt", format_event_date(updated_at));

        doc! { "$set": set }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn insert(&self, event: Event) -> Result<Event> {
        let result = self.collection.insert_one(&event).await?;
        if result.inserted_id == mongodb::bson::Bson::Null {
            return Err(EventError::InsertFailed);
        }

        // Fresh read-back so the caller sees exactly what the store accepted
        let filter = doc! { "_id": to_bson(&event.id)? };
        self.collection
            .find_one(filter)
            .await?
            .ok_or(EventError::InsertFailed)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Event>> {
        let cursor = self.collection.find(doc! {}).await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn list_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>> {
        let filter = Self::build_range_filter(start, end);

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "date": 1 })
            .await?;
        let events: Vec<Event> = cursor.try_collect().await?;
        Ok(events)
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        id: &Uuid,
        changes: &UpdateEvent,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Event>> {
        let filter = doc! { "_id": to_bson(id)? };
        let update = Self::build_update_document(changes, updated_at);

        let event = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let filter = doc! { "_id": to_bson(id)? };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_event_date;

    #[test]
    fn test_build_range_filter_is_inclusive_on_both_bounds() {
        let start = parse_event_date("2024-11-01").unwrap();
        let end = parse_event_date("2024-11-30T23:59:59Z").unwrap();

        let filter = MongoEventRepository::build_range_filter(start, end);
        let date = filter.get_document("date").unwrap();

        let gte = date.get_str("$gte").unwrap();
        let lte = date.get_str("$lte").unwrap();
        assert_eq!(gte, "2024-11-01T00:00:00.000Z");
        assert_eq!(lte, "2024-11-30T23:59:59.000Z");

        // Events stored exactly at either bound satisfy the filter under
        // the string comparison the store applies
        let at_start = format_event_date(start);
        let at_end = format_event_date(end);
        assert!(at_start.as_str() >= gte && at_start.as_str() <= lte);
        assert!(at_end.as_str() >= gte && at_end.as_str() <= lte);

        // Just outside either bound does not
        let before = format_event_date(parse_event_date("2024-10-31T23:59:59Z").unwrap());
        let after = format_event_date(parse_event_date("2024-12-01").unwrap());
        assert!(before.as_str() < gte);
        assert!(after.as_str() > lte);
    }

    #[test]
    fn test_build_update_document_only_present_fields() {
        let changes = UpdateEvent {
            time: Some("21:00".to_string()),
            ..Default::default()
        };
        let updated_at = parse_event_date("2024-11-01T12:00:00Z").unwrap();

        let update = MongoEventRepository::build_update_document(&changes, updated_at);
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("time").unwrap(), "21:00");
        assert_eq!(set.get_str("updatedAt").unwrap(), "2024-11-01T12:00:00.000Z");
        assert!(!set.contains_key("title"));
        assert!(!set.contains_key("description"));
        assert!(!set.contains_key("date"));
        assert!(!set.contains_key("type"));
    }

    #[test]
    fn test_build_update_document_applies_explicit_empty_strings() {
        let changes = UpdateEvent {
            description: Some(String::new()),
            time: Some(String::new()),
            ..Default::default()
        };
        let update =
            MongoEventRepository::build_update_document(&changes, parse_event_date("2024-11-01").unwrap());
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("description").unwrap(), "");
        assert_eq!(set.get_str("time").unwrap(), "");
    }

    #[test]
    fn test_build_update_document_serializes_date_canonically() {
        let changes = UpdateEvent {
            date: parse_event_date("2024-12-24"),
            event_type: Some("holiday".to_string()),
            ..Default::default()
        };
        let update =
            MongoEventRepository::build_update_document(&changes, parse_event_date("2024-11-01").unwrap());
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("date").unwrap(), "2024-12-24T00:00:00.000Z");
        assert_eq!(set.get_str("type").unwrap(), "holiday");
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_insert_and_roundtrip() {
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let repo = MongoEventRepository::new(&client.database("domain_events_test"));

        let create = crate::models::CreateEvent {
            title: "Ritual".to_string(),
            description: None,
            date: parse_event_date("2024-10-31").unwrap(),
            event_type: "ceremony".to_string(),
            time: None,
        };
        let event: Event = create.into();
        let id = event.id;

        let stored = repo.insert(event).await.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.description, "");

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
    }
}
