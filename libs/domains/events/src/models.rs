//! Event domain models

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Parse a client-supplied date value.
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2024-10-31T21:00:00Z`, `2024-10-31T21:00:00+02:00`)
/// - Naive datetime, taken as UTC (`2024-10-31T21:00:00`)
/// - Plain date, midnight UTC (`2024-10-31`)
///
/// Returns `None` for anything else; callers reject instead of storing an
/// unparseable value.
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Canonical textual form used both in responses and in storage:
/// `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Fixed width and always UTC, so lexicographic comparison of stored values
/// equals chronological comparison. Range filters rely on this.
pub fn format_event_date(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time truncated to millisecond precision.
///
/// Timestamps round-trip through the canonical form, so anything finer
/// would be lost on the first read-back.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Storage-agnostic identifier capability check.
///
/// The HTTP layer calls this before any store operation so a malformed id
/// is rejected with 400 without touching the database.
pub fn is_valid_id(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}

/// Serde support for the canonical datetime form.
pub mod datetime {
    use super::{format_event_date, parse_event_date};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_event_date(*dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse_event_date(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid date value: {value}")))
    }

    /// Same as the parent module, for `Option<DateTime<Utc>>` fields.
    pub mod option {
        use super::{format_event_date, parse_event_date};
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            dt: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match dt {
                Some(dt) => serializer.serialize_some(&format_event_date(*dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(value) => parse_event_date(&value)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid date value: {value}"))),
                None => Ok(None),
            }
        }
    }
}

/// A calendar event.
///
/// The same serde shape is used for HTTP JSON and for the MongoDB document,
/// so field names here are storage keys too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier, assigned at creation and immutable
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,

    /// Event title
    pub title: String,

    /// Free-form description, empty string when not supplied
    pub description: String,

    /// When the event takes place
    #[serde(with = "datetime")]
    #[schema(value_type = String, format = DateTime)]
    pub date: DateTime<Utc>,

    /// Category label (free-form)
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time-of-day text (e.g. "21:00"), empty string when not supplied
    pub time: String,

    /// When the record was created; never changes afterwards
    #[serde(with = "datetime")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,

    /// Refreshed on every successful update
    #[serde(with = "datetime")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating events.
///
/// `title`, `date` and `type` are required; `description` and `time`
/// default to the empty string.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(with = "datetime")]
    #[schema(value_type = String, format = DateTime)]
    pub date: DateTime<Utc>,

    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type must not be empty"))]
    pub event_type: String,

    #[serde(default)]
    pub time: Option<String>,
}

impl From<CreateEvent> for Event {
    fn from(create: CreateEvent) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::now_v7(),
            title: create.title,
            description: create.description.unwrap_or_default(),
            date: create.date,
            event_type: create.event_type,
            time: create.time.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for partial updates.
///
/// Membership is by presence: a field that appears in the request is
/// applied (including explicitly empty `description`/`time`), an absent
/// field leaves the stored value untouched. Supplied `title`/`type`
/// must still be non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, with = "datetime::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Type must not be empty"))]
    pub event_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}
