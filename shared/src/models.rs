//! Shared data models.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::validation::{is_truthy, truncate_title};
use crate::{Error, Result};

/// Subject line used for every event announcement.
pub const ANNOUNCEMENT_SUBJECT: &str = "New Event Announcement";

/// Create event request payload.
///
/// `event_title` and `event_datetime` keep their raw JSON value so that an
/// explicit `null` is told apart from an absent key. Optional fields also stay
/// raw until the record is built, where falsy values are dropped.
#[derive(Debug, Default, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default, deserialize_with = "present")]
    pub event_title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub event_datetime: Option<Value>,
    #[serde(default)]
    pub event_description: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Subscribe request payload.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Event record as persisted in the events table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub event_id: String,
    pub event_title: String,
    pub event_datetime: i64,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl EventRecord {
    /// Build a new record with a fresh id.
    ///
    /// The title is truncated and falsy optional fields are dropped. An
    /// optional field holding a truthy non-string value is rejected.
    pub fn new(
        title: &str,
        event_datetime: i64,
        created_at: i64,
        request: &CreateEventRequest,
    ) -> Result<Self> {
        Ok(Self {
            event_id: Uuid::new_v4().to_string(),
            event_title: truncate_title(title),
            event_datetime,
            created_at,
            event_description: optional_text("event_description", &request.event_description)?,
            location: optional_text("location", &request.location)?,
            category: optional_text("category", &request.category)?,
        })
    }

    /// Text of the SNS announcement for this event.
    pub fn announcement(&self) -> String {
        let mut message = format!("New event: {}\n", self.event_title);
        if let Some(description) = &self.event_description {
            message.push_str(description);
            message.push('\n');
        }
        message
    }
}

fn optional_text(field: &str, value: &Option<Value>) -> Result<Option<String>> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Ok(Some(text.clone())),
        Some(other) if is_truthy(other) => Err(Error::Validation(format!(
            "{} must be text, got {}",
            field, other
        ))),
        _ => Ok(None),
    }
}

/// Create event response payload.
#[derive(Debug, Serialize)]
pub struct EventCreatedResponse<'a> {
    pub message: &'a str,
    pub event_id: &'a str,
}
