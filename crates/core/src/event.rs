//! Catalog entities: events, their lifecycle status, and review drafts.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::EventId;

/// Lifecycle status of an event (`"active"`, `"past"`, or server-defined).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventStatus(Cow<'static, str>);

impl EventStatus {
    pub const ACTIVE: EventStatus = EventStatus(Cow::Borrowed("active"));
    pub const PAST: EventStatus = EventStatus(Cow::Borrowed("past"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_active(&self) -> bool {
        self.as_str() == Self::ACTIVE.as_str()
    }

    pub fn is_past(&self) -> bool {
        self.as_str() == Self::PAST.as_str()
    }
}

impl core::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An event as served by `/events` and `/events/:id`.
///
/// Display fields are optional; anything the client does not model is kept
/// in `extra` so a decoded event re-serializes without losing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub is_participant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp::deserialize"
    )]
    pub start_time: Option<NaiveDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp::deserialize"
    )]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants_count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Minimal event with only identity and status, used mostly by tests and
    /// fixtures.
    pub fn new(id: EventId, status: EventStatus) -> Self {
        Self {
            id,
            status: Some(status),
            is_participant: false,
            title: None,
            description: None,
            start_time: None,
            end_time: None,
            location: None,
            image_url: None,
            max_participants: None,
            payment_required: None,
            price: None,
            participants_count: None,
            extra: Map::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.as_ref().is_some_and(EventStatus::is_active)
    }

    pub fn is_past(&self) -> bool {
        self.status.as_ref().is_some_and(EventStatus::is_past)
    }
}

impl Entity for Event {
    type Id = EventId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Body of `POST /events/:id/review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub rating: u8,
    pub text: String,
}

impl ReviewDraft {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    pub fn new(rating: u8, text: impl Into<String>) -> DomainResult<Self> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(DomainError::validation(format!(
                "rating must be between {} and {}, got {}",
                Self::MIN_RATING,
                Self::MAX_RATING,
                rating
            )));
        }
        Ok(Self {
            rating,
            text: text.into(),
        })
    }
}

/// Timestamps arrive as naive ISO-8601 (`2024-05-01T12:30:00`), sometimes
/// with an offset. Unparseable values decode as `None` instead of failing
/// the whole entity.
pub(crate) mod lenient_timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        raw.parse::<NaiveDateTime>().ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
    }
}
