//! Catalog store: events list, current event, and participation.

use std::sync::{Arc, RwLock};

use rusyle_client::{ApiClient, ApiError};
use rusyle_core::{Entity, Event, EventId, ReviewDraft};
use serde_json::Value;

use crate::messages;
use crate::query::EventQuery;

/// Point-in-time copy of the catalog state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// Events in server response order.
    pub events: Vec<Event>,
    pub current_event: Option<Event>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl CatalogSnapshot {
    pub fn active(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_active())
    }

    pub fn past(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_past())
    }

    /// Events the signed-in user participates in.
    pub fn mine(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_participant)
    }

    /// Write `updated` over every copy of the event requested as `id`: the
    /// list entry (if listed) and the current event (if it is the one being
    /// viewed).
    fn reconcile(&mut self, id: &EventId, updated: &Event) {
        if let Some(slot) = self.events.iter_mut().find(|e| e.id() == id) {
            *slot = updated.clone();
        }
        if let Some(current) = self.current_event.as_mut().filter(|c| c.id() == id) {
            *current = updated.clone();
        }
    }
}

/// Client-side catalog store.
///
/// Reads (`fetch_events`, `fetch_event_by_id`) flag `loading` and record a
/// display message on failure. Mutations (`participate`,
/// `cancel_participation`, `add_review`) leave `loading`/`last_error` alone
/// and hand failures straight back to the caller. State changes only after
/// the server has answered.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api: ApiClient,
    state: RwLock<CatalogSnapshot>,
}

impl CatalogStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: RwLock::new(CatalogSnapshot::default()),
            }),
        }
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.read(|s| s.clone())
    }

    pub fn events(&self) -> Vec<Event> {
        self.read(|s| s.events.clone())
    }

    pub fn current_event(&self) -> Option<Event> {
        self.read(|s| s.current_event.clone())
    }

    pub fn active_events(&self) -> Vec<Event> {
        self.read(|s| s.active().cloned().collect())
    }

    pub fn past_events(&self) -> Vec<Event> {
        self.read(|s| s.past().cloned().collect())
    }

    pub fn my_events(&self) -> Vec<Event> {
        self.read(|s| s.mine().cloned().collect())
    }

    pub fn loading(&self) -> bool {
        self.read(|s| s.loading)
    }

    pub fn last_error(&self) -> Option<String> {
        self.read(|s| s.last_error.clone())
    }

    /// `GET /events`; replaces the whole list with the response.
    pub async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Event>, ApiError> {
        self.begin_read();
        let result = self
            .inner
            .api
            .get_with_query::<Vec<Event>, _>("/events", query)
            .await;

        self.write(|s| {
            match &result {
                Ok(events) => s.events = events.clone(),
                Err(err) => s.last_error = Some(err.message_or(messages::FETCH_EVENTS_FAILED)),
            }
            s.loading = false;
        });

        match &result {
            Ok(events) => tracing::debug!(count = events.len(), "events list replaced"),
            Err(err) => tracing::warn!(error = %err, "failed to fetch events"),
        }
        result
    }

    /// `GET /events/:id`; replaces the current event. The list is untouched.
    pub async fn fetch_event_by_id(&self, id: EventId) -> Result<Event, ApiError> {
        self.begin_read();
        let result = self
            .inner
            .api
            .get::<Event>(&format!("/events/{id}"))
            .await;

        self.write(|s| {
            match &result {
                Ok(event) => s.current_event = Some(event.clone()),
                Err(err) => s.last_error = Some(err.message_or(messages::FETCH_EVENT_FAILED)),
            }
            s.loading = false;
        });

        if let Err(err) = &result {
            tracing::warn!(event_id = id.get(), error = %err, "failed to fetch event");
        }
        result
    }

    /// `POST /events/:id/participate`.
    pub async fn participate(&self, id: EventId) -> Result<Event, ApiError> {
        self.mutate(id, "participate").await
    }

    /// `POST /events/:id/cancel-participation`.
    pub async fn cancel_participation(&self, id: EventId) -> Result<Event, ApiError> {
        self.mutate(id, "cancel-participation").await
    }

    /// `POST /events/:id/review`. Local events are not updated; refetch to
    /// see aggregated ratings.
    pub async fn add_review(&self, id: EventId, review: &ReviewDraft) -> Result<Value, ApiError> {
        self.inner
            .api
            .post::<Value, _>(&format!("/events/{id}/review"), review)
            .await
    }

    async fn mutate(&self, id: EventId, action: &'static str) -> Result<Event, ApiError> {
        let updated = self
            .inner
            .api
            .post_empty::<Event>(&format!("/events/{id}/{action}"))
            .await?;

        if updated.id != id {
            tracing::warn!(
                requested = id.get(),
                returned = updated.id.get(),
                action,
                "server returned a different event"
            );
        }
        self.write(|s| s.reconcile(&id, &updated));
        tracing::info!(
            event_id = id.get(),
            action,
            participant = updated.is_participant,
            "participation updated"
        );
        Ok(updated)
    }

    fn begin_read(&self) {
        self.write(|s| {
            s.loading = true;
            s.last_error = None;
        });
    }

    fn read<R>(&self, f: impl FnOnce(&CatalogSnapshot) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&state)
    }

    fn write(&self, f: impl FnOnce(&mut CatalogSnapshot)) {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state);
    }
}
