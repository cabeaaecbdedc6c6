//! Event sources feeding the hero queue.
//!
//! An [`EventSource`] hands over an already filtered, already ordered list of
//! hero-eligible events. Filtering and ordering are the source's business; the
//! carousel never re-sorts.
//!
//! # Implementations
//!
//! - [`StaticEventSource`]: fixed list (demo, tests)
//! - [`CatalogEventSource`]: catalog JSON. Only active events starting within
//!   the next [`UPCOMING_WINDOW_MONTHS`] months qualify, soonest first, and each
//!   needs a media item flagged for the hero whose display date has come.
//!
//! # Dyn Compatibility
//!
//! [`EventSource`] returns explicit `Pin<Box<dyn Future>>` values instead of
//! using `async fn`, so it can be held as `Arc<dyn EventSource>` inside the
//! reducer environment and moved into effects.

use crate::types::{EventId, EventRecord};
use chrono::{Months, NaiveDate};
use marquee_core::environment::Clock;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// How far ahead a catalog event may start and still be promoted
pub const UPCOMING_WINDOW_MONTHS: u32 = 3;

/// Errors an event source can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventSourceError {
    /// The source could not be reached or read
    #[error("event source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with data that does not parse
    #[error("malformed event data: {0}")]
    Malformed(String),
}

/// Supplier of hero-eligible events
pub trait EventSource: Send + Sync {
    /// Hero-eligible events, in the order they should be promoted
    ///
    /// # Errors
    ///
    /// Returns [`EventSourceError`] when the events cannot be obtained. The
    /// carousel degrades to its fallback slot in that case.
    fn hero_events(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EventRecord>, EventSourceError>> + Send + '_>>;
}

/// Event source returning a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: Vec<EventRecord>,
}

impl StaticEventSource {
    /// Serve `events` on every call
    #[must_use]
    pub const fn new(events: Vec<EventRecord>) -> Self {
        Self { events }
    }
}

impl EventSource for StaticEventSource {
    fn hero_events(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EventRecord>, EventSourceError>> + Send + '_>>
    {
        Box::pin(futures::future::ready(Ok(self.events.clone())))
    }
}

/// Media item attached to a catalog event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMedia {
    /// Media id
    #[serde(default)]
    pub id: Option<i64>,
    /// Public URL of the file
    #[serde(default)]
    pub file_url: Option<String>,
    /// Flagged for the homepage hero
    #[serde(default)]
    pub is_home_page_hero_image: Option<bool>,
    /// First day the media may be shown (`YYYY-MM-DD`)
    #[serde(default)]
    pub start_displaying_from_date: Option<String>,
}

impl CatalogMedia {
    /// Whether this media may headline the hero on `today`
    ///
    /// Requires the hero flag and a file URL. A missing or unparsable display
    /// date does not block the media.
    #[must_use]
    pub fn is_hero_eligible(&self, today: NaiveDate) -> bool {
        if self.is_home_page_hero_image != Some(true) || self.file_url.is_none() {
            return false;
        }

        let Some(raw) = self.start_displaying_from_date.as_deref() else {
            return true;
        };

        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(display_from) => display_from <= today,
            Err(_) => {
                tracing::warn!(media_id = ?self.id, date = raw, "Invalid display date, allowing media");
                true
            },
        }
    }
}

/// Event as listed by the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEvent {
    /// Event id; events without one are never promoted
    #[serde(default)]
    pub id: Option<i64>,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Free-text admission type
    #[serde(default)]
    pub admission_type: Option<String>,
    /// Attendees must register
    #[serde(default)]
    pub is_registration_required: Option<bool>,
    /// Event is streamed live
    #[serde(default)]
    pub is_live: Option<bool>,
    /// Event is a sports event
    #[serde(default)]
    pub is_sports_event: Option<bool>,
    /// First day of the event (`YYYY-MM-DD`)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Published in the catalog
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Attached media
    #[serde(default)]
    pub media: Vec<CatalogMedia>,
}

impl CatalogEvent {
    /// Parsed start day, if present and well formed
    #[must_use]
    pub fn start_day(&self) -> Option<NaiveDate> {
        let raw = self.start_date.as_deref()?;
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(day) => Some(day),
            Err(_) => {
                tracing::warn!(event_id = ?self.id, date = raw, "Invalid start date, skipping event");
                None
            },
        }
    }

    /// Whether this is an active event starting between `today` and
    /// [`UPCOMING_WINDOW_MONTHS`] months later, both ends included
    #[must_use]
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        if self.is_active != Some(true) {
            return false;
        }
        let Some(start) = self.start_day() else {
            return false;
        };
        let horizon = today
            .checked_add_months(Months::new(UPCOMING_WINDOW_MONTHS))
            .unwrap_or(NaiveDate::MAX);

        (today..=horizon).contains(&start)
    }

    /// Hero record for this event, if it is upcoming, has an id and has an
    /// eligible media item
    ///
    /// The first eligible media item supplies the image.
    #[must_use]
    pub fn to_hero_record(&self, today: NaiveDate) -> Option<EventRecord> {
        if !self.is_upcoming(today) {
            return None;
        }
        let id = self.id?;
        let media = self.media.iter().find(|m| m.is_hero_eligible(today))?;
        let media_url = media.file_url.clone()?;

        Some(EventRecord {
            id: EventId::new(id),
            title: self.title.clone(),
            admission_type: self.admission_type.clone().unwrap_or_default(),
            is_registration_required: self.is_registration_required.unwrap_or(false),
            is_live: self.is_live.unwrap_or(false),
            is_sports_event: self.is_sports_event.unwrap_or(false),
            media_url,
        })
    }
}

/// Event source over a catalog listing
///
/// Filters against the injected clock on every call, so an event enters or
/// leaves the window and a media item becomes eligible on its display date
/// without a reload of the catalog itself. Results are ordered by start
/// date; events starting the same day keep catalog order.
#[derive(Clone)]
pub struct CatalogEventSource {
    events: Vec<CatalogEvent>,
    clock: Arc<dyn Clock>,
}

impl CatalogEventSource {
    /// Wrap already-decoded catalog events
    #[must_use]
    pub fn new(events: Vec<CatalogEvent>, clock: Arc<dyn Clock>) -> Self {
        Self { events, clock }
    }

    /// Decode a JSON array of catalog events
    ///
    /// # Errors
    ///
    /// Returns [`EventSourceError::Malformed`] if the JSON does not match.
    pub fn from_json(json: &str, clock: Arc<dyn Clock>) -> Result<Self, EventSourceError> {
        let events: Vec<CatalogEvent> =
            serde_json::from_str(json).map_err(|e| EventSourceError::Malformed(e.to_string()))?;
        Ok(Self::new(events, clock))
    }

    /// Read and decode a catalog file
    ///
    /// # Errors
    ///
    /// Returns [`EventSourceError::Unavailable`] if the file cannot be read and
    /// [`EventSourceError::Malformed`] if it does not decode.
    pub async fn from_file(
        path: impl AsRef<Path>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EventSourceError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EventSourceError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&json, clock)
    }

    /// Hero records as of the clock's current day
    #[must_use]
    pub fn eligible_events(&self) -> Vec<EventRecord> {
        let today = self.clock.now().date_naive();

        let mut dated: Vec<(NaiveDate, EventRecord)> = self
            .events
            .iter()
            .filter_map(|event| Some((event.start_day()?, event.to_hero_record(today)?)))
            .collect();
        dated.sort_by_key(|(start, _)| *start);
        let eligible: Vec<EventRecord> = dated.into_iter().map(|(_, record)| record).collect();

        tracing::debug!(
            catalog = self.events.len(),
            eligible = eligible.len(),
            %today,
            "Filtered hero events"
        );
        eligible
    }
}

impl EventSource for CatalogEventSource {
    fn hero_events(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EventRecord>, EventSourceError>> + Send + '_>>
    {
        Box::pin(futures::future::ready(Ok(self.eligible_events())))
    }
}
