//! Domain types shared by every hero component.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a catalog event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl EventId {
    /// Wrap a raw catalog id
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw catalog id
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hero-eligible event as supplied by an [`EventSource`](crate::source::EventSource)
///
/// Immutable once produced; the engine only ever reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Unique id
    pub id: EventId,
    /// Display title
    pub title: String,
    /// Free-text admission type (e.g. "Paid Entry", "Free")
    pub admission_type: String,
    /// Attendees must register
    pub is_registration_required: bool,
    /// Event is streamed live
    pub is_live: bool,
    /// Event is a sports event
    pub is_sports_event: bool,
    /// Resolved hero image URL
    pub media_url: String,
}

impl EventRecord {
    /// Create a record with every flag cleared
    #[must_use]
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        admission_type: impl Into<String>,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            admission_type: admission_type.into(),
            is_registration_required: false,
            is_live: false,
            is_sports_event: false,
            media_url: media_url.into(),
        }
    }

    /// Set the registration flag
    #[must_use]
    pub const fn with_registration_required(mut self, required: bool) -> Self {
        self.is_registration_required = required;
        self
    }

    /// Set the live flag
    #[must_use]
    pub const fn with_live(mut self, live: bool) -> Self {
        self.is_live = live;
        self
    }

    /// Set the sports flag
    #[must_use]
    pub const fn with_sports(mut self, sports: bool) -> Self {
        self.is_sports_event = sports;
        self
    }

    /// Whether admission is charged
    ///
    /// True when the admission type mentions `ticket`, `paid` or `fee`,
    /// ignoring case.
    #[must_use]
    pub fn is_ticketed(&self) -> bool {
        let admission = self.admission_type.to_lowercase();
        ["ticket", "paid", "fee"]
            .iter()
            .any(|needle| admission.contains(needle))
    }
}

/// Destination handed to the host page router
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Generic events listing
    EventsListing,
    /// Detail page of one event
    EventDetail(EventId),
}

impl Route {
    /// Router path for this route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::EventsListing => "/events".to_string(),
            Self::EventDetail(id) => format!("/events/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Mode of the rotation state machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Static brand image, no event bound
    #[default]
    Default,
    /// Cycling through the hero queue
    Rotating,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    fn event(admission: &str) -> EventRecord {
        EventRecord::new(EventId::new(1), "Gala", admission, "https://cdn/gala.webp")
    }

    #[test]
    fn test_ticketed_matches_case_insensitively() {
        assert!(event("Paid Entry").is_ticketed());
        assert!(event("TICKETS AT THE DOOR").is_ticketed());
        assert!(event("Entry fee applies").is_ticketed());
        assert!(event("Coffee morning").is_ticketed()); // "fee" substring
        assert!(!event("Free").is_ticketed());
        assert!(!event("").is_ticketed());
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::EventsListing.path(), "/events");
        assert_eq!(Route::EventDetail(EventId::new(42)).path(), "/events/42");
        assert_eq!(Route::EventDetail(EventId::new(7)).to_string(), "/events/7");
    }

    #[test]
    fn test_event_record_uses_camel_case_on_the_wire() {
        let record = event("Free").with_live(true);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["admissionType"], "Free");
        assert_eq!(json["isLive"], true);
        assert_eq!(json["mediaUrl"], "https://cdn/gala.webp");

        let back: EventRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_phase_defaults_to_default() {
        assert_eq!(Phase::default(), Phase::Default);
    }
}
