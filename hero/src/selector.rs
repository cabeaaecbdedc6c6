//! Hero queue selection.
//!
//! Turns the event source's ordered list into the bounded sequence of slots
//! the carousel rotates through. The queue always ends with one event-less
//! fallback slot, so it is never empty.

use crate::types::EventRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum number of event-bearing slots in a queue
pub const MAX_HERO_EVENTS: usize = 3;

/// One slot of the hero queue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroQueueEntry {
    /// Slot bound to an event
    Event {
        /// The promoted event
        event: EventRecord,
        /// Image shown while this slot is active
        media_url: String,
    },
    /// Trailing slot with a static image and no event
    Fallback {
        /// Image shown while this slot is active
        media_url: String,
    },
}

impl HeroQueueEntry {
    /// Event bound to this slot, if any
    #[must_use]
    pub const fn event(&self) -> Option<&EventRecord> {
        match self {
            Self::Event { event, .. } => Some(event),
            Self::Fallback { .. } => None,
        }
    }

    /// Image shown while this slot is active
    #[must_use]
    pub fn media_url(&self) -> &str {
        match self {
            Self::Event { media_url, .. } | Self::Fallback { media_url } => media_url,
        }
    }

    /// Whether this is the fallback slot
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Ordered, non-empty sequence of hero slots
///
/// Built once per data load and never mutated; a reload replaces it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroQueue {
    entries: Vec<HeroQueueEntry>,
}

impl HeroQueue {
    /// Queue holding only the fallback slot
    #[must_use]
    pub fn fallback_only(fallback_media_url: &str) -> Self {
        Self {
            entries: vec![HeroQueueEntry::Fallback {
                media_url: fallback_media_url.to_string(),
            }],
        }
    }

    /// Number of slots, fallback included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HeroQueueEntry> {
        self.entries.get(index)
    }

    /// Event bound to the slot at `index` (`None` for the fallback or out of range)
    #[must_use]
    pub fn event_at(&self, index: usize) -> Option<&EventRecord> {
        self.get(index).and_then(HeroQueueEntry::event)
    }

    /// All slots in rotation order
    #[must_use]
    pub fn entries(&self) -> &[HeroQueueEntry] {
        &self.entries
    }

    /// Number of event-bearing slots
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_fallback()).count()
    }
}

impl Default for HeroQueue {
    fn default() -> Self {
        Self::fallback_only(crate::config::DEFAULT_FALLBACK_MEDIA_URL)
    }
}

/// Build the hero queue from the event source's ordered output
///
/// The first event is the primary slot. The rest of the list is scanned for
/// up to two more events whose ids have not been chosen yet. One fallback
/// slot is always appended, even when three events were found.
#[must_use]
pub fn build_queue(events: &[EventRecord], fallback_media_url: &str) -> HeroQueue {
    let mut chosen = HashSet::with_capacity(MAX_HERO_EVENTS);
    let mut entries = Vec::with_capacity(MAX_HERO_EVENTS + 1);

    for event in events {
        if entries.len() == MAX_HERO_EVENTS {
            break;
        }
        if !chosen.insert(event.id) {
            tracing::trace!(event_id = %event.id, "Skipping duplicate hero event");
            continue;
        }
        entries.push(HeroQueueEntry::Event {
            event: event.clone(),
            media_url: event.media_url.clone(),
        });
    }

    tracing::debug!(
        eligible = events.len(),
        selected = entries.len(),
        "Built hero queue"
    );

    entries.push(HeroQueueEntry::Fallback {
        media_url: fallback_media_url.to_string(),
    });

    HeroQueue { entries }
}
