//! Call-to-action overlays.
//!
//! At most one primary overlay is shown per event, picked by a fixed
//! priority chain. The "see all events" badge is decided independently.

use crate::types::{EventRecord, Route};
use serde::{Deserialize, Serialize};

/// Image shown while the carousel is in its default phase
pub const DEFAULT_HERO_IMAGE: &str =
    "/images/hero_section/default_hero_section_second_column_poster.webp";

/// Image of the "see all events" badge
pub const SEE_ALL_BADGE_IMAGE: &str = "/images/hero_bottom_see_all_events-Photoroom.png";

/// Primary overlay kinds, in priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayKind {
    /// Buy tickets
    Tickets,
    /// Register
    Registration,
    /// Watch live
    Live,
    /// Sports event
    Sports,
}

impl OverlayKind {
    /// Static image asset for this overlay
    #[must_use]
    pub const fn image_asset(self) -> &'static str {
        match self {
            Self::Tickets => "/images/buy_tickets_click_here_red.webp",
            Self::Registration => "/images/register_here_button.png",
            Self::Live => "/images/watch_live_button.png",
            Self::Sports => "/images/sports_event_button.png",
        }
    }
}

/// Resolved primary overlay
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayDescriptor {
    /// Which call to action
    pub kind: OverlayKind,
    /// Image to draw
    pub image_asset: &'static str,
    /// Where a click goes
    pub action_route: Route,
}

impl OverlayDescriptor {
    fn new(kind: OverlayKind, event: &EventRecord) -> Self {
        Self {
            kind,
            image_asset: kind.image_asset(),
            action_route: Route::EventDetail(event.id),
        }
    }

    /// Same overlay drawn with the tickets image
    ///
    /// Used when the overlay's own image fails to load. Kind and route are
    /// unchanged.
    #[must_use]
    pub const fn with_fallback_asset(mut self) -> Self {
        self.image_asset = OverlayKind::Tickets.image_asset();
        self
    }
}

/// Resolve the primary overlay for the active event
///
/// First match wins: ticketed admission, registration required, live, sports.
/// No event (default phase or fallback slot) means no overlay.
#[must_use]
pub fn resolve_overlay(event: Option<&EventRecord>) -> Option<OverlayDescriptor> {
    let event = event?;

    let kind = if event.is_ticketed() {
        OverlayKind::Tickets
    } else if event.is_registration_required {
        OverlayKind::Registration
    } else if event.is_live {
        OverlayKind::Live
    } else if event.is_sports_event {
        OverlayKind::Sports
    } else {
        return None;
    };

    Some(OverlayDescriptor::new(kind, event))
}

/// The "see all events" badge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryBadge {
    /// Image to draw
    pub image_asset: &'static str,
    /// Where a click goes (always the events listing)
    pub action_route: Route,
}

impl Default for SecondaryBadge {
    fn default() -> Self {
        Self {
            image_asset: SEE_ALL_BADGE_IMAGE,
            action_route: Route::EventsListing,
        }
    }
}

/// Resolve the secondary badge for the active event
///
/// Shown for ticketed or registration-required events, whatever primary
/// overlay is also shown.
#[must_use]
pub fn resolve_secondary_badge(event: Option<&EventRecord>) -> Option<SecondaryBadge> {
    event
        .filter(|e| e.is_ticketed() || e.is_registration_required)
        .map(|_| SecondaryBadge::default())
}

/// Image slot that reported a load failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSlot {
    /// The primary overlay image
    Overlay,
    /// The "see all events" badge image
    SeeAllBadge,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::types::EventId;

    fn event(admission: &str) -> EventRecord {
        EventRecord::new(EventId::new(5), "Show", admission, "https://cdn/5.webp")
    }

    #[test]
    fn test_no_event_no_overlay() {
        assert_eq!(resolve_overlay(None), None);
        assert_eq!(resolve_secondary_badge(None), None);
    }

    #[test]
    fn test_tickets_beat_registration() {
        let paid = event("Paid Entry").with_registration_required(true);
        let overlay = resolve_overlay(Some(&paid)).unwrap();

        assert_eq!(overlay.kind, OverlayKind::Tickets);
        assert_eq!(overlay.image_asset, "/images/buy_tickets_click_here_red.webp");
        assert_eq!(overlay.action_route, Route::EventDetail(EventId::new(5)));
    }

    #[test]
    fn test_live_beats_sports() {
        let match_day = event("Free").with_live(true).with_sports(true);
        let overlay = resolve_overlay(Some(&match_day)).unwrap();

        assert_eq!(overlay.kind, OverlayKind::Live);
    }

    #[test]
    fn test_each_flag_alone() {
        let registration = event("Free").with_registration_required(true);
        let sports = event("Free").with_sports(true);

        assert_eq!(
            resolve_overlay(Some(&registration)).map(|o| o.kind),
            Some(OverlayKind::Registration)
        );
        assert_eq!(
            resolve_overlay(Some(&sports)).map(|o| o.kind),
            Some(OverlayKind::Sports)
        );
    }

    #[test]
    fn test_plain_free_event_has_no_overlay() {
        assert_eq!(resolve_overlay(Some(&event("Free"))), None);
    }

    #[test]
    fn test_badge_independent_of_primary_overlay() {
        // Tickets overlay wins, badge still shows
        let both = event("Ticketed").with_registration_required(true);
        assert!(resolve_secondary_badge(Some(&both)).is_some());

        // Registration outranks live, badge shows
        let live = event("Free").with_live(true).with_registration_required(true);
        assert_eq!(
            resolve_overlay(Some(&live)).map(|o| o.kind),
            Some(OverlayKind::Registration)
        );
        let badge = resolve_secondary_badge(Some(&live)).unwrap();
        assert_eq!(badge.action_route, Route::EventsListing);
        assert_eq!(badge.image_asset, SEE_ALL_BADGE_IMAGE);

        // Live only: overlay, no badge
        let live_only = event("Free").with_live(true);
        assert!(resolve_overlay(Some(&live_only)).is_some());
        assert_eq!(resolve_secondary_badge(Some(&live_only)), None);
    }

    #[test]
    fn test_fallback_asset_keeps_kind_and_route() {
        let sports = event("Free").with_sports(true);
        let overlay = resolve_overlay(Some(&sports)).unwrap().with_fallback_asset();

        assert_eq!(overlay.kind, OverlayKind::Sports);
        assert_eq!(overlay.image_asset, OverlayKind::Tickets.image_asset());
        assert_eq!(overlay.action_route, Route::EventDetail(EventId::new(5)));
    }
}
