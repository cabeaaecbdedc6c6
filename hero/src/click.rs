//! Click routing.
//!
//! Maps a click on the widget to exactly one navigation. Overlay and badge
//! clicks stop propagation so the base image handler never runs for them.

use crate::overlay::resolve_overlay;
use crate::rotation::RotationState;
use crate::types::{Phase, Route};
use serde::{Deserialize, Serialize};

/// Part of the widget that was clicked
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickTarget {
    /// The hero image itself
    BaseImage,
    /// The primary call-to-action overlay
    Overlay,
    /// The "see all events" badge
    SeeAllBadge,
}

/// Where a click navigates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    /// Destination
    pub route: Route,
    /// The click must not reach the base image handler
    pub stop_propagation: bool,
}

impl NavigationIntent {
    /// Router path of the destination
    #[must_use]
    pub fn path(&self) -> String {
        self.route.path()
    }
}

/// Route a click given the current rotation position
///
/// - Overlay: the overlay's own route. A click on an overlay that is no longer
///   shown goes to the events listing.
/// - See-all badge: the events listing.
/// - Base image: the events listing in the default phase or on the fallback
///   slot, otherwise the active event's detail page.
#[must_use]
pub fn route_click(rotation: &RotationState, target: ClickTarget) -> NavigationIntent {
    match target {
        ClickTarget::Overlay => NavigationIntent {
            route: resolve_overlay(rotation.current_event.as_ref())
                .map_or(Route::EventsListing, |overlay| overlay.action_route),
            stop_propagation: true,
        },
        ClickTarget::SeeAllBadge => NavigationIntent {
            route: Route::EventsListing,
            stop_propagation: true,
        },
        ClickTarget::BaseImage => {
            let route = match (rotation.phase, &rotation.current_event) {
                (Phase::Rotating, Some(event)) => Route::EventDetail(event.id),
                (Phase::Rotating, None) | (Phase::Default, _) => Route::EventsListing,
            };
            NavigationIntent {
                route,
                stop_propagation: false,
            }
        },
    }
}
