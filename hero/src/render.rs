//! Render directives handed to the host UI.

use crate::config::HeroConfig;
use crate::overlay::{resolve_overlay, resolve_secondary_badge};
use crate::rotation::HeroState;
use crate::types::{Phase, Route};
use serde::{Deserialize, Serialize};

/// Primary overlay to draw
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayDirective {
    /// Image to draw
    pub image_asset: String,
    /// Where a click goes
    pub action_route: Route,
}

/// "See all events" badge to draw
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDirective {
    /// Image to draw
    pub image_asset: String,
    /// Where a click goes
    pub action_route: Route,
}

/// Everything the host needs to draw the widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderDirective {
    /// Hero image
    pub image_url: String,
    /// Primary overlay, if any
    pub overlay: Option<OverlayDirective>,
    /// Secondary badge, if any
    pub secondary_badge: Option<BadgeDirective>,
}

/// Derive the render directive for the current state
#[must_use]
pub fn render(state: &HeroState, config: &HeroConfig) -> RenderDirective {
    if state.rotation.phase == Phase::Default {
        return RenderDirective {
            image_url: config.default_image.clone(),
            overlay: None,
            secondary_badge: None,
        };
    }

    let image_url = state
        .queue
        .get(state.rotation.current_index)
        .map_or_else(|| config.fallback_media_url.clone(), |entry| entry.media_url().to_string());

    let event = state.rotation.current_event.as_ref();

    let overlay = resolve_overlay(event).map(|overlay| {
        let overlay = if state.overlay_asset_failed {
            overlay.with_fallback_asset()
        } else {
            overlay
        };
        OverlayDirective {
            image_asset: overlay.image_asset.to_string(),
            action_route: overlay.action_route,
        }
    });

    let secondary_badge = resolve_secondary_badge(event).map(|badge| BadgeDirective {
        image_asset: badge.image_asset.to_string(),
        action_route: badge.action_route,
    });

    RenderDirective {
        image_url,
        overlay,
        secondary_badge,
    }
}
