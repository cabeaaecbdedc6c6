//! # Marquee Hero
//!
//! The homepage hero carousel: selects up to three promoted events, shows a
//! brand image for a short default phase, then rotates through the events on a
//! fixed period, annotating each with at most one call-to-action overlay and
//! routing clicks to exactly one navigation.
//!
//! ## Architecture
//!
//! ```text
//! EventSource ──► Selector ──► HeroQueue ──► HeroReducer (rotation)
//!                                                 │
//!                          ┌──────────────────────┴───────────┐
//!                          ▼                                  ▼
//!                OverlayResolver (render)            ClickRouter ──► Navigator
//! ```
//!
//! - [`selector`], [`overlay`] and [`click`] are pure functions.
//! - [`rotation`] is the only stateful part, a reducer whose timers are
//!   cancellable effects executed by `marquee_runtime::Store` in production
//!   and by `marquee_testing::TestStore` on a virtual clock in tests.
//! - [`carousel`] binds one store to one mounted widget.
//!
//! ## Example
//!
//! ```no_run
//! use marquee_hero::{HeroCarousel, HeroConfig, HeroEnvironment, StaticEventSource};
//! use marquee_core::Navigator;
//! use std::sync::Arc;
//!
//! struct PageRouter;
//!
//! impl Navigator for PageRouter {
//!     fn navigate(&self, path: &str) {
//!         println!("navigate to {path}");
//!     }
//! }
//!
//! # async fn example() -> Result<(), marquee_runtime::StoreError> {
//! let env = HeroEnvironment::new(
//!     Arc::new(StaticEventSource::default()),
//!     Arc::new(PageRouter),
//!     HeroConfig::from_env(),
//! );
//! let carousel = HeroCarousel::new(env);
//!
//! carousel.mount().await?;
//! let directive = carousel.render().await;
//! println!("{}", directive.image_url);
//! carousel.unmount().await;
//! # Ok(())
//! # }
//! ```

pub mod carousel;
pub mod click;
pub mod config;
pub mod overlay;
pub mod render;
pub mod rotation;
pub mod selector;
pub mod source;
pub mod types;

pub use carousel::{HeroCarousel, HeroStore};
pub use click::{ClickTarget, NavigationIntent, route_click};
pub use config::{ConfigError, HeroConfig};
pub use overlay::{
    AssetSlot, OverlayDescriptor, OverlayKind, SecondaryBadge, resolve_overlay,
    resolve_secondary_badge,
};
pub use render::{BadgeDirective, OverlayDirective, RenderDirective, render};
pub use rotation::{
    DEFAULT_PHASE_TIMER, HeroAction, HeroEnvironment, HeroReducer, HeroState, LoadStatus,
    ROTATION_TIMER, RotationState,
};
pub use selector::{HeroQueue, HeroQueueEntry, MAX_HERO_EVENTS, build_queue};
pub use source::{
    CatalogEvent, CatalogEventSource, CatalogMedia, EventSource, EventSourceError,
    StaticEventSource, UPCOMING_WINDOW_MONTHS,
};
pub use types::{EventId, EventRecord, Phase, Route};
