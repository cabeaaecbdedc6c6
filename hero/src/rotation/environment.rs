//! Injected dependencies of the hero reducer.

use crate::config::HeroConfig;
use crate::source::EventSource;
use marquee_core::environment::Navigator;
use std::sync::Arc;
use std::time::Duration;

/// Environment for the hero reducer
///
/// Every port is shared behind an `Arc` so effects can take their own handle.
/// Production wires a real catalog and the page router; tests use
/// `StaticEventSource` and `RecordingNavigator`.
#[derive(Clone)]
pub struct HeroEnvironment {
    source: Arc<dyn EventSource>,
    navigator: Arc<dyn Navigator>,
    config: HeroConfig,
}

impl HeroEnvironment {
    /// Create a new environment
    #[must_use]
    pub fn new(
        source: Arc<dyn EventSource>,
        navigator: Arc<dyn Navigator>,
        config: HeroConfig,
    ) -> Self {
        Self {
            source,
            navigator,
            config,
        }
    }

    /// Event source port
    #[must_use]
    pub fn source(&self) -> Arc<dyn EventSource> {
        Arc::clone(&self.source)
    }

    /// Navigation port
    #[must_use]
    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::clone(&self.navigator)
    }

    /// Carousel configuration
    #[must_use]
    pub const fn config(&self) -> &HeroConfig {
        &self.config
    }

    /// Default phase length
    #[must_use]
    pub const fn default_phase(&self) -> Duration {
        self.config.default_phase()
    }

    /// Rotation period
    #[must_use]
    pub const fn rotation_period(&self) -> Duration {
        self.config.rotation_period()
    }
}
