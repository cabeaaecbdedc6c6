//! One mounted hero widget on the production runtime.

use crate::click::ClickTarget;
use crate::config::HeroConfig;
use crate::overlay::AssetSlot;
use crate::render::{RenderDirective, render};
use crate::rotation::{HeroAction, HeroEnvironment, HeroReducer, HeroState, RotationState};
use marquee_runtime::{Store, StoreError};
use tokio::sync::broadcast;

/// Store type backing a carousel
pub type HeroStore = Store<HeroState, HeroAction, HeroEnvironment, HeroReducer>;

/// Hero carousel bound to one store
///
/// The store owns every timer the carousel starts. [`HeroCarousel::unmount`]
/// cancels them and tears the store down, after which no timer callback can
/// reach the state.
///
/// # Example
///
/// ```ignore
/// let carousel = HeroCarousel::new(env);
/// carousel.mount().await?;
///
/// let directive = carousel.render().await;
/// carousel.click(ClickTarget::BaseImage).await?;
///
/// carousel.unmount().await;
/// ```
#[derive(Clone)]
pub struct HeroCarousel {
    store: HeroStore,
    config: HeroConfig,
}

impl HeroCarousel {
    /// Create an unmounted carousel
    #[must_use]
    pub fn new(environment: HeroEnvironment) -> Self {
        let config = environment.config().clone();
        let state = HeroState::new(&config.fallback_media_url);

        Self {
            store: Store::new(state, HeroReducer::new(), environment),
            config,
        }
    }

    /// Start the default phase and request events
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once unmounted.
    pub async fn mount(&self) -> Result<(), StoreError> {
        self.store.send(HeroAction::Mount).await?;
        self.store.send(HeroAction::LoadEvents).await?;
        Ok(())
    }

    /// Handle a click and wait until the navigation has been issued
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once unmounted.
    pub async fn click(&self, target: ClickTarget) -> Result<(), StoreError> {
        let mut handle = self.store.send(HeroAction::Clicked(target)).await?;
        handle.wait().await;
        Ok(())
    }

    /// Report an image that failed to load
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once unmounted.
    pub async fn asset_failed(&self, slot: AssetSlot) -> Result<(), StoreError> {
        self.store.send(HeroAction::AssetLoadFailed(slot)).await?;
        Ok(())
    }

    /// What to draw right now
    pub async fn render(&self) -> RenderDirective {
        let config = &self.config;
        self.store.state(|state| render(state, config)).await
    }

    /// Current rotation position
    pub async fn rotation(&self) -> RotationState {
        self.store.state(|state| state.rotation.clone()).await
    }

    /// Snapshot of the whole widget state
    pub async fn snapshot(&self) -> HeroState {
        self.store.state(Clone::clone).await
    }

    /// Cancel both timers and tear the store down
    ///
    /// Idempotent.
    pub async fn unmount(&self) {
        if self.store.is_torn_down() {
            return;
        }
        if let Err(error) = self.store.send(HeroAction::Unmount).await {
            tracing::debug!(%error, "Unmount raced with teardown");
        }
        self.store.teardown().await;
    }

    /// Whether [`HeroCarousel::unmount`] has run
    #[must_use]
    pub fn is_unmounted(&self) -> bool {
        self.store.is_torn_down()
    }

    /// Timer and load tasks still alive
    #[must_use]
    pub fn active_tasks(&self) -> usize {
        self.store.active_tasks()
    }

    /// Actions produced by timers and loads
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<HeroAction> {
        self.store.subscribe_actions()
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &HeroConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::overlay::DEFAULT_HERO_IMAGE;
    use crate::source::StaticEventSource;
    use crate::types::{EventId, EventRecord, Phase};
    use marquee_testing::RecordingNavigator;
    use std::sync::Arc;
    use std::time::Duration;

    fn carousel(navigator: &RecordingNavigator) -> HeroCarousel {
        let events = vec![
            EventRecord::new(EventId::new(1), "Gala", "Paid", "https://cdn/1.webp"),
            EventRecord::new(EventId::new(2), "Talk", "Free", "https://cdn/2.webp"),
        ];
        HeroCarousel::new(HeroEnvironment::new(
            Arc::new(StaticEventSource::new(events)),
            Arc::new(navigator.clone()),
            HeroConfig::default(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_on_paused_clock() {
        let navigator = RecordingNavigator::new();
        let carousel = carousel(&navigator);
        carousel.mount().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1990)).await;
        assert_eq!(carousel.rotation().await.phase, Phase::Default);
        assert_eq!(carousel.render().await.image_url, DEFAULT_HERO_IMAGE);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let rotation = carousel.rotation().await;
        assert_eq!(rotation.phase, Phase::Rotating);
        assert_eq!(rotation.current_index, 0);
        assert_eq!(carousel.render().await.image_url, "https://cdn/1.webp");

        tokio::time::sleep(Duration::from_millis(15_000)).await;
        assert_eq!(carousel.rotation().await.current_index, 1);

        carousel.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_before_rotation_leaves_no_timers() {
        let navigator = RecordingNavigator::new();
        let carousel = carousel(&navigator);
        carousel.mount().await.unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        carousel.unmount().await;
        carousel.unmount().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(carousel.is_unmounted());
        assert_eq!(carousel.active_tasks(), 0);
        assert_eq!(carousel.rotation().await.phase, Phase::Default);
        assert!(matches!(
            carousel.mount().await,
            Err(StoreError::ShutdownInProgress)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_navigates_before_returning() {
        let navigator = RecordingNavigator::new();
        let carousel = carousel(&navigator);
        carousel.mount().await.unwrap();

        carousel.click(ClickTarget::BaseImage).await.unwrap();
        assert_eq!(navigator.last().as_deref(), Some("/events"));

        tokio::time::sleep(Duration::from_millis(2010)).await;
        carousel.click(ClickTarget::Overlay).await.unwrap();
        carousel.unmount().await;

        assert_eq!(navigator.count(), 2);
        assert_eq!(navigator.last().as_deref(), Some("/events/1"));
    }
}
