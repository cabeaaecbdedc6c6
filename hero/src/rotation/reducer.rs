//! Reducer driving the hero rotation.

use super::{HeroAction, HeroEnvironment, HeroState};
use crate::click::route_click;
use crate::overlay::{AssetSlot, resolve_overlay};
use crate::selector::{HeroQueue, build_queue};
use crate::types::Phase;
use marquee_core::effect::{Effect, EffectId};
use marquee_core::reducer::Reducer;
use smallvec::{SmallVec, smallvec};

/// Handle of the one-shot default phase timer
pub const DEFAULT_PHASE_TIMER: EffectId = EffectId::new("hero.default-phase");

/// Handle of the recurring rotation timer
pub const ROTATION_TIMER: EffectId = EffectId::new("hero.rotation");

/// Reducer for one hero widget
///
/// Two phases: a one-shot default phase showing the brand image, then a
/// recurring rotation through the hero queue that runs until unmount. Timers
/// are requested as cancellable effects, so whichever runtime executes them
/// owns the handles and `Unmount` releases both.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeroReducer;

impl HeroReducer {
    /// Create a new hero reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for HeroReducer {
    type State = HeroState;
    type Action = HeroAction;
    type Environment = HeroEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut HeroState,
        action: HeroAction,
        env: &HeroEnvironment,
    ) -> SmallVec<[Effect<HeroAction>; 4]> {
        match action {
            HeroAction::Mount => {
                if state.mounted {
                    tracing::trace!("Already mounted");
                    return smallvec![Effect::None];
                }

                state.mounted = true;
                state.rotation = super::RotationState::default();
                state.overlay_asset_failed = false;
                tracing::info!(default_phase = ?env.default_phase(), "Hero mounted");

                smallvec![
                    Effect::delay(env.default_phase(), HeroAction::DefaultPhaseElapsed)
                        .cancellable(DEFAULT_PHASE_TIMER)
                ]
            },

            HeroAction::DefaultPhaseElapsed => {
                if !state.mounted || state.rotation.phase != Phase::Default {
                    tracing::debug!(phase = ?state.rotation.phase, "Ignoring stale default phase timer");
                    return smallvec![Effect::None];
                }

                state.rotation.phase = Phase::Rotating;
                state.rotation.bind(&state.queue, 0);
                state.overlay_asset_failed = false;
                tracing::debug!(
                    queue_len = state.queue.len(),
                    event_id = ?state.rotation.current_event.as_ref().map(|e| e.id),
                    "Rotation started"
                );

                smallvec![
                    Effect::every(env.rotation_period(), HeroAction::RotationTick)
                        .cancellable(ROTATION_TIMER)
                ]
            },

            HeroAction::RotationTick => {
                if !state.mounted || state.rotation.phase != Phase::Rotating {
                    tracing::debug!(phase = ?state.rotation.phase, "Ignoring stale rotation tick");
                    return smallvec![Effect::None];
                }

                let next = (state.rotation.current_index + 1) % state.queue.len().max(1);
                state.rotation.bind(&state.queue, next);
                state.overlay_asset_failed = false;
                tracing::debug!(
                    index = next,
                    event_id = ?state.rotation.current_event.as_ref().map(|e| e.id),
                    "Rotated"
                );

                smallvec![Effect::None]
            },

            HeroAction::Unmount => {
                state.mounted = false;
                tracing::info!(phase = ?state.rotation.phase, "Hero unmounted");

                smallvec![
                    Effect::Cancel(DEFAULT_PHASE_TIMER),
                    Effect::Cancel(ROTATION_TIMER),
                ]
            },

            HeroAction::LoadEvents => {
                state.load = super::LoadStatus::Loading;
                let source = env.source();

                smallvec![Effect::Future(Box::pin(async move {
                    match source.hero_events().await {
                        Ok(events) => Some(HeroAction::EventsLoaded(events)),
                        Err(error) => Some(HeroAction::EventsFailed(error.to_string())),
                    }
                }))]
            },

            HeroAction::EventsLoaded(events) => {
                state.queue = build_queue(&events, &env.config().fallback_media_url);
                state.load = super::LoadStatus::Loaded;
                rebind_after_reload(state);

                smallvec![Effect::None]
            },

            HeroAction::EventsFailed(reason) => {
                tracing::warn!(%reason, "Hero events unavailable, showing fallback only");
                state.queue = HeroQueue::fallback_only(&env.config().fallback_media_url);
                state.load = super::LoadStatus::Failed(reason);
                rebind_after_reload(state);

                smallvec![Effect::None]
            },

            HeroAction::Clicked(target) => {
                let intent = route_click(&state.rotation, target);
                tracing::debug!(?target, route = %intent.route, "Hero clicked");

                let navigator = env.navigator();
                let path = intent.path();

                smallvec![Effect::Future(Box::pin(async move {
                    navigator.navigate(&path);
                    None
                }))]
            },

            HeroAction::AssetLoadFailed(AssetSlot::Overlay) => {
                if resolve_overlay(state.rotation.current_event.as_ref()).is_some() {
                    tracing::debug!("Overlay image failed, substituting tickets image");
                    state.overlay_asset_failed = true;
                }
                smallvec![Effect::None]
            },

            HeroAction::AssetLoadFailed(AssetSlot::SeeAllBadge) => {
                tracing::warn!("See-all badge image failed to load");
                smallvec![Effect::None]
            },
        }
    }
}

/// A reload replaces the queue; a running rotation restarts at its first slot
fn rebind_after_reload(state: &mut HeroState) {
    if state.rotation.phase == Phase::Rotating {
        state.rotation.bind(&state.queue, 0);
        state.overlay_asset_failed = false;
    }
}
