//! State owned by one mounted hero widget.

use crate::selector::HeroQueue;
use crate::types::{EventRecord, Phase};
use serde::{Deserialize, Serialize};

/// Position of the rotation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    /// Current mode
    pub phase: Phase,
    /// Active slot of the hero queue
    pub current_index: usize,
    /// Event bound to the active slot (`None` in the default phase and on the fallback slot)
    pub current_event: Option<EventRecord>,
}

impl RotationState {
    /// Point at `index` and bind whatever event sits there
    pub(crate) fn bind(&mut self, queue: &HeroQueue, index: usize) {
        self.current_index = index;
        self.current_event = queue.event_at(index).cloned();
    }
}

/// Progress of the event load
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Request in flight
    Loading,
    /// Events received (possibly none)
    Loaded,
    /// Source failed; the queue holds only the fallback slot
    Failed(String),
}

/// Complete hero widget state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroState {
    /// Slots to rotate through
    pub queue: HeroQueue,
    /// Rotation position
    pub rotation: RotationState,
    /// Whether the host currently shows the widget
    pub mounted: bool,
    /// The active overlay image failed to load
    pub overlay_asset_failed: bool,
    /// Event load progress
    pub load: LoadStatus,
}

impl HeroState {
    /// Fresh state with the given fallback image
    #[must_use]
    pub fn new(fallback_media_url: &str) -> Self {
        Self {
            queue: HeroQueue::fallback_only(fallback_media_url),
            ..Self::default()
        }
    }
}
