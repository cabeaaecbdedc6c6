//! Actions accepted by the hero reducer.

use crate::click::ClickTarget;
use crate::overlay::AssetSlot;
use crate::types::EventRecord;

/// Inputs of the hero state machine
///
/// Host input (`Mount`, `Unmount`, `Clicked`, `AssetLoadFailed`), timer fires
/// (`DefaultPhaseElapsed`, `RotationTick`) and load results all arrive here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroAction {
    /// The host started showing the widget
    Mount,

    /// The one-shot default phase timer fired
    DefaultPhaseElapsed,

    /// The recurring rotation timer fired
    RotationTick,

    /// The host stopped showing the widget
    Unmount,

    /// Ask the event source for hero events
    LoadEvents,

    /// The event source answered
    EventsLoaded(Vec<EventRecord>),

    /// The event source failed
    EventsFailed(String),

    /// The user clicked part of the widget
    Clicked(ClickTarget),

    /// An image failed to load
    AssetLoadFailed(AssetSlot),
}
