//! Timer-driven rotation of the hero widget.
//!
//! # States
//!
//! ```text
//!   Mount ──► Default ── D elapsed ──► Rotating ──┐
//!                                        ▲        │ every R:
//!                                        └────────┘ index = (index + 1) mod len
//! ```
//!
//! There is no way back to `Default`. `Unmount` cancels whichever timer is
//! pending; after the runtime is torn down no timer callback can reach the
//! reducer.
//!
//! Data loads run beside the timers: `LoadEvents` asks the event source and
//! the answer replaces the queue. A reload during rotation restarts at the
//! first slot.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;

pub use actions::HeroAction;
pub use environment::HeroEnvironment;
pub use reducer::{DEFAULT_PHASE_TIMER, HeroReducer, ROTATION_TIMER};
pub use state::{HeroState, LoadStatus, RotationState};
