//! # Marquee Core
//!
//! Core traits and types for the Marquee reducer architecture.
//!
//! Marquee drives timer-based UI widgets (the homepage hero carousel first among
//! them) as plain state machines. Everything that touches the outside world is
//! described, never performed, by the domain code.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for one mounted widget
//! - **Action**: All possible inputs to a reducer (user input, timer fires, loaded data)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions, including cancellable one-shot and recurring timers
//! - **Environment**: Injected dependencies via traits (`Clock`, `Navigator`, data sources)
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O, no hidden timers)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use marquee_core::*;
//!
//! impl Reducer for BannerReducer {
//!     type State = BannerState;
//!     type Action = BannerAction;
//!     type Environment = BannerEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BannerState,
//!         action: BannerAction,
//!         env: &BannerEnvironment,
//!     ) -> SmallVec<[Effect<BannerAction>; 4]> {
//!         match action {
//!             BannerAction::Start => smallvec![Effect::delay(
//!                 Duration::from_secs(2),
//!                 BannerAction::Advance,
//!             )
//!             .cancellable(EffectId::new("banner-start"))],
//!             BannerAction::Advance => {
//!                 state.slide += 1;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for widget logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state machine logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for state machine logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Inspects the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime. Most actions produce at most a
        /// few, hence the inline capacity of 4.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier used to cancel in-flight effects
    ///
    /// Any effect wrapped in [`Effect::Cancellable`] is registered under its id
    /// by the runtime; a later [`Effect::Cancel`] with the same id aborts every
    /// effect still registered under it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Create an effect id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// The name this id was created with
        #[must_use]
        pub const fn as_str(&self) -> &'static str {
            self.0
        }
    }

    impl fmt::Display for EffectId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by a runtime (the production `Store` or the
    /// virtual-clock `TestStore`).
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// One-shot timer: dispatch `action` once after `duration`
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Recurring timer: dispatch `action` every `period`, first after one full period
        ///
        /// Runs until cancelled or until the runtime is torn down.
        Interval {
            /// Time between two dispatches
            period: Duration,
            /// Action dispatched on every tick
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Register `effect` under `id` so it can be cancelled later
        Cancellable {
            /// Cancellation handle
            id: EffectId,
            /// The effect to run
            effect: Box<Effect<Action>>,
        },

        /// Cancel every in-flight effect registered under the id
        ///
        /// Cancelling an id with nothing registered is a no-op.
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Interval { period, action } => f
                    .debug_struct("Effect::Interval")
                    .field("period", period)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// One-shot timer dispatching `action` after `duration`
        #[must_use]
        pub fn delay(duration: Duration, action: Action) -> Effect<Action> {
            Effect::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// Recurring timer dispatching `action` every `period`
        #[must_use]
        pub fn every(period: Duration, action: Action) -> Effect<Action> {
            Effect::Interval {
                period,
                action: Box::new(action),
            }
        }

        /// Make this effect cancellable under `id`
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Whether this effect schedules a timer (possibly nested)
        #[must_use]
        pub fn is_timer(&self) -> bool {
            match self {
                Effect::Delay { .. } | Effect::Interval { .. } => true,
                Effect::Cancellable { effect, .. } => effect.is_timer(),
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().any(Effect::is_timer)
                },
                Effect::None | Effect::Future(_) | Effect::Cancel(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// let clock = SystemClock;
    ///
    /// // Test - fixed time for deterministic tests
    /// let clock = FixedClock::new(time);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time from the operating system
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Navigation port handed to the host page router
    ///
    /// Widgets never touch a browser or global location directly; they only
    /// ever ask this port to go somewhere.
    pub trait Navigator: Send + Sync {
        /// Navigate to `path` (e.g. `/events/42`)
        fn navigate(&self, path: &str);
    }
}

// Re-export for convenience
pub use effect::{Effect, EffectId};
pub use environment::{Clock, Navigator, SystemClock};
pub use reducer::Reducer;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Ping,
    }

    #[test]
    fn test_cancellable_wraps_effect() {
        let id = EffectId::new("ping");
        let effect = Effect::delay(Duration::from_millis(10), Ping::Ping).cancellable(id);

        match effect {
            Effect::Cancellable { id: wrapped, effect } => {
                assert_eq!(wrapped, id);
                assert!(matches!(*effect, Effect::Delay { .. }));
            },
            other => unreachable!("expected Cancellable, got {other:?}"),
        }
    }

    #[test]
    fn test_is_timer_sees_through_wrappers() {
        let nested = Effect::merge(vec![
            Effect::None,
            Effect::every(Duration::from_secs(1), Ping::Ping).cancellable(EffectId::new("tick")),
        ]);
        assert!(nested.is_timer());
        assert!(!Effect::<Ping>::Cancel(EffectId::new("tick")).is_timer());
        assert!(!Effect::<Ping>::None.is_timer());
    }

    #[test]
    fn test_debug_does_not_poll_futures() {
        let effect: Effect<Ping> = Effect::Future(Box::pin(async { Some(Ping::Ping) }));
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn test_effect_id_display() {
        assert_eq!(EffectId::new("hero-rotation").to_string(), "hero-rotation");
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
