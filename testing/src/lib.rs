//! # Marquee Testing
//!
//! Testing utilities and helpers for the Marquee reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - A store driven by a virtual clock ([`TestStore`])
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use marquee_testing::{RecordingNavigator, TestStore, test_clock};
//!
//! #[tokio::test]
//! async fn test_rotation_starts_after_default_phase() {
//!     let navigator = RecordingNavigator::new();
//!     let mut store = TestStore::new(HeroState::default(), HeroReducer::new(), env(navigator));
//!
//!     store.send(HeroAction::Mount).await.unwrap();
//!     store.advance(Duration::from_millis(2000)).await;
//!
//!     assert_eq!(store.state().rotation.phase, Phase::Rotating);
//! }
//! ```

use chrono::{DateTime, Utc};
use marquee_core::environment::{Clock, Navigator};

pub mod test_store;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Navigator, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use marquee_testing::mocks::FixedClock;
    /// use marquee_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Navigator that records every path it is asked to visit
    ///
    /// Clones share the same log, so keep one clone in the test and hand the
    /// other to the environment.
    ///
    /// # Example
    ///
    /// ```
    /// use marquee_testing::mocks::RecordingNavigator;
    /// use marquee_core::environment::Navigator;
    ///
    /// let navigator = RecordingNavigator::new();
    /// navigator.navigate("/events");
    /// assert_eq!(navigator.navigations(), vec!["/events".to_string()]);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct RecordingNavigator {
        visited: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNavigator {
        /// Create a navigator with an empty log
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Every path navigated to, oldest first
        #[must_use]
        pub fn navigations(&self) -> Vec<String> {
            self.visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Most recent path navigated to
        #[must_use]
        pub fn last(&self) -> Option<String> {
            self.visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }

        /// Number of navigations so far
        #[must_use]
        pub fn count(&self) -> usize {
            self.visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(path.to_string());
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, RecordingNavigator, test_clock};
pub use reducer_test::{ReducerTest, assertions};
pub use test_store::TestStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_recording_navigator_shares_log_between_clones() {
        let navigator = RecordingNavigator::new();
        let handed_out = navigator.clone();

        handed_out.navigate("/events/7");
        handed_out.navigate("/events");

        assert_eq!(navigator.count(), 2);
        assert_eq!(navigator.last().as_deref(), Some("/events"));
        assert_eq!(
            navigator.navigations(),
            vec!["/events/7".to_string(), "/events".to_string()]
        );
    }
}
