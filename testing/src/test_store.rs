//! Deterministic store for timer-driven reducers
//!
//! [`TestStore`] interprets effects the way the production `Store` does, but
//! against a virtual clock that only moves when the test calls
//! [`TestStore::advance`]. Timers fire in deadline order (ties in scheduling
//! order), futures are awaited inline, and every action fed back by an effect
//! is recorded.

#![allow(clippy::module_name_repetitions)] // TestStore is the natural name

use marquee_core::effect::{Effect, EffectId};
use marquee_core::reducer::Reducer;
use marquee_runtime::StoreError;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

type PendingFuture<A> = Pin<Box<dyn Future<Output = Option<A>> + Send>>;

/// A timer registered on the virtual clock
#[derive(Debug, Clone)]
struct ScheduledTimer<A> {
    seq: u64,
    id: Option<EffectId>,
    deadline: Duration,
    period: Option<Duration>,
    action: A,
}

/// Store with a controllable clock
///
/// # Example
///
/// ```ignore
/// let mut store = TestStore::new(HeroState::default(), HeroReducer::new(), env);
/// store.send(HeroAction::Mount).await?;
///
/// store.advance(Duration::from_millis(2000)).await;
/// assert_eq!(store.state().rotation.phase, Phase::Rotating);
///
/// store.teardown();
/// store.advance(Duration::from_secs(60)).await;
/// assert_eq!(store.timer_fires(), 1);
/// ```
pub struct TestStore<R>
where
    R: Reducer,
{
    reducer: R,
    environment: R::Environment,
    state: R::State,
    now: Duration,
    next_seq: u64,
    timers: Vec<ScheduledTimer<R::Action>>,
    received: Vec<R::Action>,
    timer_fires: usize,
    torn_down: bool,
}

impl<R> TestStore<R>
where
    R: Reducer,
    R::Action: Clone + Debug,
{
    /// Create a store at virtual time zero
    pub fn new(initial_state: R::State, reducer: R, environment: R::Environment) -> Self {
        Self {
            reducer,
            environment,
            state: initial_state,
            now: Duration::ZERO,
            next_seq: 0,
            timers: Vec::new(),
            received: Vec::new(),
            timer_fires: 0,
            torn_down: false,
        }
    }

    /// Send an action and run every effect it triggers that does not need time to pass
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`TestStore::teardown`].
    pub async fn send(&mut self, action: R::Action) -> Result<(), StoreError> {
        if self.torn_down {
            return Err(StoreError::ShutdownInProgress);
        }
        self.process(action).await;
        Ok(())
    }

    /// Move the virtual clock forward, firing every timer that falls due
    ///
    /// Timers scheduled by fired actions also fire if they fall due within
    /// the same window.
    pub async fn advance(&mut self, by: Duration) {
        let target = self.now + by;

        while !self.torn_down {
            let Some(position) = self.next_due(target) else {
                break;
            };

            let timer = &mut self.timers[position];
            self.now = timer.deadline;
            let action = timer.action.clone();

            if let Some(period) = timer.period {
                timer.deadline += period;
                timer.seq = self.next_seq;
                self.next_seq += 1;
            } else {
                self.timers.remove(position);
            }

            self.timer_fires += 1;
            tracing::trace!(?action, now = ?self.now, "Virtual timer fired");
            self.received.push(action.clone());
            self.process(action).await;
        }

        self.now = target;
    }

    /// Cancel every pending timer and refuse further actions
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.timers.clear();
    }

    /// Current state
    pub const fn state(&self) -> &R::State {
        &self.state
    }

    /// Injected environment
    pub const fn environment(&self) -> &R::Environment {
        &self.environment
    }

    /// Virtual time elapsed since creation
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Timers still scheduled
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Timers still scheduled under `id`
    pub fn pending_timers_for(&self, id: EffectId) -> usize {
        self.timers.iter().filter(|t| t.id == Some(id)).count()
    }

    /// Total number of timer callbacks that have fired
    pub const fn timer_fires(&self) -> usize {
        self.timer_fires
    }

    /// Actions fed back by effects (timer fires and future results), in order
    pub fn received_actions(&self) -> &[R::Action] {
        &self.received
    }

    /// Whether [`TestStore::teardown`] has been called
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn next_due(&self, target: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= target)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(position, _)| position)
    }

    async fn process(&mut self, action: R::Action) {
        let mut queue = VecDeque::from([action]);

        while let Some(action) = queue.pop_front() {
            let effects = self
                .reducer
                .reduce(&mut self.state, action, &self.environment);

            let mut futures = Vec::new();
            for effect in effects {
                self.schedule(effect, None, self.now, &mut futures);
            }

            for future in futures {
                if let Some(action) = future.await {
                    self.received.push(action.clone());
                    queue.push_back(action);
                }
            }
        }
    }

    /// Register an effect relative to `start`, returning when it completes
    ///
    /// Sequential children start when the previous one completes; recurring
    /// timers never complete and count as completing immediately.
    fn schedule(
        &mut self,
        effect: Effect<R::Action>,
        id: Option<EffectId>,
        start: Duration,
        futures: &mut Vec<PendingFuture<R::Action>>,
    ) -> Duration {
        match effect {
            Effect::None => start,
            Effect::Future(future) => {
                futures.push(future);
                start
            },
            Effect::Delay { duration, action } => {
                self.push_timer(id, start + duration, None, *action);
                start + duration
            },
            Effect::Interval { period, action } => {
                if !period.is_zero() {
                    self.push_timer(id, start + period, Some(period), *action);
                }
                start
            },
            Effect::Parallel(effects) => effects
                .into_iter()
                .map(|effect| self.schedule(effect, id, start, futures))
                .max()
                .unwrap_or(start),
            Effect::Sequential(effects) => effects
                .into_iter()
                .fold(start, |at, effect| self.schedule(effect, id, at, futures)),
            Effect::Cancellable { id, effect } => self.schedule(*effect, Some(id), start, futures),
            Effect::Cancel(cancelled) => {
                self.timers.retain(|t| t.id != Some(cancelled));
                start
            },
        }
    }

    fn push_timer(
        &mut self,
        id: Option<EffectId>,
        deadline: Duration,
        period: Option<Duration>,
        action: R::Action,
    ) {
        self.timers.push(ScheduledTimer {
            seq: self.next_seq,
            id,
            deadline,
            period,
            action,
        });
        self.next_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::{SmallVec, smallvec};

    const BLINK: EffectId = EffectId::new("blink");

    #[derive(Debug, Default)]
    struct LampState {
        on: bool,
        blinks: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum LampAction {
        SwitchOn,
        Blink,
        SwitchOff,
        TwoStep,
        Fetched(u32),
        Fetch,
    }

    struct LampReducer;

    impl Reducer for LampReducer {
        type State = LampState;
        type Action = LampAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut LampState,
            action: LampAction,
            _env: &(),
        ) -> SmallVec<[Effect<LampAction>; 4]> {
            match action {
                LampAction::SwitchOn => {
                    state.on = true;
                    smallvec![Effect::every(Duration::from_secs(1), LampAction::Blink).cancellable(BLINK)]
                },
                LampAction::Blink => {
                    state.blinks += 1;
                    smallvec![Effect::None]
                },
                LampAction::SwitchOff => {
                    state.on = false;
                    smallvec![Effect::Cancel(BLINK)]
                },
                LampAction::TwoStep => smallvec![Effect::chain(vec![
                    Effect::delay(Duration::from_secs(1), LampAction::Blink),
                    Effect::delay(Duration::from_secs(1), LampAction::Blink),
                ])],
                LampAction::Fetch => {
                    smallvec![Effect::Future(Box::pin(async { Some(LampAction::Fetched(7)) }))]
                },
                LampAction::Fetched(n) => {
                    state.blinks = n;
                    smallvec![Effect::None]
                },
            }
        }
    }

    fn store() -> TestStore<LampReducer> {
        TestStore::new(LampState::default(), LampReducer, ())
    }

    #[tokio::test]
    async fn test_interval_fires_once_per_period() {
        let mut store = store();
        assert!(store.send(LampAction::SwitchOn).await.is_ok());

        store.advance(Duration::from_millis(999)).await;
        assert_eq!(store.state().blinks, 0);

        store.advance(Duration::from_millis(1)).await;
        assert_eq!(store.state().blinks, 1);

        store.advance(Duration::from_secs(3)).await;
        assert_eq!(store.state().blinks, 4);
        assert_eq!(store.now(), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_cancel_removes_timer() {
        let mut store = store();
        let _ = store.send(LampAction::SwitchOn).await;
        assert_eq!(store.pending_timers_for(BLINK), 1);

        let _ = store.send(LampAction::SwitchOff).await;
        store.advance(Duration::from_secs(10)).await;

        assert_eq!(store.pending_timers(), 0);
        assert_eq!(store.timer_fires(), 0);
    }

    #[tokio::test]
    async fn test_sequential_delays_accumulate() {
        let mut store = store();
        let _ = store.send(LampAction::TwoStep).await;

        store.advance(Duration::from_secs(1)).await;
        assert_eq!(store.state().blinks, 1);

        store.advance(Duration::from_secs(1)).await;
        assert_eq!(store.state().blinks, 2);
    }

    #[tokio::test]
    async fn test_futures_feed_back_immediately() {
        let mut store = store();
        let _ = store.send(LampAction::Fetch).await;

        assert_eq!(store.state().blinks, 7);
        assert_eq!(store.received_actions(), &[LampAction::Fetched(7)]);
    }

    #[tokio::test]
    async fn test_teardown_silences_everything() {
        let mut store = store();
        let _ = store.send(LampAction::SwitchOn).await;

        store.teardown();
        store.advance(Duration::from_secs(60)).await;

        assert_eq!(store.timer_fires(), 0);
        assert!(store.is_torn_down());
        assert!(matches!(
            store.send(LampAction::Blink).await,
            Err(StoreError::ShutdownInProgress)
        ));
        assert_eq!(store.state().blinks, 0);
        assert!(store.state().on);
    }
}
