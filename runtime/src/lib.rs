//! # Marquee Runtime
//!
//! Runtime implementation for the Marquee reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Task Registry**: Owns the abort handles of every timer and future the store spawned,
//!   so cancellation and teardown are synchronous and unconditional
//!
//! ## Example
//!
//! ```ignore
//! use marquee_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::Mount).await?;
//!
//! // Read state
//! let phase = store.state(|s| s.rotation.phase).await;
//!
//! // Unmount: no timer callback fires after this returns
//! store.teardown().await;
//! ```

use marquee_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Metric names and descriptions
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store has been torn down and is not accepting new actions
        ///
        /// Returned when `send()` is called after `teardown()`, including by
        /// timers that lost the race against teardown.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timeout waiting for effects to complete
        #[error("Timeout waiting for effects")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of one
/// action to complete. Recurring timers never complete and are therefore
/// not tracked.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Clicked(target)).await?;
/// handle.wait_with_timeout(Duration::from_secs(1)).await?;
/// // Navigation has happened
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle together with its tracking context
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (_tx, rx) = watch::channel(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of tracked effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    ///
    /// Cancelled effects count as complete.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all tracked effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed or aborted)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Created before spawning and moved into the task, so an abort before the
/// first poll still releases the count.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for pending effect tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: one spawned timer/future task
struct RegisteredTask {
    id: Option<EffectId>,
    handle: AbortHandle,
}

/// Internal: abort handles of every task a store spawned
///
/// The store exclusively owns these handles. `abort_all` is the teardown
/// primitive; `cancel` serves `Effect::Cancel`.
#[derive(Clone, Default)]
struct TaskRegistry {
    tasks: Arc<Mutex<Vec<RegisteredTask>>>,
}

impl TaskRegistry {
    fn register(&self, id: Option<EffectId>, handle: AbortHandle, closed: &AtomicBool) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        // Lost the race against teardown
        if closed.load(Ordering::SeqCst) {
            handle.abort();
            return;
        }
        tasks.retain(|task| !task.handle.is_finished());
        tasks.push(RegisteredTask { id, handle });
    }

    fn cancel(&self, id: EffectId) -> usize {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cancelled = 0;
        tasks.retain(|task| {
            if task.id == Some(id) {
                if !task.handle.is_finished() {
                    task.handle.abort();
                    cancelled += 1;
                }
                false
            } else {
                true
            }
        });
        cancelled
    }

    fn abort_all(&self) -> usize {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let mut aborted = 0;
        for task in tasks.drain(..) {
            if !task.handle.is_finished() {
                task.handle.abort();
                aborted += 1;
            }
        }
        aborted
    }

    fn active(&self) -> usize {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.iter().filter(|task| !task.handle.is_finished()).count()
    }
}

/// Store module - The runtime for reducers
///
/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration,
        Effect, EffectHandle, EffectId, EffectTracking, Ordering, Reducer, RwLock, StoreError,
        TaskRegistry, metrics,
    };
    use std::future::Future;
    use tokio::sync::{broadcast, watch};
    use tokio::time::{Instant, MissedTickBehavior};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; reducer calls are serialized)
    /// 2. Reducer (widget logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (tokio timers and tasks, with feedback loop)
    /// 5. Ownership of every spawned task's abort handle
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        tasks: TaskRegistry,
        /// Actions produced by effects (timer fires, future results) are
        /// broadcast here before being fed back into the reducer.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Creates a Store with an action broadcast capacity of 16
        /// (increase with [`Store::with_broadcast_capacity`]).
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new store with a custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                tasks: TaskRegistry::default(),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects before releasing the lock
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns after starting effect execution, not completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store has been torn down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.is_torn_down() {
                tracing::warn!(?action, "Rejected action: store is torn down");
                ::metrics::counter!(metrics::REJECTED_ACTIONS).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!(?action, "Processing action");
            ::metrics::counter!(metrics::COMMANDS_TOTAL).increment(1);

            let (handle, tracking) = EffectHandle::new();

            let mut state = self.state.write().await;

            // Teardown may have completed while we waited for the lock
            if self.is_torn_down() {
                tracing::debug!(?action, "Dropped action queued behind teardown");
                ::metrics::counter!(metrics::REJECTED_ACTIONS).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut *state, action, &self.environment);
            ::metrics::histogram!(metrics::REDUCER_DURATION)
                .record(start.elapsed().as_secs_f64());

            tracing::trace!("Reducer completed, returned {} effects", effects.len());

            // Started under the lock so teardown never misses a task
            for effect in effects {
                self.execute_effect(effect, None, tracking.clone());
            }
            drop(state);

            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let index = store.state(|s| s.rotation.current_index).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Subscribe to actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Tear the store down
        ///
        /// Rejects all further actions, then aborts every pending timer and
        /// future task, whichever are pending. Once this returns, no reducer
        /// call can happen on this store. Idempotent.
        pub async fn teardown(&self) {
            if self.shutdown.swap(true, Ordering::SeqCst) {
                tracing::trace!("Store already torn down");
                return;
            }

            // Wait out a reducer call in flight; it starts its effects under this lock
            let _state = self.state.write().await;
            let aborted = self.tasks.abort_all();

            tracing::info!(aborted_tasks = aborted, "Store torn down");
            ::metrics::counter!(metrics::TEARDOWN_TOTAL).increment(1);
        }

        /// Whether [`Store::teardown`] has been called
        #[must_use]
        pub fn is_torn_down(&self) -> bool {
            self.shutdown.load(Ordering::SeqCst)
        }

        /// Number of spawned timer/future tasks that have not finished
        #[must_use]
        pub fn active_tasks(&self) -> usize {
            self.tasks.active()
        }

        /// Number of effects currently executing (including recurring timers)
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::SeqCst)
        }

        /// Spawn a task and hand its abort handle to the registry
        fn spawn_registered<F>(&self, id: Option<EffectId>, task: F)
        where
            F: Future<Output = ()> + Send + 'static,
        {
            let handle = tokio::spawn(task).abort_handle();
            self.tasks.register(id, handle, &self.shutdown);
        }

        /// Feed an action produced by an effect back into the store
        ///
        /// Returns `false` once the store refuses actions.
        async fn feed_back(&self, action: A) -> bool {
            // Broadcast to observers
            let _ = self.action_broadcast.send(action.clone());
            self.send(action).await.is_ok()
        }

        fn pending_guard(&self) -> AtomicCounterGuard {
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            AtomicCounterGuard(Arc::clone(&self.pending_effects))
        }

        /// Execute an effect with tracking
        ///
        /// # Effect Types
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Delay`: Waits for duration, then sends action
        /// - `Interval`: Sends action every period until cancelled or torn down
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        /// - `Cancellable`: Executes the inner effect registered under its id
        /// - `Cancel`: Aborts every task registered under the id
        ///
        /// Effect failures are logged and never halt the store.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned per spawned task
        #[allow(clippy::too_many_lines)]
        fn execute_effect(&self, effect: Effect<A>, id: Option<EffectId>, tracking: EffectTracking) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    ::metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    ::metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "future").increment(1);
                    tracking.increment();

                    let guard = DecrementGuard(tracking.clone());
                    let pending_guard = self.pending_guard();
                    let store = self.clone();

                    self.spawn_registered(id, async move {
                        let _guard = guard;
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            store.feed_back(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    ::metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "delay").increment(1);
                    tracking.increment();

                    let guard = DecrementGuard(tracking.clone());
                    let pending_guard = self.pending_guard();
                    let store = self.clone();

                    self.spawn_registered(id, async move {
                        let _guard = guard;
                        let _pending_guard = pending_guard;

                        tokio::time::sleep(duration).await;
                        tracing::trace!("Effect::Delay completed, sending action");
                        store.feed_back(*action).await;
                    });
                },
                Effect::Interval { period, action } => {
                    if period.is_zero() {
                        tracing::warn!("Ignoring Effect::Interval with a zero period");
                        return;
                    }
                    tracing::trace!("Executing Effect::Interval (period: {:?})", period);
                    ::metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "interval").increment(1);

                    let pending_guard = self.pending_guard();
                    let store = self.clone();

                    self.spawn_registered(id, async move {
                        let _pending_guard = pending_guard;

                        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                        loop {
                            ticker.tick().await;
                            tracing::trace!("Effect::Interval ticked, sending action");
                            if !store.feed_back((*action).clone()).await {
                                break;
                            }
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    ::metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect(effect, id, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    ::metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "sequential").increment(1);
                    tracking.increment();

                    let guard = DecrementGuard(tracking.clone());
                    let pending_guard = self.pending_guard();
                    let store = self.clone();

                    self.spawn_registered(id, async move {
                        let _guard = guard;
                        let _pending_guard = pending_guard;

                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!(
                                "Executing sequential effect {} of {}",
                                idx + 1,
                                effect_count
                            );

                            let (sub_tx, mut sub_rx) = watch::channel(());
                            let sub_tracking = EffectTracking {
                                counter: Arc::new(AtomicUsize::new(0)),
                                notifier: Arc::new(sub_tx),
                            };

                            store.execute_effect(effect, id, sub_tracking.clone());

                            // Wait for this effect to complete before continuing
                            while sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                                if sub_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        }
                        tracing::trace!("Effect::Sequential completed");
                    });
                },
                Effect::Cancellable { id: effect_id, effect } => {
                    tracing::trace!(effect_id = %effect_id, "Executing Effect::Cancellable");
                    self.execute_effect(*effect, Some(effect_id), tracking);
                },
                Effect::Cancel(effect_id) => {
                    let cancelled = self.tasks.cancel(effect_id);
                    tracing::debug!(effect_id = %effect_id, cancelled, "Cancelled effects");
                    ::metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "cancel").increment(1);
                    ::metrics::counter!(metrics::TIMERS_CANCELLED).increment(cancelled as u64);
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                tasks: self.tasks.clone(),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
