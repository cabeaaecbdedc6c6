//! Metric names recorded by the Store runtime.
//!
//! The runtime only records through the `metrics` facade. Installing an
//! exporter is left to the host; without one every call is a no-op.

use metrics::{describe_counter, describe_histogram};

/// Actions accepted by a store
pub const COMMANDS_TOTAL: &str = "store.commands.total";

/// Actions rejected because the store was torn down
pub const REJECTED_ACTIONS: &str = "store.shutdown.rejected_actions";

/// Effects executed, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Reducer execution time
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Timer and future tasks aborted by `Effect::Cancel`
pub const TIMERS_CANCELLED: &str = "store.timers.cancelled";

/// Completed teardowns
pub const TEARDOWN_TOTAL: &str = "store.teardown.total";

/// Register descriptions for every runtime metric.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(COMMANDS_TOTAL, "Total number of actions processed by stores");
    describe_counter!(
        REJECTED_ACTIONS,
        "Actions rejected because the store had been torn down"
    );
    describe_counter!(EFFECTS_EXECUTED, "Effects executed, by effect type");
    describe_histogram!(REDUCER_DURATION, "Time spent inside reducers");
    describe_counter!(
        TIMERS_CANCELLED,
        "Pending timer and future tasks aborted by cancellation"
    );
    describe_counter!(TEARDOWN_TOTAL, "Stores torn down");
}
