//! Per-tick performance metrics for the simulation engine.
//!
//! [`StepMetrics`] captures timing and memory data for a single tick.

/// Timing and memory metrics collected during a single tick.
///
/// All durations are in microseconds. The engine populates these fields
/// after each successful tick; consumers read them from the most recent
/// tick via `last_metrics()`.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time for the entire tick, in microseconds.
    pub total_us: u64,
    /// Time spent synchronizing the ghost ring of slice `t - 1`.
    pub sync_us: u64,
    /// Per-propagator execution times: `(name, microseconds)`.
    pub propagator_us: Vec<(String, u64)>,
    /// Time spent scanning new state for non-finite values.
    pub divergence_check_us: u64,
    /// Time spent copying staged state into history.
    pub commit_us: u64,
    /// Slices held by the history after the tick.
    pub retained_slices: usize,
    /// Bytes held by the history after the tick.
    pub retained_bytes: usize,
}
