//! Checkpointed progress reporting.
//!
//! A phase of `total` work units is split into `checkpoints` evenly
//! spaced thresholds. [`ProgressMeter::observe`] emits one `info` event
//! each time the completed count crosses a threshold.

use tracing::info;

/// Reports completion of a phase at evenly spaced checkpoints.
#[derive(Debug)]
pub struct ProgressMeter {
    phase: &'static str,
    total: u64,
    checkpoints: u32,
    reached: u32,
}

impl ProgressMeter {
    /// A meter for `total` units with `checkpoints` reports.
    ///
    /// The count is clamped to `1..=total`, so a phase never reports more
    /// often than once per unit.
    pub fn new(phase: &'static str, total: u64, checkpoints: u32) -> Self {
        let checkpoints = u64::from(checkpoints.max(1)).min(total.max(1)) as u32;
        Self {
            phase,
            total,
            checkpoints,
            reached: 0,
        }
    }

    /// Phase label attached to every event.
    pub fn phase(&self) -> &'static str {
        self.phase
    }

    /// Checkpoints this meter reports, after clamping.
    pub fn checkpoints(&self) -> u32 {
        self.checkpoints
    }

    /// Record that `done` units are complete; `tick` labels the event.
    ///
    /// Checkpoint `k` is crossed once `done >= ceil(k * total / checkpoints)`.
    /// Returns the percentage reported, if a checkpoint was crossed. When
    /// several are crossed at once only the highest is reported.
    pub fn observe(&mut self, done: u64, tick: u64) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let done = u128::from(done.min(self.total));
        let k = (done * u128::from(self.checkpoints) / u128::from(self.total)) as u32;
        if k <= self.reached {
            return None;
        }
        self.reached = k;
        let percent = (u64::from(k) * 100 / u64::from(self.checkpoints)) as u32;
        info!(phase = self.phase, tick, percent, "progress");
        Some(percent)
    }

    /// Whether every checkpoint has been reported.
    pub fn is_complete(&self) -> bool {
        self.reached == self.checkpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_checkpoints_over_hundred_units() {
        let mut meter = ProgressMeter::new("simulation", 100, 10);
        let reported: Vec<u32> = (1..=100).filter_map(|d| meter.observe(d, d + 1)).collect();
        assert_eq!(reported, [10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert!(meter.is_complete());
    }

    #[test]
    fn uneven_split_rounds_thresholds_up() {
        let mut meter = ProgressMeter::new("simulation", 10, 3);
        let hits: Vec<u64> = (1..=10).filter(|&d| meter.observe(d, d).is_some()).collect();
        assert_eq!(hits, [4, 7, 10]);
    }

    #[test]
    fn fewer_units_than_checkpoints() {
        let mut meter = ProgressMeter::new("render", 2, 10);
        assert_eq!(meter.observe(1, 1), Some(50));
        assert_eq!(meter.observe(2, 2), Some(100));
        assert_eq!(meter.observe(2, 2), None);
    }

    #[test]
    fn checkpoints_are_capped_at_total() {
        let meter = ProgressMeter::new("simulation", 2, 50_000_000);
        assert_eq!(meter.checkpoints(), 2);
        assert_eq!(ProgressMeter::new("simulation", 0, 7).checkpoints(), 1);
        assert_eq!(ProgressMeter::new("simulation", 500, 0).checkpoints(), 1);
    }

    #[test]
    fn huge_checkpoint_count_does_not_overflow() {
        let mut meter = ProgressMeter::new("simulation", 2, 50_000_000);
        assert_eq!(meter.observe(1, 2), Some(50));
        assert_eq!(meter.observe(2, 3), Some(100));
        assert!(meter.is_complete());

        let mut wide = ProgressMeter::new("simulation", u64::MAX, u32::MAX);
        assert_eq!(wide.observe(u64::MAX, 1), Some(100));
        assert!(wide.is_complete());
    }

    #[test]
    fn done_past_total_completes() {
        let mut meter = ProgressMeter::new("animation", 4, 4);
        assert_eq!(meter.observe(9, 9), Some(100));
        assert_eq!(meter.observe(10, 10), None);
    }

    #[test]
    fn empty_phase_reports_nothing() {
        let mut meter = ProgressMeter::new("simulation", 0, 10);
        assert_eq!(meter.observe(0, 1), None);
        assert!(!meter.is_complete());
    }
}
